//! CLI entry point for base16-forge.

mod cli;

use base16_forge::build_info;
use base16_forge::builder::{self, BuildOptions};
use base16_forge::config::{
    apply_overrides, load_config, prepare_cache_dir, Config, ConfigOverrides,
};
use base16_forge::list::{self, ListOptions};
use base16_forge::render::Renderer;
use base16_forge::scheme::load_schemes;
use base16_forge::sync::{self, GitFetcher};
use base16_forge::template::load_templates;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Env var consulted for the log filter before `RUST_LOG`.
const LOG_ENV: &str = "BASE16_FORGE_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit 1 rather than clap's default 2; help output exits 0.
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.verbose);

    if matches!(args.command, cli::Command::Version) {
        println!("{}", build_info::version_text());
        return ExitCode::SUCCESS;
    }

    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            Renderer::new(!args.no_color).error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    // Apply CLI overrides.
    let (output, jobs) = match &args.command {
        cli::Command::Build { output, jobs, .. } => (output.clone(), *jobs),
        cli::Command::Update { jobs } => (None, *jobs),
        _ => (None, None),
    };
    apply_overrides(
        &mut config,
        &ConfigOverrides {
            cache_dir: args.cache_dir.clone(),
            output_dir: output,
            jobs,
            no_color: args.no_color,
        },
    );

    let renderer = Renderer::new(config.color);
    if let Err(e) = prepare_cache_dir(&config, args.cache_dir.is_some()) {
        renderer.error(&e.to_string());
        return ExitCode::FAILURE;
    }

    match args.command {
        cli::Command::Update { .. } => run_update(&config, &renderer).await,
        cli::Command::Build {
            schemes, templates, ..
        } => run_build(&config, &renderer, schemes, templates).await,
        cli::Command::List {
            schemes,
            templates,
            raw,
        } => {
            run_list(&config, ListOptions::from_flags(schemes, templates, raw));
            ExitCode::SUCCESS
        }
        cli::Command::Version => ExitCode::SUCCESS,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run_update(config: &Config, renderer: &Renderer) -> ExitCode {
    let fetcher = Arc::new(GitFetcher::with_program(config.git.clone()));
    match sync::update(&config.cache_dir, &config.sources, config.jobs, fetcher).await {
        Ok(report) => {
            if !report.failed.is_empty() {
                renderer.warn(&format!("{} sources failed to fetch", report.failed.len()));
            }
            renderer.done(&format!(
                "fetched {} sources into {}",
                report.fetched.len(),
                config.cache_dir.display()
            ));
            ExitCode::SUCCESS
        }
        Err(e) => {
            renderer.error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run_build(
    config: &Config,
    renderer: &Renderer,
    schemes: Vec<String>,
    templates: Vec<String>,
) -> ExitCode {
    let loaded_schemes = load_schemes(&config.schemes_dir()).items;
    let loaded_templates = load_templates(&config.templates_dir()).items;

    // Ctrl-C stops scheduling new pairings; in-flight writes finish.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let options = BuildOptions {
        output_root: config.output_dir.clone(),
        schemes,
        templates,
        jobs: config.jobs,
        cancel: Some(cancel_rx),
    };
    let report = builder::build(&loaded_schemes, &loaded_templates, &options).await;

    if !report.failed.is_empty() {
        renderer.warn(&format!("{} files could not be written", report.failed.len()));
    }
    if report.cancelled > 0 {
        renderer.warn(&format!("cancelled; {} files not built", report.cancelled));
    }
    renderer.done(&format!(
        "wrote {} files to {}",
        report.written.len(),
        config.output_dir.display()
    ));
    ExitCode::SUCCESS
}

fn run_list(config: &Config, opts: ListOptions) {
    let schemes = if opts.schemes {
        load_schemes(&config.schemes_dir()).items
    } else {
        Vec::new()
    };
    let templates = if opts.templates {
        load_templates(&config.templates_dir()).items
    } else {
        Vec::new()
    };
    print!(
        "{}",
        list::render_listing(&schemes, &templates, opts, list::terminal_width())
    );
}
