//! Configuration loading from TOML files and environment variables.
//!
//! Config is resolved in this order of precedence (highest wins):
//! 1. Command-line flags (applied by the caller via [`apply_overrides`])
//! 2. Environment variables (`BASE16_FORGE_CACHE_DIR`, `BASE16_FORGE_OUTPUT_DIR`,
//!    `BASE16_FORGE_JOBS`, `NO_COLOR`)
//! 3. TOML file specified via `--config`
//! 4. `$XDG_CONFIG_HOME/base16-forge/config.toml` (or the platform equivalent)
//! 5. Built-in defaults

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

mod defaults;
mod types;

use defaults::{
    default_cache_root, default_jobs, APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_GIT_PROGRAM,
    DEFAULT_OUTPUT_DIR, ENV_CACHE_DIR, ENV_JOBS, ENV_NO_COLOR, ENV_OUTPUT_DIR,
};
pub use types::{Config, ConfigOverrides, SourcesConfig};
use types::FileConfig;

/// Return the default per-user config path (`~/.config/base16-forge/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from `--config`); unlike
/// the default location, it must exist.
pub fn load_config(path_override: Option<&Path>) -> Result<Config, ConfigError> {
    let env_lookup = |name: &str| std::env::var(name).ok();
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        env_lookup,
        default_config_path,
        || default_cache_root(&env_lookup),
    )
}

fn load_config_from_sources<FRead, FEnv, FConfigPath, FCacheRoot>(
    path_override: Option<&Path>,
    read_file: FRead,
    env_lookup: FEnv,
    config_path: FConfigPath,
    cache_root: FCacheRoot,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FConfigPath: Fn() -> Option<PathBuf>,
    FCacheRoot: Fn() -> Option<PathBuf>,
{
    let text = match path_override {
        Some(path) => read_file(path)?,
        None => config_path()
            .and_then(|path| read_file(&path).ok())
            .unwrap_or_default(),
    };
    let parsed: FileConfig = toml::from_str(&text)?;

    let cache_dir = env_path(&env_lookup, ENV_CACHE_DIR)
        .or(parsed.cache_dir)
        .or_else(|| cache_root().map(|root| root.join(APP_DIR_NAME)))
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "unable to resolve a cache directory; set {ENV_CACHE_DIR}"
            ))
        })?;
    let output_dir = env_path(&env_lookup, ENV_OUTPUT_DIR)
        .or(parsed.output_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let jobs = match env_value(&env_lookup, ENV_JOBS) {
        Some(raw) => parse_jobs(&raw)?,
        None => parsed.jobs.unwrap_or_else(default_jobs),
    };
    let color = env_value(&env_lookup, ENV_NO_COLOR).is_none() && parsed.color.unwrap_or(true);

    Ok(Config {
        cache_dir,
        output_dir,
        jobs: jobs.max(1),
        color,
        git: parsed
            .git
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GIT_PROGRAM.to_string()),
        sources: parsed.sources,
    })
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) {
    if let Some(dir) = &overrides.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(dir) = &overrides.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(jobs) = overrides.jobs {
        config.jobs = jobs.max(1);
    }
    if overrides.no_color {
        config.color = false;
    }
}

/// Make sure the cache directory is usable.
///
/// A directory named explicitly on the command line must already exist; the
/// resolved default is created on demand.
pub fn prepare_cache_dir(config: &Config, explicit: bool) -> Result<(), ConfigError> {
    if config.cache_dir.is_dir() {
        return Ok(());
    }
    if explicit {
        return Err(ConfigError::Invalid(format!(
            "directory not found: {}",
            config.cache_dir.display()
        )));
    }
    std::fs::create_dir_all(&config.cache_dir)?;
    Ok(())
}

fn env_value<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name).filter(|v| !v.trim().is_empty())
}

fn env_path<FEnv>(env_lookup: &FEnv, name: &str) -> Option<PathBuf>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_value(env_lookup, name).map(PathBuf::from)
}

fn parse_jobs(raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse::<usize>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {ENV_JOBS} value `{raw}`: expected a positive integer"
        ))
    })
}
