//! Fetch upstream scheme/template repositories into the cache directory.
//!
//! Layout after a full update:
//! - `<cache>/sources.yaml`: `{schemes: <url>, templates: <url>}`
//! - `<cache>/sources/{schemes,templates}`: the two index repositories, each
//!   holding a `list.yaml` of `name: url` entries
//! - `<cache>/schemes/<name>`, `<cache>/templates/<name>`: one clone per entry
//!
//! A failed fetch is logged and counted; it never stops the other fetches.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::SourcesConfig;
use crate::error::SyncError;

pub const SOURCES_FILE: &str = "sources.yaml";
pub const SOURCES_DIR: &str = "sources";
pub const LIST_FILE: &str = "list.yaml";
pub const SCHEMES_DIR: &str = "schemes";
pub const TEMPLATES_DIR: &str = "templates";

/// How a destination was brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Cloned,
    Updated,
}

/// Retrieves a working copy of `url` at `dest`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchKind, SyncError>;
}

/// Fetcher backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    program: String,
}

impl GitFetcher {
    /// Use a specific `git` executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, url: &str, args: &[&str]) -> Result<(), SyncError> {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd.args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let output = cmd.output().await.map_err(SyncError::Spawn)?;
        if output.status.success() {
            return Ok(());
        }
        Err(SyncError::Git {
            url: url.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<FetchKind, SyncError> {
        let dest_str = dest.to_string_lossy().into_owned();
        if dest.join(".git").exists() {
            self.run(url, &["-C", dest_str.as_str(), "pull", "--ff-only", "--quiet"])
                .await?;
            return Ok(FetchKind::Updated);
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::Io(parent.to_path_buf(), e))?;
        }
        self.run(url, &["clone", "--depth", "1", "--quiet", url, dest_str.as_str()])
            .await?;
        Ok(FetchKind::Cloned)
    }
}

/// Outcome of one `update`.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub fetched: Vec<(String, FetchKind)>,
    pub failed: Vec<(String, SyncError)>,
}

impl SyncReport {
    fn merge(&mut self, other: SyncReport) {
        self.fetched.extend(other.fetched);
        self.failed.extend(other.failed);
    }
}

/// Write `<cache>/sources.yaml` from the configured index URLs.
pub fn write_sources_file(
    cache_dir: &Path,
    sources: &SourcesConfig,
) -> Result<PathBuf, SyncError> {
    let path = cache_dir.join(SOURCES_FILE);
    let list = BTreeMap::from([
        (SCHEMES_DIR.to_string(), sources.schemes.clone()),
        (TEMPLATES_DIR.to_string(), sources.templates.clone()),
    ]);
    let text = serde_yaml::to_string(&list).map_err(|e| SyncError::Yaml(path.clone(), e))?;
    fs::write(&path, text).map_err(|e| SyncError::Io(path.clone(), e))?;
    Ok(path)
}

/// Read a `name: url` list file.
pub fn read_source_list(path: &Path) -> Result<BTreeMap<String, String>, SyncError> {
    let text = fs::read_to_string(path).map_err(|e| SyncError::Io(path.to_path_buf(), e))?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_yaml::from_str(&text).map_err(|e| SyncError::Yaml(path.to_path_buf(), e))
}

/// Fetch every `name: url` entry into `<dest_root>/<name>`, at most `jobs` at a time.
pub async fn fetch_all(
    list: BTreeMap<String, String>,
    dest_root: &Path,
    jobs: usize,
    fetcher: Arc<dyn Fetcher>,
) -> SyncReport {
    let limit = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();
    for (name, url) in list {
        let dest = dest_root.join(&name);
        let fetcher = Arc::clone(&fetcher);
        let limit = Arc::clone(&limit);
        tasks.spawn(async move {
            let _permit = limit.acquire_owned().await;
            let result = fetcher.fetch(&url, &dest).await;
            (name, result)
        });
    }

    let mut report = SyncReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(kind))) => {
                tracing::info!(source = %name, "{kind:?}");
                report.fetched.push((name, kind));
            }
            Ok((name, Err(err))) => {
                tracing::warn!(source = %name, "fetch failed: {err}");
                report.failed.push((name, err));
            }
            Err(e) => tracing::warn!("fetch worker failed: {e}"),
        }
    }
    report.fetched.sort_by(|a, b| a.0.cmp(&b.0));
    report.failed.sort_by(|a, b| a.0.cmp(&b.0));
    report
}

/// Full update: index repositories first, then every listed scheme and
/// template repository. Only failing to write `sources.yaml` is fatal.
pub async fn update(
    cache_dir: &Path,
    sources: &SourcesConfig,
    jobs: usize,
    fetcher: Arc<dyn Fetcher>,
) -> Result<SyncReport, SyncError> {
    let sources_file = write_sources_file(cache_dir, sources)?;
    let index = read_source_list(&sources_file)?;
    let index_root = cache_dir.join(SOURCES_DIR);

    let mut report = fetch_all(index, &index_root, jobs, Arc::clone(&fetcher)).await;

    for kind in [SCHEMES_DIR, TEMPLATES_DIR] {
        let list_path = index_root.join(kind).join(LIST_FILE);
        let list = match read_source_list(&list_path) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!("skipping {kind}: {e}");
                continue;
            }
        };
        let stage = fetch_all(list, &cache_dir.join(kind), jobs, Arc::clone(&fetcher)).await;
        report.merge(stage);
    }
    Ok(report)
}
