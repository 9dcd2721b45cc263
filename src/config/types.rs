//! Configuration data model.
//!
//! Struct definitions plus defaults only. Source resolution and precedence
//! live in `config::mod`.

use serde::Deserialize;
use std::path::PathBuf;

use super::defaults::{
    default_jobs, DEFAULT_GIT_PROGRAM, DEFAULT_OUTPUT_DIR, DEFAULT_SCHEMES_SOURCE,
    DEFAULT_TEMPLATES_SOURCE,
};

/// Top-level runtime configuration, passed explicitly to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of `sources.yaml`, `sources/`, `schemes/`, and `templates/`.
    pub cache_dir: PathBuf,
    /// Where `build` writes generated files.
    pub output_dir: PathBuf,
    /// Maximum concurrent fetches or build pairings.
    pub jobs: usize,
    /// ANSI styling on user-facing lines.
    pub color: bool,
    /// Executable used for fetching sources.
    pub git: String,
    pub sources: SourcesConfig,
}

impl Config {
    /// Defaults rooted at a specific cache directory.
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jobs: default_jobs(),
            color: true,
            git: DEFAULT_GIT_PROGRAM.to_string(),
            sources: SourcesConfig::default(),
        }
    }

    pub fn schemes_dir(&self) -> PathBuf {
        self.cache_dir.join(crate::sync::SCHEMES_DIR)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.cache_dir.join(crate::sync::TEMPLATES_DIR)
    }
}

/// Index repositories listing every upstream scheme/template repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourcesConfig {
    pub schemes: String,
    pub templates: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            schemes: DEFAULT_SCHEMES_SOURCE.to_string(),
            templates: DEFAULT_TEMPLATES_SOURCE.to_string(),
        }
    }
}

/// On-disk TOML shape. Every field is optional so partial files merge over
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub cache_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub color: Option<bool>,
    pub git: Option<String>,
    pub sources: SourcesConfig,
}

/// Values supplied on the command line; highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cache_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub no_color: bool,
}
