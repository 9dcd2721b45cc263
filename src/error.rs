//! Unified error types for loading, syncing, and building.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors raised while reading one scheme or template definition.
///
/// Store loaders never return these for a whole directory; they are attached
/// to the skipped record and logged.
#[derive(Debug)]
pub enum StoreError {
    Io(PathBuf, std::io::Error),
    Yaml(PathBuf, serde_yaml::Error),
    /// `config.yaml` has no entry for a `.mustache` variant.
    MissingVariant { config: PathBuf, variant: String },
    /// A variant entry lacks the required `output` field.
    MissingOutput { config: PathBuf, variant: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "io: {}: {e}", path.display()),
            Self::Yaml(path, e) => write!(f, "yaml: {}: {e}", path.display()),
            Self::MissingVariant { config, variant } => write!(
                f,
                "no entry for variant `{variant}` in {}",
                config.display()
            ),
            Self::MissingOutput { config, variant } => write!(
                f,
                "variant `{variant}` in {} has no `output`",
                config.display()
            ),
        }
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// SyncError
// ---------------------------------------------------------------------------

/// Errors from fetching upstream source repositories.
#[derive(Debug)]
pub enum SyncError {
    Io(PathBuf, std::io::Error),
    Yaml(PathBuf, serde_yaml::Error),
    /// `git` could not be started.
    Spawn(std::io::Error),
    /// `git` ran but exited non-zero.
    Git { url: String, code: i32, stderr: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "io: {}: {e}", path.display()),
            Self::Yaml(path, e) => write!(f, "yaml: {}: {e}", path.display()),
            Self::Spawn(e) => write!(f, "failed to run git: {e}"),
            Self::Git { url, code, stderr } => {
                write!(f, "git exited with {code} for {url}")?;
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for SyncError {}

// ---------------------------------------------------------------------------
// BuildError
// ---------------------------------------------------------------------------

/// Errors writing one rendered (scheme, template) output file.
#[derive(Debug)]
pub enum BuildError {
    Io(PathBuf, std::io::Error),
    /// The worker task panicked or was aborted.
    Join(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "io: {}: {e}", path.display()),
            Self::Join(msg) => write!(f, "worker failed: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}
