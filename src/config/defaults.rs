//! Default configuration constants.

use std::path::PathBuf;

/// Directory name used under the platform cache and config roots.
pub(super) const APP_DIR_NAME: &str = "base16-forge";
/// Config file name under `<config-root>/base16-forge/`.
pub(super) const CONFIG_FILE_NAME: &str = "config.toml";
/// Default build output directory, relative to the working directory.
pub(super) const DEFAULT_OUTPUT_DIR: &str = "output";
pub(super) const DEFAULT_GIT_PROGRAM: &str = "git";
pub(super) const DEFAULT_SCHEMES_SOURCE: &str =
    "https://github.com/chriskempson/base16-schemes-source.git";
pub(super) const DEFAULT_TEMPLATES_SOURCE: &str =
    "https://github.com/chriskempson/base16-templates-source.git";

pub(super) const ENV_CACHE_DIR: &str = "BASE16_FORGE_CACHE_DIR";
pub(super) const ENV_OUTPUT_DIR: &str = "BASE16_FORGE_OUTPUT_DIR";
pub(super) const ENV_JOBS: &str = "BASE16_FORGE_JOBS";
pub(super) const ENV_NO_COLOR: &str = "NO_COLOR";
pub(super) const ENV_XDG_CACHE_HOME: &str = "XDG_CACHE_HOME";

/// Worker count when nothing else is configured.
pub(super) fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Platform cache root: `XDG_CACHE_HOME`, then the OS cache dir
/// (`LOCALAPPDATA` on Windows, `~/Library/Caches` on macOS), then `~/.cache`.
pub(super) fn default_cache_root<FEnv>(env_lookup: &FEnv) -> Option<PathBuf>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(xdg) = env_lookup(ENV_XDG_CACHE_HOME).filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(xdg));
    }
    dirs::cache_dir().or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
}
