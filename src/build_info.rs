//! The line printed by `base16-forge version`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short commit hash stamped by `build.rs`; empty outside a git checkout.
pub const COMMIT: &str = env!("BASE16_FORGE_COMMIT");

pub fn version_text() -> String {
    version_line(VERSION, COMMIT)
}

fn version_line(version: &str, commit: &str) -> String {
    if commit.is_empty() {
        format!("base16-forge {version}")
    } else {
        format!("base16-forge {version} ({commit})")
    }
}
