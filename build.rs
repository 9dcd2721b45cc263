//! Stamps the commit the binary was built from as `BASE16_FORGE_COMMIT`.
//!
//! A non-empty `BASE16_FORGE_COMMIT` in the build environment wins over
//! asking git (release tarballs have no checkout). Empty means unknown.

use std::env;
use std::process::Command;

const COMMIT_ENV: &str = "BASE16_FORGE_COMMIT";

fn main() {
    println!("cargo:rerun-if-env-changed={COMMIT_ENV}");
    let commit = env::var(COMMIT_ENV)
        .ok()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .or_else(head_commit)
        .unwrap_or_default();
    println!("cargo:rustc-env={COMMIT_ENV}={commit}");
}

fn head_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
