//! Shared pieces of the scheme and template loaders.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Records loaded from a cache directory plus the ones that were skipped.
#[derive(Debug)]
pub struct LoadReport<T> {
    pub items: Vec<T>,
    pub skipped: Vec<StoreError>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> LoadReport<T> {
    /// Record a skipped definition and log it once.
    pub(crate) fn skip(&mut self, err: StoreError) {
        tracing::warn!("skipping definition: {err}");
        self.skipped.push(err);
    }
}

/// Directory entries sorted by path so load order is platform-independent.
pub(crate) fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let read = fs::read_dir(dir).map_err(|e| StoreError::Io(dir.to_path_buf(), e))?;
    let mut paths = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| StoreError::Io(dir.to_path_buf(), e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

/// Immediate subdirectories of `root`, or `None` when `root` is not a directory.
pub(crate) fn collections(root: &Path, kind: &str) -> Option<Vec<PathBuf>> {
    if !root.is_dir() {
        tracing::warn!(
            "{kind} directory {} is either empty or not found",
            root.display()
        );
        return None;
    }
    match sorted_entries(root) {
        Ok(entries) => Some(entries.into_iter().filter(|p| p.is_dir()).collect()),
        Err(e) => {
            tracing::warn!("cannot read {kind} directory: {e}");
            None
        }
    }
}

/// True for a regular file whose extension is exactly `ext`.
pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == ext)
}

/// File stem as an owned string (lossy for non-UTF-8 names).
pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a YAML definition file; a blank file is the empty value.
///
/// Decode straight into `String` fields rather than `serde_yaml::Value`: a
/// plain scalar read as a string keeps its source text, so `100e10` or `256`
/// stay as written instead of round-tripping through a number.
pub(crate) fn parse_yaml<T: DeserializeOwned + Default>(
    text: &str,
    path: &Path,
) -> Result<T, StoreError> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(text).map_err(|e| StoreError::Yaml(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn collections_lists_only_directories_in_order() {
        let tmp = TestTempDir::new("store-collections");
        tmp.write_text("b/x.yaml", "");
        tmp.write_text("a/y.yaml", "");
        tmp.write_text("stray.yaml", "");
        let found = collections(tmp.path(), "scheme").expect("root exists");
        assert_eq!(found, vec![tmp.child("a"), tmp.child("b")]);
    }

    #[test]
    fn collections_of_missing_root_is_none() {
        let tmp = TestTempDir::new("store-missing");
        assert!(collections(&tmp.child("nope"), "scheme").is_none());
    }

    #[test]
    fn parse_yaml_keeps_plain_scalars_as_written() {
        let map: std::collections::BTreeMap<String, String> = parse_yaml(
            "a: 100e10\nb: 0x1F\nc: 007\nd: true\n256: x\n",
            Path::new("t.yaml"),
        )
        .expect("parse");
        let got: Vec<(&str, &str)> = map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            got,
            vec![
                ("256", "x"),
                ("a", "100e10"),
                ("b", "0x1F"),
                ("c", "007"),
                ("d", "true")
            ]
        );
    }

    #[test]
    fn parse_yaml_blank_text_is_default() {
        let map: std::collections::BTreeMap<String, String> =
            parse_yaml("  \n", Path::new("t.yaml")).expect("parse");
        assert!(map.is_empty());
    }
}
