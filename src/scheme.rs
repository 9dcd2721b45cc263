//! Scheme store: `<root>/<collection>/<slug>.yaml` palettes.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::color;
use crate::error::StoreError;
use crate::store::{self, LoadReport};

/// A named base16 palette.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scheme {
    /// File stem of the definition; used in output file names.
    pub slug: String,
    pub name: String,
    pub author: String,
    /// Base id (`base00`..`base0F`) → `rrggbb`.
    pub colors: BTreeMap<String, String>,
}

impl Scheme {
    /// Parse one scheme definition: a flat mapping of scalars. `scheme` and
    /// `author` are metadata; every other top-level key is a color. Values are
    /// kept as written, and a null value reads as empty.
    pub fn parse(slug: &str, text: &str, path: &Path) -> Result<Self, StoreError> {
        let entries: BTreeMap<String, Option<String>> = store::parse_yaml(text, path)?;

        let mut scheme = Self {
            slug: slug.to_string(),
            ..Self::default()
        };
        for (key, value) in entries {
            let value = value.unwrap_or_default();
            match key.as_str() {
                "scheme" => scheme.name = value,
                "author" => scheme.author = value,
                _ => {
                    scheme.colors.insert(key, value);
                }
            }
        }
        Ok(scheme)
    }

    /// Base ids whose value is not six hex digits.
    pub fn invalid_colors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.colors
            .iter()
            .filter(|(_, hex)| !color::is_valid_hex(hex))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Load every scheme under `root`, sorted by slug.
///
/// A missing root yields an empty report. When two collections define the
/// same slug, the one visited later (sorted path order) wins.
pub fn load_schemes(root: &Path) -> LoadReport<Scheme> {
    let mut report = LoadReport::default();
    let Some(collections) = store::collections(root, "scheme") else {
        return report;
    };

    let mut by_slug: BTreeMap<String, (PathBuf, Scheme)> = BTreeMap::new();
    for collection in collections {
        let files = match store::sorted_entries(&collection) {
            Ok(files) => files,
            Err(e) => {
                report.skip(e);
                continue;
            }
        };
        for path in files.into_iter().filter(|p| store::has_extension(p, "yaml")) {
            let scheme = match read_scheme(&path) {
                Ok(scheme) => scheme,
                Err(e) => {
                    report.skip(e);
                    continue;
                }
            };
            for (base_id, value) in scheme.invalid_colors() {
                tracing::warn!(
                    slug = %scheme.slug,
                    "{base_id} = {value:?} is not a 6-digit hex color; using {}",
                    color::FALLBACK_HEX
                );
            }
            match by_slug.entry(scheme.slug.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert((path, scheme));
                }
                Entry::Occupied(mut slot) => {
                    tracing::warn!(
                        slug = %scheme.slug,
                        "{} replaces {}",
                        path.display(),
                        slot.get().0.display()
                    );
                    slot.insert((path, scheme));
                }
            }
        }
    }

    report.items = by_slug.into_values().map(|(_, scheme)| scheme).collect();
    report
}

fn read_scheme(path: &Path) -> Result<Scheme, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    Scheme::parse(&store::stem(path), &text, path)
}
