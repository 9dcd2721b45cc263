//! Template store: `<root>/<collection>/templates/{config.yaml,*.mustache}`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::StoreError;
use crate::store::{self, LoadReport};

const TEMPLATES_DIR: &str = "templates";
const CONFIG_FILE: &str = "config.yaml";
const TEMPLATE_EXT: &str = "mustache";

/// One renderable template variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    /// Collection directory stem (e.g. `vim`); the name used for filtering.
    pub name: String,
    /// Stem of the `.mustache` file this variant came from.
    pub variant: String,
    /// Raw text with `{{placeholder}}` tokens.
    pub data: String,
    /// Appended to `base16-<slug>`; may be empty.
    pub extension: String,
    /// Output subdirectory relative to `<output>/<name>/`.
    pub output: String,
}

/// One entry of `templates/config.yaml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct VariantConfig {
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

/// Parsed `templates/config.yaml`: variant name → routing.
pub type TemplateConfig = BTreeMap<String, Option<VariantConfig>>;

/// Parse a collection's `config.yaml`. Plain keys such as `256:` name the
/// variant exactly as written.
pub fn parse_config(text: &str, path: &Path) -> Result<TemplateConfig, StoreError> {
    store::parse_yaml(text, path)
}

/// Build the template for one variant from its config entry and text.
pub fn resolve_variant(
    name: &str,
    variant: &str,
    config: &TemplateConfig,
    config_path: &Path,
    data: String,
) -> Result<Template, StoreError> {
    let entry = config
        .get(variant)
        .ok_or_else(|| StoreError::MissingVariant {
            config: config_path.to_path_buf(),
            variant: variant.to_string(),
        })?
        .clone()
        .unwrap_or_default();
    let output = entry.output.ok_or_else(|| StoreError::MissingOutput {
        config: config_path.to_path_buf(),
        variant: variant.to_string(),
    })?;
    Ok(Template {
        name: name.to_string(),
        variant: variant.to_string(),
        data,
        extension: entry.extension.unwrap_or_default(),
        output,
    })
}

/// Load every template variant under `root`, in sorted collection/file order.
///
/// Collections without `templates/config.yaml` are skipped with a warning;
/// a variant with a bad config entry is skipped on its own.
pub fn load_templates(root: &Path) -> LoadReport<Template> {
    let mut report = LoadReport::default();
    let Some(collections) = store::collections(root, "template") else {
        return report;
    };

    for collection in collections {
        let dir = collection.join(TEMPLATES_DIR);
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.is_file() {
            tracing::warn!("cannot get config file for {}", collection.display());
            continue;
        }
        let config = match fs::read_to_string(&config_path)
            .map_err(|e| StoreError::Io(config_path.clone(), e))
            .and_then(|text| parse_config(&text, &config_path))
        {
            Ok(config) => config,
            Err(e) => {
                report.skip(e);
                continue;
            }
        };
        let files = match store::sorted_entries(&dir) {
            Ok(files) => files,
            Err(e) => {
                report.skip(e);
                continue;
            }
        };

        let name = store::stem(&collection);
        for path in files
            .into_iter()
            .filter(|p| store::has_extension(p, TEMPLATE_EXT))
        {
            let loaded = fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(path.clone(), e))
                .and_then(|data| {
                    resolve_variant(&name, &store::stem(&path), &config, &config_path, data)
                });
            match loaded {
                Ok(template) => report.items.push(template),
                Err(e) => report.skip(e),
            }
        }
    }
    report
}
