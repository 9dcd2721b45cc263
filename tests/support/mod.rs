//! On-disk cache fixture shared by the integration tests.
//!
//! Lays out `<cache>/schemes` and `<cache>/templates` the way `update` would
//! and builds into `<root>/out`.

use base16_forge::builder::{build, BuildOptions, BuildReport};
use base16_forge::scheme::load_schemes;
use base16_forge::template::load_templates;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new(prefix: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("base16-forge-it-{prefix}-"))
            .tempdir()
            .expect("fixture root");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    /// A scheme file with quoted colors.
    pub fn scheme(&self, collection: &str, slug: &str, name: &str, colors: &[(&str, &str)]) {
        let mut text = format!("scheme: \"{name}\"\nauthor: \"A\"\n");
        for (base, hex) in colors {
            text.push_str(&format!("{base}: \"{hex}\"\n"));
        }
        self.scheme_text(collection, slug, &text);
    }

    pub fn scheme_text(&self, collection: &str, slug: &str, text: &str) {
        self.write(&format!("cache/schemes/{collection}/{slug}.yaml"), text);
    }

    /// A single-variant (`default`) template collection.
    pub fn template(&self, name: &str, extension: &str, output: &str, data: &str) {
        self.write(
            &format!("cache/templates/{name}/templates/config.yaml"),
            &format!("default:\n  extension: \"{extension}\"\n  output: \"{output}\"\n"),
        );
        self.write(
            &format!("cache/templates/{name}/templates/default.mustache"),
            data,
        );
    }

    pub fn out(&self) -> PathBuf {
        self.root().join("out")
    }

    pub async fn build_report(
        &self,
        schemes: &[&str],
        templates: &[&str],
        jobs: usize,
    ) -> BuildReport {
        let loaded_schemes = load_schemes(&self.root().join("cache/schemes")).items;
        let loaded_templates = load_templates(&self.root().join("cache/templates")).items;
        let mut options = BuildOptions::new(self.out());
        options.schemes = schemes.iter().map(|s| s.to_string()).collect();
        options.templates = templates.iter().map(|s| s.to_string()).collect();
        options.jobs = jobs;
        build(&loaded_schemes, &loaded_templates, &options).await
    }

    /// Build with four workers and require every pairing to succeed.
    pub async fn build(&self, schemes: &[&str], templates: &[&str]) -> Vec<PathBuf> {
        let report = self.build_report(schemes, templates, 4).await;
        assert!(report.failed.is_empty(), "failures: {:?}", report.failed);
        report.written
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
