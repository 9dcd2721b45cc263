//! Cross-product build of schemes × templates into output files.
//!
//! Each (scheme, template) pairing renders into its own `String` and writes a
//! file no other pairing touches, so pairings run on the blocking pool with no
//! shared mutable state. Variants that would write the same file are collapsed
//! before scheduling. Token tables are derived once per scheme and shared
//! read-only across that scheme's pairings.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

use crate::error::BuildError;
use crate::scheme::Scheme;
use crate::template::Template;
use crate::tokens::{self, TokenMap};

/// Output file prefix shared by every generated file.
pub const OUTPUT_PREFIX: &str = "base16-";

/// Inputs that shape a build beyond the loaded records.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output_root: PathBuf,
    /// Scheme slugs to build; empty builds all.
    pub schemes: Vec<String>,
    /// Template names to build; empty builds all.
    pub templates: Vec<String>,
    /// Maximum pairings in flight.
    pub jobs: usize,
    /// Flips to `true` to stop scheduling new pairings.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl BuildOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            schemes: Vec::new(),
            templates: Vec::new(),
            jobs: 1,
            cancel: None,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Files written, sorted.
    pub written: Vec<PathBuf>,
    pub failed: Vec<BuildError>,
    /// Pairings never started because the build was cancelled.
    pub cancelled: usize,
}

/// `<root>/<template.name>/<template.output>/base16-<slug><extension>`.
pub fn output_path(root: &Path, scheme: &Scheme, template: &Template) -> PathBuf {
    root.join(&template.name)
        .join(&template.output)
        .join(format!("{OUTPUT_PREFIX}{}{}", scheme.slug, template.extension))
}

/// Keep records whose key is in `filter`, or all of them when it is empty.
fn select<'a, T>(items: &'a [T], filter: &[String], key: impl Fn(&T) -> &str) -> Vec<&'a T> {
    if filter.is_empty() {
        return items.iter().collect();
    }
    let wanted: HashSet<&str> = filter.iter().map(String::as_str).collect();
    items.iter().filter(|item| wanted.contains(key(item))).collect()
}

/// Keep one variant per output location. Variants of a collection that share
/// `output` and `extension` would write the same files; the later one wins.
fn distinct_outputs<'a>(templates: Vec<&'a Template>) -> Vec<&'a Template> {
    let mut kept: Vec<&Template> = Vec::with_capacity(templates.len());
    let mut slot_of: HashMap<(PathBuf, &str), usize> = HashMap::new();
    for template in templates {
        let key = (
            Path::new(&template.name).join(&template.output),
            template.extension.as_str(),
        );
        match slot_of.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(template);
            }
            Entry::Occupied(slot) => {
                let replaced = std::mem::replace(&mut kept[*slot.get()], template);
                tracing::warn!(
                    template = %template.name,
                    "variants {} and {} write the same files; using {}",
                    replaced.variant,
                    template.variant,
                    template.variant
                );
            }
        }
    }
    kept
}

/// Write every selected pairing. Individual failures are logged and reported
/// but never stop the remaining pairings.
pub async fn build(
    schemes: &[Scheme],
    templates: &[Template],
    options: &BuildOptions,
) -> BuildReport {
    let selected_schemes: Vec<(Arc<Scheme>, Arc<TokenMap>)> =
        select(schemes, &options.schemes, |s| s.slug.as_str())
            .into_iter()
            .map(|s| (Arc::new(s.clone()), Arc::new(TokenMap::for_scheme(s))))
            .collect();
    let selected_templates: Vec<Arc<Template>> =
        distinct_outputs(select(templates, &options.templates, |t| t.name.as_str()))
            .into_iter()
            .map(|t| Arc::new(t.clone()))
            .collect();

    tracing::info!(
        schemes = selected_schemes.len(),
        templates = selected_templates.len(),
        "building {} pairings",
        selected_schemes.len() * selected_templates.len()
    );

    let limit = Arc::new(Semaphore::new(options.jobs.max(1)));
    let mut tasks = JoinSet::new();
    let mut report = BuildReport::default();

    for (scheme, table) in &selected_schemes {
        for template in &selected_templates {
            let Ok(permit) = limit.clone().acquire_owned().await else {
                break;
            };
            if options.cancelled() {
                report.cancelled += 1;
                continue;
            }
            let path = output_path(&options.output_root, scheme, template);
            let scheme = Arc::clone(scheme);
            let table = Arc::clone(table);
            let template = Arc::clone(template);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                let text = tokens::substitute(&template.data, &table);
                write_atomic(&path, text.as_bytes())
                    .map(|()| path)
                    .map_err(|err| {
                        tracing::warn!(slug = %scheme.slug, template = %template.name, "{err}");
                        err
                    })
            });
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(path)) => report.written.push(path),
            Ok(Err(err)) => report.failed.push(err),
            Err(e) => {
                tracing::warn!("build worker failed: {e}");
                report.failed.push(BuildError::Join(e.to_string()));
            }
        }
    }
    report.written.sort();
    if report.cancelled > 0 {
        tracing::warn!("build cancelled; {} pairings skipped", report.cancelled);
    }
    report
}

static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Write through a sibling temp file and rename so readers never observe a
/// partially written output. Temp names are unique per write, so concurrent
/// writers of one path never share a temp file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| BuildError::Io(dir.to_path_buf(), e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
    let tmp = dir.join(format!(".{file_name}.{}.{seq}.tmp", std::process::id()));
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(BuildError::Io(tmp, e));
    }
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        BuildError::Io(path.to_path_buf(), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;
    use std::collections::BTreeMap;

    fn scheme(slug: &str, colors: &[(&str, &str)]) -> Scheme {
        Scheme {
            slug: slug.into(),
            name: format!("{slug} name"),
            author: "A".into(),
            colors: colors
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn template(name: &str, data: &str, extension: &str, output: &str) -> Template {
        Template {
            name: name.into(),
            variant: "default".into(),
            data: data.into(),
            extension: extension.into(),
            output: output.into(),
        }
    }

    #[test]
    fn output_path_follows_naming_rule() {
        let s = scheme("ocean", &[]);
        let t = template("vim", "", ".vim", "colors");
        assert_eq!(
            output_path(Path::new("out"), &s, &t),
            PathBuf::from("out/vim/colors/base16-ocean.vim")
        );
    }

    #[tokio::test]
    async fn pairings_render_from_unmodified_template() {
        let tmp = TestTempDir::new("builder-private");
        let t = template("x", "{{base00-hex}}", "", ".");
        let schemes = vec![
            scheme("a", &[("base00", "aaaaaa")]),
            scheme("b", &[("base00", "bbbbbb")]),
        ];
        let mut options = BuildOptions::new(tmp.path());
        options.jobs = 2;
        let report = build(&schemes, std::slice::from_ref(&t), &options).await;
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        let read = |p: &str| fs::read_to_string(tmp.child(p)).expect("read");
        assert_eq!(read("x/base16-a"), "aaaaaa");
        assert_eq!(read("x/base16-b"), "bbbbbb");
        assert_eq!(t.data, "{{base00-hex}}");
    }

    #[test]
    fn distinct_outputs_keeps_later_variant_per_location() {
        let mut light = template("xres", "light", ".Xresources", "out");
        light.variant = "light".into();
        let mut dark = template("xres", "dark", ".Xresources", "./out");
        dark.variant = "dark".into();
        let mut other = template("xres", "256", ".Xresources", "out-256");
        other.variant = "256".into();
        let kept = distinct_outputs(vec![&light, &other, &dark]);
        let variants: Vec<&str> = kept.iter().map(|t| t.variant.as_str()).collect();
        assert_eq!(variants, vec!["dark", "256"]);
    }

    #[tokio::test]
    async fn variants_sharing_an_output_file_do_not_fail() {
        let tmp = TestTempDir::new("builder-same-path");
        let big = "x".repeat(256 * 1024);
        let mut first = template("xres", &format!("first {big}"), ".Xresources", "out");
        first.variant = "a".into();
        let mut second = template("xres", "second {{scheme-slug}}", ".Xresources", "out");
        second.variant = "b".into();
        let templates = vec![first, second];
        let schemes: Vec<Scheme> = (0..4).map(|i| scheme(&format!("s{i}"), &[])).collect();
        let mut options = BuildOptions::new(tmp.path());
        options.jobs = 4;

        for _ in 0..20 {
            let report = build(&schemes, &templates, &options).await;
            assert!(report.failed.is_empty(), "{:?}", report.failed);
            assert_eq!(report.written.len(), schemes.len());
        }
        let text = fs::read_to_string(tmp.child("xres/out/base16-s2.Xresources")).expect("read");
        assert_eq!(text, "second s2");
        let leftovers = fs::read_dir(tmp.child("xres/out"))
            .expect("dir")
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn concurrent_writes_to_one_path_all_succeed() {
        let tmp = TestTempDir::new("builder-atomic");
        let path = tmp.child("out/base16-a.conf");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                let body = i.to_string().repeat(4096);
                std::thread::spawn(move || write_atomic(&path, body.as_bytes()))
            })
            .collect();
        for handle in handles {
            handle.join().expect("join").expect("write");
        }
        let text = fs::read_to_string(&path).expect("read");
        assert_eq!(text.len(), 4096);
    }

    #[test]
    fn select_with_empty_filter_keeps_everything() {
        let items = vec![scheme("a", &[]), scheme("b", &[])];
        assert_eq!(select(&items, &[], |s| s.slug.as_str()).len(), 2);
        let only_b = select(&items, &["b".to_string()], |s| s.slug.as_str());
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].slug, "b");
    }

    #[tokio::test]
    async fn build_writes_cross_product() {
        let tmp = TestTempDir::new("builder-cross");
        let schemes = vec![
            scheme("a", &[("base00", "000000")]),
            scheme("b", &[("base00", "111111")]),
            scheme("c", &[("base00", "222222")]),
        ];
        let templates = vec![
            template("vim", "{{base00-hex}}", ".vim", "colors"),
            template("kitty", "{{scheme-slug}}", ".conf", "."),
        ];
        let mut options = BuildOptions::new(tmp.path());
        options.jobs = 4;

        let report = build(&schemes, &templates, &options).await;
        assert!(report.failed.is_empty(), "{:?}", report.failed);
        assert_eq!(report.written.len(), 6);
        let kitty_b = tmp.child("kitty/base16-b.conf");
        assert_eq!(fs::read_to_string(kitty_b).expect("read"), "b");
        let vim_c = tmp.child("vim/colors/base16-c.vim");
        assert_eq!(fs::read_to_string(vim_c).expect("read"), "222222");
    }

    #[tokio::test]
    async fn build_honors_template_filter() {
        let tmp = TestTempDir::new("builder-filter");
        let schemes = vec![scheme("a", &[])];
        let templates = vec![
            template("vim", "v", "", "."),
            template("kitty", "k", "", "."),
        ];
        let mut options = BuildOptions::new(tmp.path());
        options.templates = vec!["kitty".into()];
        let report = build(&schemes, &templates, &options).await;
        assert_eq!(report.written, vec![tmp.child("kitty/./base16-a")]);
        assert!(!tmp.child("vim").exists());
    }

    #[tokio::test]
    async fn failed_pairing_does_not_block_others() {
        let tmp = TestTempDir::new("builder-fail");
        // A regular file where a directory is needed makes one template unwritable.
        tmp.write_text("blocked", "file");
        let schemes = vec![scheme("a", &[])];
        let templates = vec![
            template("blocked", "x", "", "sub"),
            template("ok", "y", "", "."),
        ];
        let report = build(&schemes, &templates, &BuildOptions::new(tmp.path())).await;
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.written.len(), 1);
        assert_eq!(fs::read_to_string(tmp.child("ok/base16-a")).expect("read"), "y");
    }

    #[tokio::test]
    async fn cancelled_build_schedules_nothing() {
        let tmp = TestTempDir::new("builder-cancel");
        let (tx, rx) = watch::channel(false);
        tx.send(true).expect("send");
        let mut options = BuildOptions::new(tmp.path());
        options.cancel = Some(rx);
        let schemes = vec![scheme("a", &[]), scheme("b", &[])];
        let templates = vec![template("t", "x", "", ".")];
        let report = build(&schemes, &templates, &options).await;
        assert!(report.written.is_empty());
        assert_eq!(report.cancelled, 2);
    }

    #[tokio::test]
    async fn rebuild_overwrites_with_identical_bytes() {
        let tmp = TestTempDir::new("builder-idem");
        let schemes = vec![scheme("a", &[("base00", "ff8000")])];
        let templates = vec![template("t", "{{base00-dec-g}} {{base00-hex-bgr}}", ".txt", ".")];
        let options = BuildOptions::new(tmp.path());
        build(&schemes, &templates, &options).await;
        let first = fs::read(tmp.child("t/base16-a.txt")).expect("read");
        build(&schemes, &templates, &options).await;
        let second = fs::read(tmp.child("t/base16-a.txt")).expect("read");
        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).expect("utf8"), "0.501961 0080ff");
    }
}
