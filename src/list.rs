//! `list` output: scheme slugs and template names in terminal-width columns.

use crate::scheme::Scheme;
use crate::template::Template;

/// Width assumed when the terminal size cannot be queried (pipes, CI).
pub const FALLBACK_WIDTH: u16 = 80;

/// Which sections to print and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub schemes: bool,
    pub templates: bool,
    /// One name per line instead of columns.
    pub raw: bool,
}

impl ListOptions {
    /// `-s` alone shows schemes, `-t` alone shows templates; neither or both
    /// shows both.
    pub fn from_flags(schemes: bool, templates: bool, raw: bool) -> Self {
        let both = schemes == templates;
        Self {
            schemes: both || schemes,
            templates: both || templates,
            raw,
        }
    }
}

/// Current terminal width in columns.
pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .ok()
        .filter(|cols| *cols > 0)
        .unwrap_or(FALLBACK_WIDTH)
}

/// Scheme slugs in load order.
pub fn scheme_names(schemes: &[Scheme]) -> Vec<String> {
    schemes.iter().map(|s| s.slug.clone()).collect()
}

/// Distinct template names; variants of one collection list once.
pub fn template_names(templates: &[Template]) -> Vec<String> {
    let mut names: Vec<String> = templates.iter().map(|t| t.name.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Lay `names` out left-aligned in columns of `longest + 1` characters.
pub fn columnize(names: &[String], width: u16) -> String {
    let Some(longest) = names.iter().map(|n| n.chars().count()).max() else {
        return String::new();
    };
    let cell = longest + 1;
    let per_row = (usize::from(width) / cell).max(1);
    let mut out = String::new();
    for row in names.chunks(per_row) {
        let line: String = row.iter().map(|name| format!("{name:<cell$}")).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn section(names: &[String], opts: ListOptions, width: u16) -> String {
    if opts.raw {
        names.iter().map(|n| format!("{n}\n")).collect()
    } else {
        columnize(names, width)
    }
}

/// Full `list` output for the selected sections.
pub fn render_listing(
    schemes: &[Scheme],
    templates: &[Template],
    opts: ListOptions,
    width: u16,
) -> String {
    let mut out = String::new();
    let headers = opts.schemes && opts.templates;
    if opts.schemes {
        if headers {
            out.push_str("--- scheme ---\n");
        }
        out.push_str(&section(&scheme_names(schemes), opts, width));
    }
    if opts.templates {
        if headers {
            out.push_str("--- template ---\n");
        }
        out.push_str(&section(&template_names(templates), opts, width));
    }
    out
}
