//! Placeholder token tables and `{{name}}` substitution.
//!
//! Substitution is a single left-to-right scan with exact-name lookup. Values
//! are never rescanned, and a name only matches when the whole text between
//! the braces equals it, so `{{base00-hex}}` cannot match inside
//! `{{base00-hex-bgr}}`. Unknown placeholders are copied through verbatim.

use std::collections::HashMap;

use crate::color;
use crate::scheme::Scheme;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Token name → replacement value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    values: HashMap<String, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every token one scheme contributes: eleven per color plus
    /// `scheme-slug`, `scheme-name`, and `scheme-author`.
    pub fn for_scheme(scheme: &Scheme) -> Self {
        let mut map = Self::new();
        for (base_id, hex) in &scheme.colors {
            map.extend(color::derive(hex).named(base_id));
        }
        map.insert("scheme-slug", &scheme.slug);
        map.insert("scheme-name", &scheme.name);
        map.insert("scheme-author", &scheme.author);
        map
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Extend<(String, String)> for TokenMap {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

/// Return a copy of `text` with every known `{{name}}` replaced.
pub fn substitute(text: &str, tokens: &TokenMap) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let value = after_open
            .find(CLOSE)
            .and_then(|end| tokens.get(&after_open[..end]).map(|v| (end, v)));
        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Advance one brace so `{{{name}}}` still resolves the inner token.
                out.push('{');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}
