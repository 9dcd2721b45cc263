//! Terminal renderer for user-facing status lines.
//!
//! Diagnostics go through `tracing`; this covers the few lines a user is
//! always meant to see (fatal errors and end-of-command summaries). Every
//! line goes to stderr so stdout stays clean for `list` output.

use crossterm::style::{Color, Stylize};

pub const LABEL_WARNING: &str = "warning:";
pub const LABEL_ERROR: &str = "error:";
pub const GLYPH_DONE: &str = "\u{2022}";

/// Stderr renderer with optional ANSI styling.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Create a renderer with optional color output.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Print a warning line.
    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.labeled(LABEL_WARNING, Color::Yellow, msg));
    }

    /// Print an error line.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.labeled(LABEL_ERROR, Color::Red, msg));
    }

    /// Print a completion summary line.
    pub fn done(&self, msg: &str) {
        eprintln!("{}", self.labeled(GLYPH_DONE, Color::Green, msg));
    }

    fn labeled(&self, label: &str, color: Color, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", label.with(color).bold())
        } else {
            format!("{label} {msg}")
        }
    }
}
