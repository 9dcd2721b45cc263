//! base16-forge: build base16 colorschemes for many applications.
//!
//! Schemes (16-color palettes) and templates (per-application text with
//! `{{placeholder}}` tokens) are fetched from upstream repositories into a
//! cache directory, loaded, and cross-produced into output files.
//!
//! # Quick start
//!
//! ```no_run
//! use base16_forge::builder::{build, BuildOptions};
//! use base16_forge::config::load_config;
//! use base16_forge::scheme::load_schemes;
//! use base16_forge::template::load_templates;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let schemes = load_schemes(&config.schemes_dir()).items;
//! let templates = load_templates(&config.templates_dir()).items;
//! let report = build(&schemes, &templates, &BuildOptions::new(&config.output_dir)).await;
//! println!("wrote {} files", report.written.len());
//! # }
//! ```

pub mod build_info;
pub mod builder;
pub mod color;
pub mod config;
pub mod error;
pub mod list;
pub mod render;
pub mod scheme;
pub mod store;
pub mod sync;
pub mod template;
#[cfg(test)]
pub mod testsupport;
pub mod tokens;
