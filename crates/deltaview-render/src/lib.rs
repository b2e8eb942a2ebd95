//! Structural diff renderer for JSON documents.
//!
//! Given two documents and the nested delta describing their differences,
//! produces a deterministic line-based rendering: added, removed and context
//! lines with reconstructed brackets and commas, unchanged stretches collapsed
//! into `...` markers.
//!
//! # Key Types
//!
//! - [`render_lines`] / [`render`] -- Structural renderer (lines / HTML markup)
//! - [`DiffRendering`] -- Ordered line sequence produced by one render
//! - [`LineEmitter`] -- HTML, terminal and plain-text line emission
//! - [`DiffEngine`] / [`build_diff`] -- Parse, canonicalize, diff and render pipeline
//! - [`RenderConfig`] -- Indentation, depth limit and decoding mode
//!
//! # Quick Start
//!
//! ```rust
//! use deltaview_render::{render_lines, PlainEmitter, RenderConfig};
//! use deltaview_types::Delta;
//! use serde_json::json;
//!
//! let from = json!({"a": 1, "b": 2});
//! let to = json!({"a": 1, "b": 3});
//! let delta = Delta::decode(&json!({"b": [2, 3]}));
//!
//! let rendering = render_lines(&from, &to, &delta, &RenderConfig::default());
//! assert_eq!(rendering.additions(), 1);
//! assert_eq!(rendering.removals(), 1);
//! println!("{}", rendering.to_markup(&PlainEmitter::default()));
//! ```

pub mod canonical;
pub mod config;
pub mod emit;
pub mod error;
pub mod pipeline;
pub mod pretty;
pub mod sink;
pub mod structural;

pub use canonical::{parse_document, parse_json, sort_keys};
pub use config::RenderConfig;
pub use emit::{escape_html, no_changes_markup, HtmlEmitter, LineEmitter, PlainEmitter, TerminalEmitter};
pub use error::{RenderError, RenderResult, Side};
pub use pipeline::{build_diff, render_delta, DiffEngine, DiffOutcome};
pub use pretty::{pretty_entry, pretty_lines};
pub use sink::{DiffRendering, LineSink};
pub use structural::{render, render_lines};
