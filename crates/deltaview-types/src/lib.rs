//! Foundation types for deltaview.
//!
//! This crate defines the data model shared by the renderer and the CLI: the
//! JSON value alias, the decoded structural delta, and the typed output line.
//!
//! # Key Types
//!
//! - [`JsonValue`] - A parsed JSON document (`serde_json::Value`)
//! - [`Delta`] - A structural diff node, decoded once from its wire shape
//! - [`DeltaKind`] - The variant a raw delta node classifies as
//! - [`ArrayEntry`] / [`ArrayKey`] - Per-index entries of an array delta
//! - [`Line`] / [`LineType`] - One rendered diff line

pub mod delta;
pub mod error;
pub mod line;

pub use delta::{
    classify, is_added, is_array_delta, is_deleted, is_modified, is_moved, is_object_delta,
    ArrayEntry, ArrayKey, Delta, DeltaKind, ARRAY_MARKER_FIELD, DEFAULT_MAX_DEPTH,
};
pub use error::{TypeError, TypeResult};
pub use line::{Line, LineType};

/// A parsed JSON document.
pub type JsonValue = serde_json::Value;
