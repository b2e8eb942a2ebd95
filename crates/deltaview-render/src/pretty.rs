//! Canonical pretty-printer: one JSON value, no diff, as typed lines.
//!
//! Used wholesale for added and removed subtrees, and for keyed entries
//! inside a partially diffed object, where the opening line carries the
//! `"key": ` prefix.

use deltaview_types::{JsonValue, LineType};
use tracing::warn;

use crate::config::RenderConfig;
use crate::sink::LineSink;

/// How a value starts on its first line.
enum Opening {
    /// The whole value fits on one line (scalars, empty containers).
    Inline(String),
    /// A non-empty container past the depth limit, collapsed to one line.
    Elided(String),
    /// A non-empty container spanning several lines.
    Block { open: char, close: char },
}

fn opening(value: &JsonValue, indent: usize, config: &RenderConfig) -> Opening {
    let (open, close, empty) = match value {
        JsonValue::Array(items) => ('[', ']', items.is_empty()),
        JsonValue::Object(map) => ('{', '}', map.is_empty()),
        scalar => return Opening::Inline(scalar.to_string()),
    };
    if empty {
        Opening::Inline(format!("{open}{close}"))
    } else if indent >= config.max_depth {
        Opening::Elided(format!("{open}{}{close}", config.ellipsis))
    } else {
        Opening::Block { open, close }
    }
}

/// `"key": ` with the key JSON-quoted.
pub(crate) fn key_prefix(key: &str) -> String {
    format!("{}: ", JsonValue::String(key.to_owned()))
}

fn separator(index: usize, len: usize) -> &'static str {
    if index + 1 < len {
        ","
    } else {
        ""
    }
}

/// Render `value` starting at `indent`. `trailing` is appended to the last
/// line only (the value itself, or its closing bracket).
pub fn pretty_lines(
    value: &JsonValue,
    indent: usize,
    line_type: LineType,
    trailing: &str,
    config: &RenderConfig,
    sink: &mut LineSink,
) {
    write_value("", value, indent, line_type, trailing, config, sink);
}

/// Render `"key": value` starting at `indent`. Scalars and empty containers
/// stay on the key line; other containers open on it.
pub fn pretty_entry(
    key: &str,
    value: &JsonValue,
    indent: usize,
    line_type: LineType,
    trailing: &str,
    config: &RenderConfig,
    sink: &mut LineSink,
) {
    write_value(&key_prefix(key), value, indent, line_type, trailing, config, sink);
}

fn write_value(
    prefix: &str,
    value: &JsonValue,
    indent: usize,
    line_type: LineType,
    trailing: &str,
    config: &RenderConfig,
    sink: &mut LineSink,
) {
    match opening(value, indent, config) {
        Opening::Inline(text) => sink.push(line_type, indent, format!("{prefix}{text}{trailing}")),
        Opening::Elided(text) => {
            warn!(indent, max_depth = config.max_depth, "nesting limit reached; eliding container");
            sink.mark_truncated();
            sink.push(line_type, indent, format!("{prefix}{text}{trailing}"));
        }
        Opening::Block { open, close } => {
            sink.push(line_type, indent, format!("{prefix}{open}"));
            match value {
                JsonValue::Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let comma = separator(i, items.len());
                        write_value("", item, indent + 1, line_type, comma, config, sink);
                    }
                }
                JsonValue::Object(map) => {
                    for (i, (key, item)) in map.iter().enumerate() {
                        let comma = separator(i, map.len());
                        pretty_entry(key, item, indent + 1, line_type, comma, config, sink);
                    }
                }
                _ => {}
            }
            sink.push(line_type, indent, format!("{close}{trailing}"));
        }
    }
}
