//! Structural diff renderer.
//!
//! Walks an object delta together with the `from` and `to` documents and
//! produces one merged line sequence: unchanged keys collapse into `...`
//! runs, added and removed entries are pretty-printed as whole blocks,
//! modifications become a removal followed by an addition, and nested
//! object/array deltas recurse.
//!
//! Array deltas are rendered as two blocks (all removals, then all
//! additions) with unchanged elements always elided. Moves are invisible.

use std::collections::{BTreeMap, BTreeSet};

use deltaview_types::{ArrayEntry, ArrayKey, Delta, JsonValue, LineType};
use serde_json::Map;
use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::emit::HtmlEmitter;
use crate::pretty::{key_prefix, pretty_entry, pretty_lines};
use crate::sink::{DiffRendering, LineSink};

type JsonMap = Map<String, JsonValue>;

/// Every entry inside a partially diffed container ends with a comma.
const ENTRY_TRAILING: &str = ",";

/// Render a diff as typed lines.
///
/// Only an object delta renders anything: the outermost compared values are
/// objects, so any other top-level shape yields an empty rendering.
pub fn render_lines(
    from: &JsonValue,
    to: &JsonValue,
    delta: &Delta,
    config: &RenderConfig,
) -> DiffRendering {
    let mut sink = LineSink::new();
    match delta {
        Delta::Object(entries) => {
            let renderer = StructuralRenderer { config };
            renderer.render_object(
                None,
                from.as_object(),
                to.as_object(),
                entries,
                0,
                "",
                &mut sink,
            );
        }
        other => {
            debug!(kind = %other.kind(), "top-level delta is not an object delta; nothing to render");
        }
    }

    let rendering = sink.finish();
    debug!(
        lines = rendering.len(),
        additions = rendering.additions(),
        removals = rendering.removals(),
        truncated = rendering.truncated,
        "rendered structural diff"
    );
    rendering
}

/// Render a diff as HTML markup, one `diff-line` block per line.
pub fn render(from: &JsonValue, to: &JsonValue, delta: &Delta, config: &RenderConfig) -> String {
    render_lines(from, to, delta, config).to_markup(&HtmlEmitter::from_config(config))
}

struct StructuralRenderer<'a> {
    config: &'a RenderConfig,
}

impl StructuralRenderer<'_> {
    /// Render an object delta. `key` prefixes the opening brace when the
    /// object is the value of an entry in its parent.
    #[allow(clippy::too_many_arguments)]
    fn render_object(
        &self,
        key: Option<&str>,
        from: Option<&JsonMap>,
        to: Option<&JsonMap>,
        entries: &BTreeMap<String, Delta>,
        indent: usize,
        trailing: &str,
        sink: &mut LineSink,
    ) {
        let prefix = key.map(key_prefix).unwrap_or_default();
        sink.context(indent, format!("{prefix}{{"));

        let keys: BTreeSet<&str> = from
            .into_iter()
            .chain(to)
            .flat_map(|map| map.keys().map(String::as_str))
            .collect();

        let mut in_unchanged_run = false;
        for key in keys {
            let changed = match entries.get(key) {
                Some(delta) => self.render_entry(
                    key,
                    delta,
                    from.and_then(|m| m.get(key)),
                    to.and_then(|m| m.get(key)),
                    indent + 1,
                    sink,
                ),
                None => false,
            };

            if changed {
                in_unchanged_run = false;
            } else if !in_unchanged_run {
                sink.context(indent + 1, self.config.ellipsis.as_str());
                in_unchanged_run = true;
            }
        }

        sink.context(indent, format!("}}{trailing}"));
    }

    /// Render one keyed entry of an object delta. Returns `false` if the
    /// entry produced no lines and belongs to an unchanged run.
    fn render_entry(
        &self,
        key: &str,
        delta: &Delta,
        from: Option<&JsonValue>,
        to: Option<&JsonValue>,
        indent: usize,
        sink: &mut LineSink,
    ) -> bool {
        let config = self.config;
        match delta {
            Delta::Added(value) => {
                pretty_entry(key, value, indent, LineType::Added, ENTRY_TRAILING, config, sink);
            }
            Delta::Deleted(value) => {
                pretty_entry(key, value, indent, LineType::Removed, ENTRY_TRAILING, config, sink);
            }
            Delta::Modified { old, new } => {
                pretty_entry(key, old, indent, LineType::Removed, ENTRY_TRAILING, config, sink);
                pretty_entry(key, new, indent, LineType::Added, ENTRY_TRAILING, config, sink);
            }
            Delta::Object(_) | Delta::Array(_) if indent >= config.max_depth => {
                self.elide_nested(key, delta, indent, sink);
            }
            Delta::Object(entries) => {
                self.render_object(
                    Some(key),
                    from.and_then(JsonValue::as_object),
                    to.and_then(JsonValue::as_object),
                    entries,
                    indent,
                    ENTRY_TRAILING,
                    sink,
                );
            }
            Delta::Array(entries) => {
                sink.context(indent, format!("{}[", key_prefix(key)));
                let to_len = to.and_then(JsonValue::as_array).map_or(0, Vec::len);
                self.render_array(entries, to_len, indent + 1, sink);
                sink.context(indent, format!("]{ENTRY_TRAILING}"));
            }
            Delta::Moved { .. } | Delta::Unrecognized(_) | Delta::Truncated => return false,
        }
        true
    }

    /// Interior lines of an array delta: removed elements, then added
    /// elements, framed by ellipses where unchanged elements are hidden.
    fn render_array(&self, entries: &[ArrayEntry], to_len: usize, indent: usize, sink: &mut LineSink) {
        let mut removed: Vec<(usize, &JsonValue)> = Vec::new();
        let mut added: Vec<(usize, &JsonValue)> = Vec::new();
        for entry in entries {
            match (entry.key, &entry.delta) {
                (ArrayKey::Old(index), Delta::Deleted(value)) => removed.push((index, value)),
                (ArrayKey::New(index), Delta::Added(value)) => added.push((index, value)),
                _ => {}
            }
        }
        removed.sort_by_key(|(index, _)| *index);
        added.sort_by_key(|(index, _)| *index);

        let ellipsis = self.config.ellipsis.as_str();
        let mut context_shown = false;
        for (index, value) in &removed {
            if !context_shown && *index > 0 {
                sink.context(indent, ellipsis);
                context_shown = true;
            }
            pretty_lines(value, indent, LineType::Removed, ENTRY_TRAILING, self.config, sink);
        }
        for (_, value) in &added {
            if !context_shown {
                sink.context(indent, ellipsis);
                context_shown = true;
            }
            pretty_lines(value, indent, LineType::Added, ENTRY_TRAILING, self.config, sink);
        }

        if added.len() + removed.len() < to_len {
            sink.context(indent, ellipsis);
        }
    }

    /// Balanced stand-in for a nested delta past the depth limit.
    fn elide_nested(&self, key: &str, delta: &Delta, indent: usize, sink: &mut LineSink) {
        warn!(key, indent, max_depth = self.config.max_depth, "nesting limit reached; eliding nested delta");
        let (open, close) = match delta {
            Delta::Array(_) => ('[', ']'),
            _ => ('{', '}'),
        };
        sink.context(indent, format!("{}{open}", key_prefix(key)));
        sink.context(indent + 1, self.config.ellipsis.as_str());
        sink.context(indent, format!("{close}{ENTRY_TRAILING}"));
        sink.mark_truncated();
    }
}
