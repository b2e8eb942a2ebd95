//! Diff pipeline: parse, canonicalize, diff, decode, render.
//!
//! The structural diff algorithm is not part of this crate. It is supplied
//! by the caller through [`DiffEngine`] and treated as a black box whose
//! output must follow the delta wire contract.

use deltaview_types::{Delta, JsonValue};
use tracing::{debug, warn};

use crate::canonical::{parse_document, sort_keys};
use crate::config::RenderConfig;
use crate::error::{RenderResult, Side};
use crate::sink::DiffRendering;
use crate::structural::render_lines;

/// An external structural diff algorithm.
///
/// Implementations receive canonicalized documents and return a raw delta,
/// or `None` when the documents are deep-equal.
pub trait DiffEngine {
    fn diff(&self, from: &JsonValue, to: &JsonValue) -> Option<JsonValue>;
}

impl<F> DiffEngine for F
where
    F: Fn(&JsonValue, &JsonValue) -> Option<JsonValue>,
{
    fn diff(&self, from: &JsonValue, to: &JsonValue) -> Option<JsonValue> {
        self(from, to)
    }
}

/// The result of comparing two documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffOutcome {
    /// The documents are identical; callers show a "no changes" indicator
    /// instead of a rendering.
    NoChanges,
    /// The documents differ.
    Changes(DiffRendering),
}

impl DiffOutcome {
    pub fn is_no_changes(&self) -> bool {
        matches!(self, Self::NoChanges)
    }

    pub fn rendering(&self) -> Option<&DiffRendering> {
        match self {
            Self::NoChanges => None,
            Self::Changes(rendering) => Some(rendering),
        }
    }
}

/// Render an already computed delta.
///
/// An absent delta, or a JSON `null` delta, means the documents are
/// identical and the renderer is not invoked.
pub fn render_delta(
    from: &JsonValue,
    to: &JsonValue,
    delta: Option<&JsonValue>,
    config: &RenderConfig,
) -> RenderResult<DiffOutcome> {
    let raw = match delta {
        None | Some(JsonValue::Null) => {
            debug!("no delta; documents are identical");
            return Ok(DiffOutcome::NoChanges);
        }
        Some(raw) => raw,
    };

    let delta = if config.strict_deltas {
        Delta::decode_strict_with_limit(raw, config.max_depth).map_err(|e| {
            warn!(error = %e, "strict delta decoding rejected input");
            e
        })?
    } else {
        Delta::decode_with_limit(raw, config.max_depth)
    };

    Ok(DiffOutcome::Changes(render_lines(from, to, &delta, config)))
}

/// Parse both documents, canonicalize them, run `engine`, and render.
pub fn build_diff(
    engine: &dyn DiffEngine,
    from_text: &str,
    to_text: &str,
    config: &RenderConfig,
) -> RenderResult<DiffOutcome> {
    let from = sort_keys(&parse_document(from_text, Side::From)?);
    let to = sort_keys(&parse_document(to_text, Side::To)?);

    let delta = engine.diff(&from, &to);
    render_delta(&from, &to, delta.as_ref(), config)
}
