use std::path::Path;

use deltaview_types::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Largest accepted `indent_width`.
pub const MAX_INDENT_WIDTH: usize = 16;
/// Largest accepted `max_depth`.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Configuration for rendering a structural diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces of padding per indent level when lines are emitted.
    pub indent_width: usize,
    /// Deepest nesting level rendered in full. Containers below it are
    /// elided and the rendering is flagged as truncated.
    pub max_depth: usize,
    /// Reject delta nodes that match no known shape instead of treating
    /// them as unchanged.
    pub strict_deltas: bool,
    /// Marker text for a collapsed run of unchanged entries.
    pub ellipsis: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_deltas: false,
            ellipsis: "...".into(),
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> RenderResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !(1..=MAX_INDENT_WIDTH).contains(&self.indent_width) {
            return Err(RenderError::Config(format!(
                "indent_width must be between 1 and {MAX_INDENT_WIDTH}"
            )));
        }
        if !(1..=MAX_DEPTH_LIMIT).contains(&self.max_depth) {
            return Err(RenderError::Config(format!(
                "max_depth must be between 1 and {MAX_DEPTH_LIMIT}"
            )));
        }
        if self.ellipsis.is_empty() {
            return Err(RenderError::Config("ellipsis must not be empty".into()));
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> RenderResult<String> {
        toml::to_string(self).map_err(|e| RenderError::Config(e.to_string()))
    }
}
