use std::fmt;

use serde::{Deserialize, Serialize};

/// How a rendered line relates to the two compared documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// Present only in the `to` document.
    Added,
    /// Present only in the `from` document.
    Removed,
    /// Unchanged structure: brackets and elided runs.
    Context,
}

impl LineType {
    /// Gutter glyph shown left of the content.
    pub fn gutter(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Context => ' ',
        }
    }

    /// Suffix of the `diff-line-*` style class.
    pub fn css_suffix(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Context => "context",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_suffix())
    }
}

/// One line of a rendered diff.
///
/// `content` is raw text without indentation; escaping and padding are
/// applied when the line is emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub line_type: LineType,
    pub indent: usize,
    pub content: String,
}

impl Line {
    pub fn new(line_type: LineType, indent: usize, content: impl Into<String>) -> Self {
        Self {
            line_type,
            indent,
            content: content.into(),
        }
    }

    pub fn context(indent: usize, content: impl Into<String>) -> Self {
        Self::new(LineType::Context, indent, content)
    }

    /// Returns `true` if this line marks an elided run of unchanged entries.
    pub fn is_ellipsis(&self, marker: &str) -> bool {
        self.line_type == LineType::Context && self.content == marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gutter_glyphs() {
        assert_eq!(LineType::Added.gutter(), '+');
        assert_eq!(LineType::Removed.gutter(), '-');
        assert_eq!(LineType::Context.gutter(), ' ');
    }

    #[test]
    fn display_matches_css_suffix() {
        assert_eq!(LineType::Removed.to_string(), "removed");
        assert_eq!(format!("diff-line-{}", LineType::Added), "diff-line-added");
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let line = Line::new(LineType::Added, 2, "\"a\": 1,");
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["line_type"], "added");
        let parsed: Line = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, line);
    }

    #[test]
    fn ellipsis_detection_requires_context() {
        assert!(Line::context(1, "...").is_ellipsis("..."));
        assert!(!Line::new(LineType::Added, 1, "...").is_ellipsis("..."));
        assert!(!Line::context(1, "{").is_ellipsis("..."));
    }
}
