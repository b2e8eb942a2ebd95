//! Line emission: turn typed lines into display text.
//!
//! Every emitter renders a gutter glyph (`+`, `-` or a space) and the line's
//! content padded by `indent_width` spaces per indent level. Lines are joined
//! with `\n`.

use colored::Colorize;
use deltaview_types::{Line, LineType};

use crate::config::RenderConfig;

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Markup shown by callers when the two documents are identical.
pub fn no_changes_markup() -> &'static str {
    r#"<div class="diff-no-changes">No changes</div>"#
}

fn padding(indent: usize, width: usize) -> String {
    " ".repeat(indent * width)
}

/// Renders lines into a display format.
pub trait LineEmitter {
    /// Render a single line.
    fn emit_line(&self, line: &Line) -> String;

    /// Render every line, newline-joined.
    fn emit(&self, lines: &[Line]) -> String {
        lines
            .iter()
            .map(|line| self.emit_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `<div class="diff-line diff-line-{type}">` blocks with gutter and content
/// spans. Content is HTML-escaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HtmlEmitter {
    pub indent_width: usize,
}

impl HtmlEmitter {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            indent_width: config.indent_width,
        }
    }
}

impl Default for HtmlEmitter {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl LineEmitter for HtmlEmitter {
    fn emit_line(&self, line: &Line) -> String {
        format!(
            "<div class=\"diff-line diff-line-{}\"><span class=\"diff-gutter\">{}</span><span class=\"diff-content\">{}{}</span></div>",
            line.line_type.css_suffix(),
            line.line_type.gutter(),
            padding(line.indent, self.indent_width),
            escape_html(&line.content),
        )
    }
}

/// ANSI-colored text: green additions, red removals, dimmed context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalEmitter {
    pub indent_width: usize,
}

impl TerminalEmitter {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            indent_width: config.indent_width,
        }
    }
}

impl Default for TerminalEmitter {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl LineEmitter for TerminalEmitter {
    fn emit_line(&self, line: &Line) -> String {
        let text = format!(
            "{} {}{}",
            line.line_type.gutter(),
            padding(line.indent, self.indent_width),
            line.content
        );
        match line.line_type {
            LineType::Added => text.green().to_string(),
            LineType::Removed => text.red().to_string(),
            LineType::Context => text.dimmed().to_string(),
        }
    }
}

/// Uncolored text, one `gutter + padding + content` row per line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlainEmitter {
    pub indent_width: usize,
}

impl PlainEmitter {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            indent_width: config.indent_width,
        }
    }
}

impl Default for PlainEmitter {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl LineEmitter for PlainEmitter {
    fn emit_line(&self, line: &Line) -> String {
        format!(
            "{} {}{}",
            line.line_type.gutter(),
            padding(line.indent, self.indent_width),
            line.content
        )
    }
}
