//! Line accumulation for a single render.

use deltaview_types::{Line, LineType};

use crate::emit::LineEmitter;

/// Output buffer threaded by `&mut` through the recursive renderers.
#[derive(Debug, Default)]
pub struct LineSink {
    lines: Vec<Line>,
    truncated: bool,
}

impl LineSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line_type: LineType, indent: usize, content: impl Into<String>) {
        self.lines.push(Line::new(line_type, indent, content));
    }

    pub fn context(&mut self, indent: usize, content: impl Into<String>) {
        self.push(LineType::Context, indent, content);
    }

    /// Record that part of the input was elided by the depth limit.
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn finish(self) -> DiffRendering {
        DiffRendering {
            lines: self.lines,
            truncated: self.truncated,
        }
    }
}

/// The ordered lines of one rendered diff.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffRendering {
    /// Lines in emission order.
    pub lines: Vec<Line>,
    /// `true` if containers beyond the depth limit were elided.
    pub truncated: bool,
}

impl DiffRendering {
    /// Returns `true` if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Number of added lines.
    pub fn additions(&self) -> usize {
        self.count(LineType::Added)
    }

    /// Number of removed lines.
    pub fn removals(&self) -> usize {
        self.count(LineType::Removed)
    }

    fn count(&self, line_type: LineType) -> usize {
        self.lines.iter().filter(|l| l.line_type == line_type).count()
    }

    /// Emit every line and join them with newlines.
    pub fn to_markup(&self, emitter: &dyn LineEmitter) -> String {
        emitter.emit(&self.lines)
    }
}
