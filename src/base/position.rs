//! Source locations for template references and diagnostics.
//!
//! Lines and columns are stored exactly as the external document parser
//! reports them (1-based lines). The analyzer never re-bases them.

use serde::{Deserialize, Serialize};

/// A range inside a component document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpan {
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceSpan {
    pub fn new(line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// A zero-width span at a single point.
    pub fn point(line: u32, column: u32) -> Self {
        Self::new(line, column, line, column)
    }

    /// Sort key used whenever references are ordered by position.
    pub fn start(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Check if a line/column falls within this span.
    pub fn contains(&self, line: u32, column: u32) -> bool {
        if line < self.line || line > self.end_line {
            return false;
        }
        if line == self.line && column < self.column {
            return false;
        }
        if line == self.end_line && column > self.end_column {
            return false;
        }
        true
    }
}
