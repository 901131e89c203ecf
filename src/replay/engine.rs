//! Deterministic replay of an ordered change prefix into document text

use std::collections::BTreeMap;

use crate::data::models::{ChangeRecord, EditOp};

/// Sparse, line-addressed text buffer built up by replaying changes.
///
/// Lines that were never touched are conceptually empty; a line entry is
/// initialized to its record's indent padding the first time any operation
/// lands on it, so a delete on a never-initialized line operates on a blank
/// padded line instead of failing.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: BTreeMap<usize, String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one operation at (line, column). All positions and lengths are
    /// character counts.
    ///
    /// Deletes remove `content.len()` characters starting at `column`,
    /// truncated at the end of the line. Inserts splice the content at
    /// `column` (clamped to the line length); embedded newlines stay literal
    /// within the single target line entry.
    pub fn apply(&mut self, line: usize, column: usize, indent: usize, op: &EditOp) {
        let entry = self
            .lines
            .entry(line)
            .or_insert_with(|| " ".repeat(indent));

        let chars: Vec<char> = entry.chars().collect();
        let column = column.min(chars.len());

        match op {
            EditOp::Delete(content) => {
                let end = (column + content.chars().count()).min(chars.len());
                let mut updated: String = chars[..column].iter().collect();
                updated.extend(&chars[end..]);
                *entry = updated;
            }
            EditOp::Edit(content) => {
                let mut updated: String = chars[..column].iter().collect();
                updated.push_str(content);
                updated.extend(&chars[column..]);
                *entry = updated;
            }
        }
    }

    /// Render the buffer: lines 0..=max joined by newline, gaps as empty
    /// lines. An untouched buffer renders as the empty string.
    pub fn render(&self) -> String {
        let Some(&max_line) = self.lines.keys().next_back() else {
            return String::new();
        };
        (0..=max_line)
            .map(|i| self.lines.get(&i).map(String::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reconstruct document text from the first `prefix` records, in stored
/// order. Pure: the same prefix always yields byte-identical output.
pub fn reconstruct(records: &[ChangeRecord], prefix: usize) -> String {
    let mut buffer = LineBuffer::new();
    for record in records.iter().take(prefix) {
        buffer.apply(record.line, record.column, record.indent, &record.op);
    }
    buffer.render()
}
