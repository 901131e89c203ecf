//! Raw editor event shapes consumed by the normalizer

use serde::{Deserialize, Serialize};

/// A single content change as reported by the host editor.
///
/// Positions are zero-based; `range_length` is the number of characters the
/// change replaced (0 for a pure insert).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChange {
    pub start_line: usize,
    pub start_column: usize,
    pub range_length: usize,
    /// Replacement text; empty for a pure delete
    pub text: String,
}

/// One change notification: the file, the changes it carried (several for a
/// multi-cursor edit), and the full document text after the edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub file_name: String,
    pub changes: Vec<ContentChange>,
    /// Full current document text at event time
    pub document: String,
}

/// Transport envelope for editor events, one JSON object per line on stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// A monitored document came into view; its text seeds the pre-change
    /// snapshot used for delete-content extraction.
    DocumentOpened { file_name: String, text: String },
    DocumentChanged(ChangeNotification),
    /// Session termination signal; triggers the flush.
    SessionEnded,
}
