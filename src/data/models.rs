//! Data models for recorded edits and session markers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One atomic text mutation, tagged with the text it inserted or removed.
///
/// Serializes as `{"change_type": "edit"|"delete", "content": "..."}`,
/// matching the column naming of the persisted `changes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change_type", content = "content", rename_all = "lowercase")]
pub enum EditOp {
    /// Text inserted at the change position. May contain embedded newlines.
    Edit(String),
    /// Text removed at the change position, captured from the pre-change
    /// document snapshot (the same byte-range could correspond to different
    /// prior text, so the length alone is not enough).
    Delete(String),
}

impl EditOp {
    /// The `change_type` column value for this operation.
    pub fn kind(&self) -> &'static str {
        match self {
            EditOp::Edit(_) => "edit",
            EditOp::Delete(_) => "delete",
        }
    }

    /// The inserted or removed text.
    pub fn text(&self) -> &str {
        match self {
            EditOp::Edit(text) | EditOp::Delete(text) => text,
        }
    }

    /// Rebuild the operation from its persisted representation.
    /// Unknown change types are treated as edits.
    pub fn from_parts(kind: &str, content: String) -> Self {
        match kind {
            "delete" => EditOp::Delete(content),
            _ => EditOp::Edit(content),
        }
    }
}

/// A normalized change buffered during a session, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// File the change belongs to
    pub file_name: String,
    #[serde(flatten)]
    pub op: EditOp,
    /// Zero-based line the operation starts on
    pub line: usize,
    /// Zero-based character offset within that line
    pub column: usize,
    /// Leading whitespace characters on the line at edit time, used to pad
    /// a line that does not yet exist in the reconstruction buffer
    pub indent: usize,
}

/// A persisted change row, addressed by its position in the global log order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Server-assigned monotonically increasing identifier
    pub id: i64,
    /// Insertion timestamp; ordering key together with `id`
    pub timestamp: DateTime<Utc>,
    pub file_name: String,
    #[serde(flatten)]
    pub op: EditOp,
    pub line: usize,
    pub column: usize,
    pub indent: usize,
    /// Output captured from the external process during the session in which
    /// this record's batch was flushed; identical for every record of a batch
    pub terminal_output: String,
}

/// Cumulative change-count marker recorded at session termination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEndpoint {
    pub id: i64,
    pub recorded_at: DateTime<Utc>,
    /// Total number of changes recorded up to and including this boundary
    pub change_count: usize,
}
