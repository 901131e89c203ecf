//! Viewer-facing replay timeline

use serde::{Deserialize, Serialize};

use crate::data::models::ChangeRecord;
use crate::replay::engine::reconstruct;

/// Reconstructed state at one scrub position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Document text after replaying the prefix
    pub code: String,
    /// Captured output entries up to the same position, joined by newline
    pub output: String,
}

/// The ordered change log bundled with its output history and endpoint
/// markers, supporting snapshot-at-index for a scrub position 0..N-1.
///
/// Snapshots are recomputed by full replay from the start on every call;
/// that is fast enough for interactive scrubbing into the tens of thousands
/// of records and keeps the result trivially identical to a from-scratch
/// replay.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    changes: Vec<ChangeRecord>,
    terminal_output: Vec<String>,
    debug_end_points: Vec<usize>,
}

impl Timeline {
    pub fn new(
        changes: Vec<ChangeRecord>,
        terminal_output: Vec<String>,
        debug_end_points: Vec<usize>,
    ) -> Self {
        Self {
            changes,
            terminal_output,
            debug_end_points,
        }
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn terminal_output(&self) -> &[String] {
        &self.terminal_output
    }

    /// Cumulative change counts marking session boundaries on the timeline.
    pub fn debug_end_points(&self) -> &[usize] {
        &self.debug_end_points
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Reconstruct the state at a scrub index: the first `index + 1` changes
    /// and the first `index + 1` output entries.
    pub fn snapshot(&self, index: usize) -> Snapshot {
        let prefix = (index + 1).min(self.changes.len());
        Snapshot {
            code: reconstruct(&self.changes, prefix),
            output: self
                .terminal_output
                .iter()
                .take(index + 1)
                .cloned()
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// A timeline restricted to one file's records, preserving the global
    /// order of the records that remain.
    pub fn for_file(&self, file_name: &str) -> Timeline {
        Timeline {
            changes: self
                .changes
                .iter()
                .filter(|r| r.file_name == file_name)
                .cloned()
                .collect(),
            terminal_output: self.terminal_output.clone(),
            debug_end_points: self.debug_end_points.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::EditOp;
    use chrono::Utc;

    fn record(file: &str, text: &str, line: usize, column: usize) -> ChangeRecord {
        ChangeRecord {
            id: 0,
            timestamp: Utc::now(),
            file_name: file.to_string(),
            op: EditOp::Edit(text.to_string()),
            line,
            column,
            indent: 0,
            terminal_output: String::new(),
        }
    }

    #[test]
    fn snapshot_replays_prefix_and_output() {
        let timeline = Timeline::new(
            vec![
                record("a_test_record.py", "hi", 0, 0),
                record("a_test_record.py", "!", 0, 2),
            ],
            vec!["first run".to_string(), "second run".to_string()],
            vec![2],
        );

        let snap = timeline.snapshot(0);
        assert_eq!(snap.code, "hi");
        assert_eq!(snap.output, "first run");

        let snap = timeline.snapshot(1);
        assert_eq!(snap.code, "hi!");
        assert_eq!(snap.output, "first run\nsecond run");
    }

    #[test]
    fn snapshot_index_past_end_is_clamped() {
        let timeline = Timeline::new(vec![record("a_test_record.py", "x", 0, 0)], vec![], vec![]);
        assert_eq!(timeline.snapshot(10).code, "x");
    }

    #[test]
    fn for_file_filters_preserving_order() {
        let timeline = Timeline::new(
            vec![
                record("a_test_record.py", "a1", 0, 0),
                record("b_test_record.py", "b1", 0, 0),
                record("a_test_record.py", "a2", 1, 0),
            ],
            vec![],
            vec![3],
        );

        let filtered = timeline.for_file("a_test_record.py");
        assert_eq!(filtered.len(), 2);
        let texts: Vec<&str> = filtered.changes().iter().map(|r| r.op.text()).collect();
        assert_eq!(texts, vec!["a1", "a2"]);
        // Markers describe the global timeline and are kept as-is
        assert_eq!(filtered.debug_end_points(), &[3]);
    }
}
