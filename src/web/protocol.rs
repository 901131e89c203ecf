//! Viewer wire protocol
//!
//! Field and tag names are camelCase on the wire (`getChanges`, `update`,
//! `terminalOutput`, `debugEndPoints`), matching what the viewer script
//! expects; change rows keep their snake_case column names.

use serde::{Deserialize, Serialize};

use crate::data::models::ChangeRecord;
use crate::replay::Timeline;

/// Messages the viewer sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ViewerRequest {
    GetChanges,
}

/// Messages the server pushes to the viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ViewerResponse {
    Update {
        changes: Vec<ChangeRecord>,
        terminal_output: Vec<String>,
        debug_end_points: Vec<usize>,
    },
}

impl ViewerResponse {
    pub fn update_from(timeline: &Timeline) -> Self {
        ViewerResponse::Update {
            changes: timeline.changes().to_vec(),
            terminal_output: timeline.terminal_output().to_vec(),
            debug_end_points: timeline.debug_end_points().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::EditOp;
    use chrono::Utc;

    #[test]
    fn get_changes_wire_format() {
        let request: ViewerRequest = serde_json::from_str(r#"{"command":"getChanges"}"#).unwrap();
        assert_eq!(request, ViewerRequest::GetChanges);
    }

    #[test]
    fn update_wire_format_pins_field_names() {
        let response = ViewerResponse::Update {
            changes: vec![ChangeRecord {
                id: 1,
                timestamp: Utc::now(),
                file_name: "a_test_record.py".to_string(),
                op: EditOp::Edit("hello".to_string()),
                line: 0,
                column: 0,
                indent: 0,
                terminal_output: String::new(),
            }],
            terminal_output: vec!["run".to_string()],
            debug_end_points: vec![1],
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["command"], "update");
        assert!(json["terminalOutput"].is_array());
        assert!(json["debugEndPoints"].is_array());
        // Change rows keep their column names
        assert_eq!(json["changes"][0]["change_type"], "edit");
        assert_eq!(json["changes"][0]["content"], "hello");
        assert_eq!(json["changes"][0]["line"], 0);
        assert_eq!(json["changes"][0]["column"], 0);
        assert_eq!(json["changes"][0]["indent"], 0);
    }
}
