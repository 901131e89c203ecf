//! Converts raw editor change events into canonical change records

use crate::capture::document::DocumentText;
use crate::capture::event::ContentChange;
use crate::data::models::{Change, EditOp};

/// Normalize one raw change event into a canonical, position-addressed
/// change record.
///
/// `previous` is the document text before the change was applied, `current`
/// the text after. Deletes are classified by an empty replacement text with
/// a non-zero replaced range; the removed text is sliced out of the previous
/// snapshot through its character-offset mapping. Everything else is an
/// insert ("edit") carrying the replacement text verbatim.
///
/// The indent is measured on the current document state at event time.
pub fn normalize(
    file_name: &str,
    change: &ContentChange,
    previous: &DocumentText,
    current: &DocumentText,
) -> Change {
    let op = if change.text.is_empty() && change.range_length > 0 {
        let start = previous.offset_at(change.start_line, change.start_column);
        EditOp::Delete(previous.slice(start, change.range_length))
    } else {
        EditOp::Edit(change.text.clone())
    };

    Change {
        file_name: file_name.to_string(),
        op,
        line: change.start_line,
        column: change.start_column,
        indent: current.leading_whitespace(change.start_line),
    }
}
