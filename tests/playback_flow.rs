//! End-to-end tests for the record -> persist -> replay pipeline

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use playback::capture::{ChangeNotification, ContentChange, MonitorSpec, OutputCapture};
use playback::{Database, SessionRecorder};

/// Capture stub that reports which files were executed.
struct ScriptedCapture {
    output: String,
}

#[async_trait]
impl OutputCapture for ScriptedCapture {
    async fn capture(&self, path: &Path) -> String {
        format!("{}: {}", path.display(), self.output)
    }
}

fn setup(output: &str) -> (TempDir, SessionRecorder) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(dir.path().join("playback.db")).expect("Failed to open database");
    let recorder = SessionRecorder::new(
        &db,
        MonitorSpec::default(),
        Arc::new(ScriptedCapture {
            output: output.to_string(),
        }),
        50,
    );
    (dir, recorder)
}

fn insert(file: &str, line: usize, column: usize, text: &str, document: &str) -> ChangeNotification {
    ChangeNotification {
        file_name: file.to_string(),
        changes: vec![ContentChange {
            start_line: line,
            start_column: column,
            range_length: 0,
            text: text.to_string(),
        }],
        document: document.to_string(),
    }
}

fn delete(file: &str, line: usize, column: usize, len: usize, document: &str) -> ChangeNotification {
    ChangeNotification {
        file_name: file.to_string(),
        changes: vec![ContentChange {
            start_line: line,
            start_column: column,
            range_length: len,
            text: String::new(),
        }],
        document: document.to_string(),
    }
}

#[tokio::test]
async fn hello_world_replay_through_the_full_pipeline() {
    let (_dir, recorder) = setup("done");
    let file = "demo_test_record.py";

    recorder.document_opened(file, "");
    recorder.document_changed(&insert(file, 0, 0, "hello", "hello"));
    recorder.document_changed(&insert(file, 0, 5, " world", "hello world"));
    recorder.document_changed(&delete(file, 0, 5, 6, "hello"));
    recorder.session_ended().await;

    let timeline = recorder.timeline();
    assert_eq!(timeline.len(), 3);
    assert_eq!(timeline.snapshot(0).code, "hello");
    assert_eq!(timeline.snapshot(1).code, "hello world");
    assert_eq!(timeline.snapshot(2).code, "hello");

    // The delete record captured the removed text, not just its length
    assert_eq!(timeline.changes()[2].op.kind(), "delete");
    assert_eq!(timeline.changes()[2].op.text(), " world");
}

#[tokio::test]
async fn multi_session_timeline_carries_markers_and_outputs() {
    let (_dir, recorder) = setup("session output");
    let file = "fib_test_record.py";

    // Session one: three edits
    recorder.document_opened(file, "");
    recorder.document_changed(&insert(file, 0, 0, "a", "a"));
    recorder.document_changed(&insert(file, 0, 1, "b", "ab"));
    recorder.document_changed(&insert(file, 0, 2, "c", "abc"));
    recorder.session_ended().await;

    // Session two: two edits
    recorder.document_changed(&insert(file, 1, 0, "d", "abc\nd"));
    recorder.document_changed(&insert(file, 1, 1, "e", "abc\nde"));
    recorder.session_ended().await;

    // Session three: no edits
    recorder.session_ended().await;

    let timeline = recorder.timeline();
    assert_eq!(timeline.len(), 5);
    assert_eq!(timeline.debug_end_points(), &[3, 5, 5]);

    // Second session's batch is tagged with the first session's output
    let records = timeline.changes();
    assert_eq!(records[0].terminal_output, "");
    assert!(records[3]
        .terminal_output
        .contains("fib_test_record.py: session output"));

    assert_eq!(timeline.snapshot(4).code, "abc\nde");
}

#[tokio::test]
async fn replay_interleaves_files_in_global_order() {
    let (_dir, recorder) = setup("x");
    let a = "a_test_record.py";
    let b = "b_test_record.py";

    recorder.document_changed(&insert(a, 0, 0, "aa", "aa"));
    recorder.document_changed(&insert(b, 0, 0, "bb", "bb"));
    recorder.document_changed(&insert(a, 0, 2, "!", "aa!"));
    recorder.session_ended().await;

    let timeline = recorder.timeline();
    assert_eq!(timeline.len(), 3);

    // Filtering for one file preserves that file's global order
    let only_a = timeline.for_file(a);
    let texts: Vec<&str> = only_a.changes().iter().map(|r| r.op.text()).collect();
    assert_eq!(texts, vec!["aa", "!"]);
    assert_eq!(only_a.snapshot(1).code, "aa!");
}

#[tokio::test]
async fn delete_past_line_end_truncates_in_replay() {
    let (_dir, recorder) = setup("x");
    let file = "t_test_record.py";

    // Capture started late: the log only saw "ab" being typed, but the
    // document really held "abcde" when the whole line was deleted.
    recorder.document_opened(file, "abcde");
    recorder.document_changed(&insert(file, 0, 0, "ab", "abcde"));
    recorder.document_changed(&delete(file, 0, 0, 5, ""));
    recorder.session_ended().await;

    let timeline = recorder.timeline();
    assert_eq!(timeline.snapshot(1).code, "");
}

#[tokio::test]
async fn reopening_the_log_sees_the_same_ordered_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playback.db");

    {
        let db = Database::open(path.clone()).unwrap();
        let recorder = SessionRecorder::new(
            &db,
            MonitorSpec::default(),
            Arc::new(ScriptedCapture {
                output: "x".to_string(),
            }),
            50,
        );
        recorder.document_changed(&insert("p_test_record.py", 0, 0, "persisted", "persisted"));
        recorder.session_ended().await;
    }

    // Markers and records survive a restart
    let db = Database::open(path).unwrap();
    let recorder = SessionRecorder::new(
        &db,
        MonitorSpec::default(),
        Arc::new(ScriptedCapture {
            output: "x".to_string(),
        }),
        50,
    );
    let timeline = recorder.timeline();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.snapshot(0).code, "persisted");
    assert_eq!(timeline.debug_end_points(), &[1]);
}
