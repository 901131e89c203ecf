//! CLI binary tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use playback::{ChangeStore, Database, EndpointStore};

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("playback")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn record_consumes_stdin_events_and_persists_them() {
    let dir = TempDir::new().unwrap();

    let events = concat!(
        r#"{"type":"document_opened","file_name":"cli_test_record.py","text":""}"#,
        "\n",
        r#"{"type":"document_changed","file_name":"cli_test_record.py","changes":[{"start_line":0,"start_column":0,"range_length":0,"text":"print(1)"}],"document":"print(1)"}"#,
        "\n",
        r#"{"type":"document_changed","file_name":"unwatched.py","changes":[{"start_line":0,"start_column":0,"range_length":0,"text":"ignored"}],"document":"ignored"}"#,
        "\n",
        "this line is not json\n",
    );

    Command::cargo_bin("playback")
        .unwrap()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("record")
        .write_stdin(events)
        .assert()
        .success();

    // The EOF flush persisted the buffered session
    let db = Database::open(dir.path().join("playback.db")).unwrap();
    let records = ChangeStore::new(db.connection()).get_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "cli_test_record.py");
    assert_eq!(records[0].op.text(), "print(1)");

    let endpoints = EndpointStore::new(db.connection()).counts().unwrap();
    assert_eq!(endpoints, vec![1]);
}
