//! Session-scoped recording coordinator
//!
//! Owns the buffered session state (per-file queues, last-known document
//! snapshots, rolling output history) and wires the normalizer, the
//! persistence layer, and the output-capture collaborator together.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::capture::document::DocumentText;
use crate::capture::event::ChangeNotification;
use crate::capture::monitor::MonitorSpec;
use crate::capture::normalizer::normalize;
use crate::capture::output::{OutputCapture, OutputHistory};
use crate::data::{ChangeStore, Database, EndpointStore};
use crate::replay::Timeline;
use crate::session::buffer::SessionBuffer;

struct RecorderState {
    buffer: SessionBuffer,
    /// Last-known full text per monitored file, the pre-change snapshot
    /// deletes are extracted from
    documents: HashMap<String, DocumentText>,
    output: OutputHistory,
    session_id: Uuid,
}

/// Coordinator for one recording process.
///
/// All session state lives behind one mutex, so reentrant async callbacks
/// cannot observe a half-flushed buffer: draining the queues and capturing
/// the endpoint value happen under a single lock acquisition.
pub struct SessionRecorder {
    changes: ChangeStore,
    endpoints: EndpointStore,
    monitor: MonitorSpec,
    capture: Arc<dyn OutputCapture>,
    state: Mutex<RecorderState>,
}

impl SessionRecorder {
    pub fn new(
        db: &Database,
        monitor: MonitorSpec,
        capture: Arc<dyn OutputCapture>,
        output_history_limit: usize,
    ) -> Self {
        Self {
            changes: ChangeStore::new(db.connection()),
            endpoints: EndpointStore::new(db.connection()),
            monitor,
            capture,
            state: Mutex::new(RecorderState {
                buffer: SessionBuffer::new(),
                documents: HashMap::new(),
                output: OutputHistory::new(output_history_limit),
                session_id: Uuid::new_v4(),
            }),
        }
    }

    pub fn change_store(&self) -> &ChangeStore {
        &self.changes
    }

    pub fn endpoint_store(&self) -> &EndpointStore {
        &self.endpoints
    }

    /// Seed the pre-change snapshot for a monitored file.
    pub fn document_opened(&self, file_name: &str, text: &str) {
        if !self.monitor.is_monitored(file_name) {
            return;
        }
        let mut state = self.state.lock();
        state
            .documents
            .insert(file_name.to_string(), DocumentText::new(text));
    }

    /// Normalize and buffer every change in a notification, in the order
    /// received. Unmonitored files produce no records at all.
    pub fn document_changed(&self, note: &ChangeNotification) {
        if !self.monitor.is_monitored(&note.file_name) {
            return;
        }

        let mut state = self.state.lock();
        let previous = state
            .documents
            .get(&note.file_name)
            .cloned()
            .unwrap_or_default();
        let current = DocumentText::new(note.document.as_str());

        for raw in &note.changes {
            let change = normalize(&note.file_name, raw, &previous, &current);
            tracing::debug!(
                file = %change.file_name,
                change_type = change.op.kind(),
                content = change.op.text(),
                indent = change.indent,
                "File changed"
            );
            state.buffer.record(change);
        }

        state.documents.insert(note.file_name.clone(), current);
    }

    /// Append externally captured output to the rolling history.
    pub fn push_output(&self, output: String) {
        self.state.lock().output.push(output);
    }

    /// Number of changes currently buffered, awaiting the next flush.
    pub fn buffered(&self) -> usize {
        self.state.lock().buffer.buffered()
    }

    /// Flush the session: persist each file's batch as one transaction
    /// tagged with the output accumulated so far, append the debug endpoint,
    /// then run each flushed file through the capture process.
    ///
    /// The capture runs after the batch write, so a batch is tagged with
    /// output from before its own session's execution. Failed writes are
    /// logged and dropped; recording continues.
    pub async fn session_ended(&self) {
        let (batches, output_so_far, total, session_id) = {
            let mut state = self.state.lock();
            let batches = state.buffer.drain();
            let total = state.buffer.total_changes();
            let session_id = state.session_id;
            state.session_id = Uuid::new_v4();
            (batches, state.output.joined(), total, session_id)
        };

        for (file_name, changes) in &batches {
            if let Err(err) = self.changes.insert_batch(changes, &output_so_far) {
                tracing::error!(
                    file = %file_name,
                    count = changes.len(),
                    error = %err,
                    "Failed to persist change batch; batch dropped"
                );
            }
        }

        if let Err(err) = self.endpoints.insert(total) {
            tracing::error!(error = %err, "Failed to record debug endpoint");
        }

        tracing::info!(
            session = %session_id,
            files = batches.len(),
            total_changes = total,
            "Session flushed"
        );

        for (file_name, _) in &batches {
            let output = self.capture.capture(Path::new(file_name)).await;
            self.push_output(output);
        }
    }

    /// Current rolling output history entries.
    pub fn output_history(&self) -> Vec<String> {
        self.state.lock().output.entries().to_vec()
    }

    /// Assemble the viewer-facing timeline from the stored log, the output
    /// history, and the endpoint markers. Retrieval failures degrade to an
    /// empty timeline rather than an error.
    pub fn timeline(&self) -> Timeline {
        let records = self.changes.get_all().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to retrieve change log");
            Vec::new()
        });
        let endpoints = self.endpoints.counts().unwrap_or_else(|err| {
            tracing::error!(error = %err, "Failed to retrieve debug endpoints");
            Vec::new()
        });
        Timeline::new(records, self.output_history(), endpoints)
    }
}
