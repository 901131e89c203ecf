//! Change capture: raw event shapes, document snapshots, normalization,
//! the monitored-file predicate, and process-output capture

pub mod document;
pub mod event;
pub mod monitor;
pub mod normalizer;
pub mod output;

pub use document::DocumentText;
pub use event::{ChangeNotification, ContentChange, EditorEvent};
pub use monitor::{MonitorSpec, DEFAULT_MONITOR_PATTERN};
pub use normalizer::normalize;
pub use output::{InterpreterCapture, OutputCapture, OutputHistory};
