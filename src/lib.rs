pub mod capture;
pub mod config;
pub mod data;
pub mod replay;
pub mod session;
pub mod util;
pub mod web;

pub use capture::{
    ChangeNotification, ContentChange, DocumentText, EditorEvent, InterpreterCapture, MonitorSpec,
    OutputCapture, OutputHistory,
};
pub use config::Config;
pub use data::{Change, ChangeRecord, ChangeStore, Database, DebugEndpoint, EditOp, EndpointStore};
pub use replay::{reconstruct, LineBuffer, Snapshot, Timeline};
pub use session::{SessionBuffer, SessionRecorder};
pub use web::{ServerConfig, ViewerRequest, ViewerResponse, ViewerState};
