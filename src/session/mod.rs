//! Session buffering and the recording coordinator

pub mod buffer;
pub mod recorder;

pub use buffer::SessionBuffer;
pub use recorder::SessionRecorder;
