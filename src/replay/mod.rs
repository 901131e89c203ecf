//! Replay: deterministic reconstruction of document state from the log

pub mod engine;
pub mod timeline;

pub use engine::{reconstruct, LineBuffer};
pub use timeline::{Snapshot, Timeline};
