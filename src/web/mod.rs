//! Viewer protocol and web server

pub mod protocol;
pub mod server;

pub use protocol::{ViewerRequest, ViewerResponse};
pub use server::{build_router, serve, ServerConfig, ViewerState};
