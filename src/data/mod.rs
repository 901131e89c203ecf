//! Persistence layer: SQLite database, migrations, models, and stores

pub mod changes;
pub mod database;
pub mod migrations;
pub mod models;

pub use changes::{ChangeStore, EndpointStore};
pub use database::{Database, DatabaseError};
pub use models::{Change, ChangeRecord, DebugEndpoint, EditOp};
