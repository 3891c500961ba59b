//! Core domain logic for the task board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardValidationError};
pub use model::column::{Column, ColumnId};
pub use model::query::TaskQuery;
pub use model::task::{Task, TaskId, TaskPatch};
pub use storage::memory::MemoryKeyValueStore;
pub use storage::sqlite::SqliteKeyValueStore;
pub use storage::{KeyValueStore, StorageError, StorageResult};
pub use store::board_store::BoardStore;
pub use store::observer::{BoardObserver, SubscriptionId};
pub use store::outcome::{Outcome, SkipReason};
pub use store::snapshot::{decode_board, encode_board, SnapshotError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
