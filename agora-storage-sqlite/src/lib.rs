//! SQLite storage backend: one file (or `:memory:`) per deployment, a
//! `json_extract`-based query compiler, and an admission semaphore that
//! normalizes connection contention into `StorageError::TooBusy`.

mod actions;
mod admission;
mod backend;
mod binding;
mod ddl;
mod dialect;
mod error;
mod logs;
mod participants;

pub use backend::{SqliteBackend, SqliteBackendConfig};
