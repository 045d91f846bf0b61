//! PostgreSQL storage backend: JSONB columns, GIN indexes, and a `#>>`-based
//! query compiler. Row index is an explicit `BIGSERIAL` column rather than
//! any physical row identifier.

mod actions;
mod admission;
mod backend;
mod binding;
mod ddl;
mod dialect;
mod error;
mod logs;
mod participants;

pub use backend::{PostgresBackend, PostgresBackendConfig};
