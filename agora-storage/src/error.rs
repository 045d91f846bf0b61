/// Errors surfaced by a storage backend. Any backend congestion (pool
/// timeout, lock contention, connection reset) must be normalized to
/// `TooBusy` rather than leaking a driver-specific error — the HTTP layer
/// maps it straight to 429.
#[derive(Debug)]
pub enum StorageError {
    /// Backend overloaded; the caller should retry with backoff. Never
    /// written to the journal as part of a failed write.
    TooBusy,
    /// `id` collided with an existing row on insert.
    DuplicateId(String),
    /// No row found for the given id.
    NotFound(String),
    /// Anything else — bugs, not recoverable by the caller.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StorageError::Other(Box::new(err))
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::TooBusy => write!(f, "storage backend is too busy"),
            StorageError::DuplicateId(id) => write!(f, "id already exists: {id}"),
            StorageError::NotFound(id) => write!(f, "row not found: {id}"),
            StorageError::Other(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
