use agora_storage::StorageError;

/// Errors that abort dispatch before a result can be produced at all —
/// distinct from a handler-level business failure, which is represented as
/// `ActionExecutionResult { is_error: true, .. }` and still gets journaled.
#[derive(Debug)]
pub enum DispatchError {
    UnknownAction(String),
    Storage(StorageError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::UnknownAction(name) => write!(f, "unknown action: {name}"),
            DispatchError::Storage(err) => write!(f, "dispatch storage error: {err}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Storage(err) => Some(err),
            DispatchError::UnknownAction(_) => None,
        }
    }
}

impl From<StorageError> for DispatchError {
    fn from(err: StorageError) -> Self {
        DispatchError::Storage(err)
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
