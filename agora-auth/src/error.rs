use agora_storage::StorageError;

/// Errors surfaced by the id allocator and token service.
#[derive(Debug)]
pub enum AuthError {
    /// No free suffix was found for `base_id` within the retry budget.
    AllocationExhausted(String),
    /// The underlying storage call failed.
    Storage(StorageError),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::AllocationExhausted(base_id) => {
                write!(f, "could not allocate an id for base '{base_id}'")
            }
            AuthError::Storage(err) => write!(f, "auth storage error: {err}"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Storage(err) => Some(err),
            AuthError::AllocationExhausted(_) => None,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Storage(err)
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
