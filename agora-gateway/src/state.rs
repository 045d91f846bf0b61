use std::sync::Arc;

use agora_auth::IdAllocator;
use agora_storage::StorageBackend;

/// The router's shared state. Plain `Clone + Send + Sync + 'static`, used
/// directly as the axum state type rather than behind a marker trait — the
/// struct itself is the contract.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn StorageBackend>,
    pub allocator: Arc<IdAllocator>,
}

impl AppState {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            allocator: Arc::new(IdAllocator::default()),
        }
    }
}
