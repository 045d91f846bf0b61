use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use agora_storage::{StorageError, StorageResult};

/// Bounds concurrent SQLite access independent of the pool's own connection
/// limit. A connection acquired past `timeout` is reported as
/// [`StorageError::TooBusy`] rather than surfacing a pool-internal error.
#[derive(Clone)]
pub(crate) struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    timeout: Duration,
}

impl AdmissionGate {
    pub(crate) fn new(semaphore: Arc<Semaphore>, timeout: Duration) -> Self {
        Self { semaphore, timeout }
    }

    pub(crate) async fn admit(&self) -> StorageResult<OwnedSemaphorePermit> {
        match tokio::time::timeout(self.timeout, self.semaphore.clone().acquire_owned()).await {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_)) => Err(StorageError::TooBusy),
            Err(_) => Err(StorageError::TooBusy),
        }
    }
}
