use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use agora_storage::{StorageError, StorageResult};

/// Bounds concurrent Postgres access independent of the pool's own
/// connection limit, mirroring the source's
/// `_BoundedPostgresConnectionMixIn`. A timed-out acquire is reported as
/// [`StorageError::TooBusy`].
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
