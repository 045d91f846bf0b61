use crate::controller::{ActionController, LogController, ParticipantController};

/// A storage backend owns the three table controllers. The gateway holds one
/// `Arc<dyn StorageBackend>` chosen at startup from configuration; no handler
/// code is aware of which concrete backend is in use.
pub trait StorageBackend: Send + Sync {
    fn participants(&self) -> &dyn ParticipantController;
    fn actions(&self) -> &dyn ActionController;
    fn logs(&self) -> &dyn LogController;

    /// Short identifier used in health responses and logs (e.g. `sqlite`).
    fn name(&self) -> &'static str;
}
