use tokio_util::sync::CancellationToken;

/// A cooperative shutdown flag. `shutdown()` is a one-way switch; agents
/// observe it at their next loop boundary, never mid-`step()`.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(CancellationToken);

impl ShutdownHandle {
    pub fn new() -> Self {
        Self(CancellationToken::new())
    }

    pub fn shutdown(&self) {
        self.0.cancel();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Resolves once `shutdown()` has been called. Useful for agents whose
    /// `step()` wants to race an external wait against the shutdown signal.
    pub async fn wait(&self) {
        self.0.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_open_and_closes_once() {
        let handle = ShutdownHandle::new();
        assert!(!handle.is_shutting_down());
        handle.shutdown();
        assert!(handle.is_shutting_down());
    }

    #[test]
    fn clones_observe_the_same_signal() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();
        handle.shutdown();
        assert!(clone.is_shutting_down());
    }
}
