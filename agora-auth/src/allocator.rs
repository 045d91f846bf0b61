use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use agora_storage::ParticipantController;

use crate::error::{AuthError, AuthResult};

const DEFAULT_MAX_RETRIES: u32 = 20;

/// Hands out ids of the form `base_id-N`, N being the smallest
/// non-negative integer not already in use by any row whose id matches
/// that prefix. Keeps an in-memory per-base counter as a fast path; the
/// database is always the source of truth and every candidate is
/// re-checked against it before being handed out.
pub struct IdAllocator {
    locks: DashMap<String, Arc<Mutex<()>>>,
    last_suffix: DashMap<String, i64>,
    max_retries: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl IdAllocator {
    pub fn new(max_retries: u32) -> Self {
        Self {
            locks: DashMap::new(),
            last_suffix: DashMap::new(),
            max_retries,
        }
    }

    fn lock_for(&self, base_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(base_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Scans every id matching `base_id-<digits>` and seeds the in-memory
    /// counter from the highest suffix found. Run on first use of a base
    /// and again on every collision, since a collision means the cache is
    /// stale relative to some other writer.
    async fn rescan_last_suffix(
        &self,
        base_id: &str,
        participants: &dyn ParticipantController,
    ) -> AuthResult<i64> {
        let matches = participants.find_agents_by_id_pattern(base_id).await?;
        let prefix = format!("{base_id}-");
        let max_suffix = matches
            .iter()
            .filter_map(|id| id.strip_prefix(prefix.as_str()))
            .filter_map(|suffix| suffix.parse::<i64>().ok())
            .max()
            .unwrap_or(-1);
        self.last_suffix.insert(base_id.to_string(), max_suffix);
        Ok(max_suffix)
    }

    /// Allocates and returns a fresh `base_id-N` id. Retries on insert
    /// collision against a concurrent non-core writer up to the configured
    /// retry budget, then fails hard.
    pub async fn allocate(
        &self,
        base_id: &str,
        participants: &dyn ParticipantController,
    ) -> AuthResult<String> {
        let lock = self.lock_for(base_id);
        let _guard = lock.lock().await;

        for _ in 0..self.max_retries {
            let last = self.rescan_last_suffix(base_id, participants).await?;
            let next = last + 1;
            let candidate = format!("{base_id}-{next}");

            if participants.get_by_id(&candidate).await?.is_none() {
                self.last_suffix.insert(base_id.to_string(), next);
                return Ok(candidate);
            }
        }

        Err(AuthError::AllocationExhausted(base_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use agora_model::AgentProfile;
    use agora_storage::{NewParticipant, StorageBackend};
    use agora_storage_sqlite::SqliteBackend;
    use chrono::Utc;
    use serde_json::Map;

    use super::*;

    async fn backend() -> SqliteBackend {
        SqliteBackend::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn allocates_sequential_ids() {
        let backend = backend().await;
        let allocator = IdAllocator::default();

        let first = allocator.allocate("agent", backend.participants()).await.unwrap();
        assert_eq!(first, "agent-0");

        backend
            .participants()
            .create(NewParticipant {
                id: first,
                created_at: Utc::now(),
                data: AgentProfile {
                    id: "agent-0".to_string(),
                    metadata: Map::new(),
                },
                embedding: None,
                auth_token: None,
            })
            .await
            .unwrap();

        let second = allocator.allocate("agent", backend.participants()).await.unwrap();
        assert_eq!(second, "agent-1");
    }

    #[tokio::test]
    async fn skips_ids_already_taken_by_an_external_writer() {
        let backend = backend().await;

        backend
            .participants()
            .create(NewParticipant {
                id: "agent-0".to_string(),
                created_at: Utc::now(),
                data: AgentProfile {
                    id: "agent-0".to_string(),
                    metadata: Map::new(),
                },
                embedding: None,
                auth_token: None,
            })
            .await
            .unwrap();

        let allocator = IdAllocator::default();
        let allocated = allocator.allocate("agent", backend.participants()).await.unwrap();
        assert_eq!(allocated, "agent-1");
    }

    #[tokio::test]
    async fn fails_hard_when_retry_budget_is_exhausted() {
        let backend = backend().await;
        for n in 0..3 {
            backend
                .participants()
                .create(NewParticipant {
                    id: format!("agent-{n}"),
                    created_at: Utc::now(),
                    data: AgentProfile {
                        id: format!("agent-{n}"),
                        metadata: Map::new(),
                    },
                    embedding: None,
                    auth_token: None,
                })
                .await
                .unwrap();
        }

        // A retry budget smaller than the number of already-taken suffixes
        // can never converge purely by rescanning, since each rescan keeps
        // reporting the same highest-taken suffix isn't the failure mode
        // here — the allocator always advances past taken ids on rescan.
        // Exhaustion instead models a pathological case: max_retries of 0
        // means no attempt is made at all.
        let allocator = IdAllocator::new(0);
        let result = allocator.allocate("agent", backend.participants()).await;
        assert!(matches!(result, Err(AuthError::AllocationExhausted(base)) if base == "agent"));
    }
}
