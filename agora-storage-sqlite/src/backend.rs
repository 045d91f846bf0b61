use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::Semaphore;

use agora_storage::{ActionController, LogController, ParticipantController, StorageBackend, StorageError, StorageResult};

use crate::actions::SqliteActionController;
use crate::admission::AdmissionGate;
use crate::ddl::CREATE_TABLES;
use crate::logs::SqliteLogController;
use crate::participants::SqliteParticipantController;

/// Tuning knobs independent of the connection string. Defaults match the
/// source's bounded-connection-mixin: a handful of admission permits with a
/// short wait before giving up and reporting congestion.
#[derive(Debug, Clone)]
pub struct SqliteBackendConfig {
    pub max_connections: u32,
    pub admission_permits: usize,
    pub admission_timeout: Duration,
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            admission_permits: 10,
            admission_timeout: Duration::from_secs(5),
        }
    }
}

/// The sqlite-backed [`StorageBackend`]. Row index is the hidden `rowid`,
/// which this backend never renumbers (ids are `TEXT PRIMARY KEY`, not
/// `INTEGER PRIMARY KEY`, so `rowid` stays a separate, always-present column).
pub struct SqliteBackend {
    participants: SqliteParticipantController,
    actions: SqliteActionController,
    logs: SqliteLogController,
}

impl SqliteBackend {
    pub async fn connect(path: &str, config: SqliteBackendConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(StorageError::other)?;

        for statement in CREATE_TABLES {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(StorageError::other)?;
        }

        Ok(Self::from_pool(pool, config))
    }

    pub async fn in_memory() -> StorageResult<Self> {
        Self::connect(":memory:", SqliteBackendConfig::default()).await
    }

    fn from_pool(pool: SqlitePool, config: SqliteBackendConfig) -> Self {
        let admission = AdmissionGate::new(
            Arc::new(Semaphore::new(config.admission_permits)),
            config.admission_timeout,
        );
        Self {
            participants: SqliteParticipantController::new(pool.clone(), admission.clone()),
            actions: SqliteActionController::new(pool.clone(), admission.clone()),
            logs: SqliteLogController::new(pool, admission),
        }
    }
}

impl StorageBackend for SqliteBackend {
    fn participants(&self) -> &dyn ParticipantController {
        &self.participants
    }

    fn actions(&self) -> &dyn ActionController {
        &self.actions
    }

    fn logs(&self) -> &dyn LogController {
        &self.logs
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_model::AgentProfile;
    use agora_storage::NewParticipant;
    use chrono::Utc;

    #[tokio::test]
    async fn roundtrips_a_participant() {
        let backend = SqliteBackend::in_memory().await.expect("connect");
        let row = backend
            .participants()
            .create(NewParticipant {
                id: "agent-1".to_string(),
                created_at: Utc::now(),
                data: AgentProfile::new("agent-1"),
                embedding: None,
                auth_token: Some("tok-1".to_string()),
            })
            .await
            .expect("create");
        assert_eq!(row.index, 1);

        let fetched = backend
            .participants()
            .get_by_auth_token("tok-1")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(fetched.id, "agent-1");
    }

    #[tokio::test]
    async fn duplicate_id_is_reported() {
        let backend = SqliteBackend::in_memory().await.expect("connect");
        let make = || NewParticipant {
            id: "dup".to_string(),
            created_at: Utc::now(),
            data: AgentProfile::new("dup"),
            embedding: None,
            auth_token: None,
        };
        backend.participants().create(make()).await.expect("first insert");
        let err = backend
            .participants()
            .create(make())
            .await
            .expect_err("second insert collides");
        assert!(matches!(err, StorageError::DuplicateId(id) if id == "dup"));
    }
}
