use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::Semaphore;

use agora_storage::{
    ActionController, LogController, ParticipantController, StorageBackend, StorageError,
    StorageResult,
};

use crate::actions::PostgresActionController;
use crate::admission::AdmissionGate;
use crate::ddl::CREATE_TABLES;
use crate::logs::PostgresLogController;
use crate::participants::PostgresParticipantController;

#[derive(Debug, Clone)]
pub struct PostgresBackendConfig {
    pub max_connections: u32,
    pub admission_permits: usize,
    pub admission_timeout: Duration,
}

impl Default for PostgresBackendConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            admission_permits: 20,
            admission_timeout: Duration::from_secs(5),
        }
    }
}

/// The PostgreSQL-backed [`StorageBackend`]. Row index is an explicit
/// `BIGSERIAL` column, assigned once at insert and never reused — Postgres
/// has no stable equivalent to SQLite's `rowid` (`ctid` moves under VACUUM).
pub struct PostgresBackend {
    participants: PostgresParticipantController,
    actions: PostgresActionController,
    logs: PostgresLogController,
}

impl PostgresBackend {
    pub async fn connect(database_url: &str, config: PostgresBackendConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(database_url)
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

    fn from_pool(pool: PgPool, config: PostgresBackendConfig) -> Self {
        let admission = AdmissionGate::new(
            Arc::new(Semaphore::new(config.admission_permits)),
            config.admission_timeout,
        );
        Self {
            participants: PostgresParticipantController::new(pool.clone(), admission.clone()),
            actions: PostgresActionController::new(pool.clone(), admission.clone()),
            logs: PostgresLogController::new(pool, admission),
        }
    }
}

impl StorageBackend for PostgresBackend {
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
        "postgres"
    }
}
