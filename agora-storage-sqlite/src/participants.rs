use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row as _, SqlitePool};

use agora_model::{AgentProfile, ParticipantRow};
use agora_query::{Query, QueryCompiler, RangeQueryParams};
use agora_storage::{
    NewParticipant, ParticipantController, ParticipantUpdate, StorageError, StorageResult,
};

use crate::admission::AdmissionGate;
use crate::binding::bind_values;
use crate::dialect::SqliteDialect;
use crate::error::SqliteErrorExt;

pub(crate) struct SqliteParticipantController {
    pool: SqlitePool,
    admission: AdmissionGate,
}

impl SqliteParticipantController {
    pub(crate) fn new(pool: SqlitePool, admission: AdmissionGate) -> Self {
        Self { pool, admission }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> StorageResult<ParticipantRow> {
        let data_json: String = row.try_get("data").map_err(StorageError::other)?;
        let data: AgentProfile = serde_json::from_str(&data_json).map_err(StorageError::other)?;
        let created_at: String = row.try_get("created_at").map_err(StorageError::other)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(StorageError::other)?
            .with_timezone(&Utc);
        Ok(ParticipantRow {
            id: row.try_get("id").map_err(StorageError::other)?,
            created_at,
            data,
            index: row.try_get::<i64, _>("row_index").map_err(StorageError::other)?,
            embedding: row.try_get("agent_embedding").map_err(StorageError::other)?,
            auth_token: row.try_get("auth_token").map_err(StorageError::other)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "rowid AS row_index, id, created_at, data, agent_embedding, auth_token";

#[async_trait]
impl ParticipantController for SqliteParticipantController {
    async fn create(&self, row: NewParticipant) -> StorageResult<ParticipantRow> {
        let _permit = self.admission.admit().await?;
        let data_json = serde_json::to_string(&row.data).map_err(StorageError::other)?;

        sqlx::query(
            "INSERT INTO participants (id, created_at, data, agent_embedding, auth_token) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(row.id.as_str())
        .bind(row.created_at.to_rfc3339())
        .bind(data_json.as_str())
        .bind(row.embedding.clone())
        .bind(row.auth_token.clone())
        .execute(&self.pool)
        .await
        .map_err(|e| e.into_storage_error(|| row.id.clone()))?;

        let index: i64 = sqlx::query_scalar("SELECT rowid FROM participants WHERE id = ?")
            .bind(row.id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::other)?;

        Ok(ParticipantRow {
            id: row.id,
            created_at: row.created_at,
            data: row.data,
            index,
            embedding: row.embedding,
            auth_token: row.auth_token,
        })
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<ParticipantRow>> {
        let _permit = self.admission.admit().await?;
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM participants WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::other)?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<ParticipantRow>> {
        let _permit = self.admission.admit().await?;
        let clause = SqliteDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM participants");
        let mut binds = Vec::new();
        if let Some(predicate) = &clause.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.sql);
            binds.extend(predicate.binds.clone());
        }
        sql.push_str(&clause.suffix);
        binds.extend(clause.suffix_binds.clone());

        let query = bind_values(sqlx::query(&sql), &binds);
        let rows = query.fetch_all(&self.pool).await.map_err(StorageError::other)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn find(
        &self,
        query: &Query,
        range: &RangeQueryParams,
    ) -> StorageResult<Vec<ParticipantRow>> {
        let _permit = self.admission.admit().await?;
        let filter = SqliteDialect.compile_query(query);
        let clause = SqliteDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM participants WHERE {}", filter.sql);
        let mut binds = filter.binds.clone();
        if let Some(predicate) = &clause.predicate {
            sql.push_str(" AND ");
            sql.push_str(&predicate.sql);
            binds.extend(predicate.binds.clone());
        }
        sql.push_str(&clause.suffix);
        binds.extend(clause.suffix_binds.clone());

        let sqlx_query = bind_values(sqlx::query(&sql), &binds);
        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::other)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(
        &self,
        id: &str,
        update: ParticipantUpdate,
    ) -> StorageResult<Option<ParticipantRow>> {
        let existing = match self.get_by_id(id).await? {
            Some(row) => row,
            None => return Ok(None),
        };

        let mut data = existing.data.clone();
        if let Some(metadata) = update.metadata {
            data.metadata = metadata;
        }
        let embedding = update.embedding.unwrap_or(existing.embedding.clone());
        let auth_token = update.auth_token.unwrap_or(existing.auth_token.clone());
        let data_json = serde_json::to_string(&data).map_err(StorageError::other)?;

        let _permit = self.admission.admit().await?;
        sqlx::query(
            "UPDATE participants SET data = ?, agent_embedding = ?, auth_token = ? WHERE id = ?",
        )
        .bind(data_json.as_str())
        .bind(embedding.clone())
        .bind(auth_token.clone())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| e.into_storage_error(|| id.to_string()))?;
        drop(_permit);

        Ok(Some(ParticipantRow {
            id: existing.id,
            created_at: existing.created_at,
            data,
            index: existing.index,
            embedding,
            auth_token,
        }))
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let _permit = self.admission.admit().await?;
        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::other)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let _permit = self.admission.admit().await?;
        sqlx::query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::other)
    }

    async fn find_agents_by_id_pattern(&self, id_pattern: &str) -> StorageResult<Vec<String>> {
        let _permit = self.admission.admit().await?;
        let pattern = format!("%{id_pattern}%");
        sqlx::query_scalar("SELECT id FROM participants WHERE id LIKE ?")
            .bind(pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::other)
    }

    async fn get_by_auth_token(&self, token: &str) -> StorageResult<Option<ParticipantRow>> {
        let _permit = self.admission.admit().await?;
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM participants WHERE auth_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::other)?;

        row.as_ref().map(Self::from_row).transpose()
    }
}
