use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row as _};

use agora_model::{ActionRow, ActionRowData};
use agora_query::{Query, QueryCompiler, RangeQueryParams};
use agora_storage::{ActionController, ActionUpdate, NewAction, StorageError, StorageResult};

use crate::admission::AdmissionGate;
use crate::binding::{bind_values, renumber};
use crate::dialect::PostgresDialect;
use crate::error::PostgresErrorExt;

pub(crate) struct PostgresActionController {
    pool: PgPool,
    admission: AdmissionGate,
}

impl PostgresActionController {
    pub(crate) fn new(pool: PgPool, admission: AdmissionGate) -> Self {
        Self { pool, admission }
    }

    fn from_row(row: &sqlx::postgres::PgRow) -> StorageResult<ActionRow> {
        let data: serde_json::Value = row.try_get("data").map_err(StorageError::other)?;
        let data: ActionRowData = serde_json::from_value(data).map_err(StorageError::other)?;
        Ok(ActionRow {
            id: row.try_get("id").map_err(StorageError::other)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(StorageError::other)?,
            data,
            index: row.try_get::<i64, _>("row_index").map_err(StorageError::other)?,
        })
    }
}

const SELECT_COLUMNS: &str = "row_index, id, created_at, data";

#[async_trait]
impl ActionController for PostgresActionController {
    async fn create(&self, row: NewAction) -> StorageResult<ActionRow> {
        let _permit = self.admission.admit().await?;
        let data_value = serde_json::to_value(&row.data).map_err(StorageError::other)?;

        let index: i64 = sqlx::query_scalar(
            "INSERT INTO actions (id, created_at, data) VALUES ($1, $2, $3) RETURNING row_index",
        )
        .bind(row.id.as_str())
        .bind(row.created_at)
        .bind(data_value)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| e.into_storage_error(|| row.id.clone()))?;

        Ok(ActionRow {
            id: row.id,
            created_at: row.created_at,
            data: row.data,
            index,
        })
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<ActionRow>> {
        let _permit = self.admission.admit().await?;
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM actions WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::other)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<ActionRow>> {
        let _permit = self.admission.admit().await?;
        let clause = PostgresDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM actions");
        let mut binds = Vec::new();
        if let Some(predicate) = &clause.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.sql);
            binds.extend(predicate.binds.clone());
        }
        sql.push_str(&clause.suffix);
        binds.extend(clause.suffix_binds.clone());
        let sql = renumber(&sql);

        let query = bind_values(sqlx::query(&sql), &binds);
        let rows = query.fetch_all(&self.pool).await.map_err(StorageError::other)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn find(&self, query: &Query, range: &RangeQueryParams) -> StorageResult<Vec<ActionRow>> {
        let _permit = self.admission.admit().await?;
        let filter = PostgresDialect.compile_query(query);
        let clause = PostgresDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM actions WHERE {}", filter.sql);
        let mut binds = filter.binds.clone();
        if let Some(predicate) = &clause.predicate {
            sql.push_str(" AND ");
            sql.push_str(&predicate.sql);
            binds.extend(predicate.binds.clone());
        }
        sql.push_str(&clause.suffix);
        binds.extend(clause.suffix_binds.clone());
        let sql = renumber(&sql);

        let sqlx_query = bind_values(sqlx::query(&sql), &binds);
        let rows = sqlx_query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::other)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, id: &str, update: ActionUpdate) -> StorageResult<Option<ActionRow>> {
        let existing = match self.get_by_id(id).await? {
            Some(row) => row,
            None => return Ok(None),
        };
        let data = update.data.unwrap_or(existing.data);
        let data_value = serde_json::to_value(&data).map_err(StorageError::other)?;

        let _permit = self.admission.admit().await?;
        sqlx::query("UPDATE actions SET data = $1 WHERE id = $2")
            .bind(data_value)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_storage_error(|| id.to_string()))?;
        drop(_permit);

        Ok(Some(ActionRow {
            id: existing.id,
            created_at: existing.created_at,
            data,
            index: existing.index,
        }))
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let _permit = self.admission.admit().await?;
        let result = sqlx::query("DELETE FROM actions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::other)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let _permit = self.admission.admit().await?;
        sqlx::query_scalar("SELECT COUNT(*) FROM actions")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::other)
    }
}
