use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row as _, SqlitePool};

use agora_model::{Log, LogRow};
use agora_query::{Query, QueryCompiler, RangeQueryParams};
use agora_storage::{LogController, LogUpdate, NewLog, StorageError, StorageResult};

use crate::admission::AdmissionGate;
use crate::binding::bind_values;
use crate::dialect::SqliteDialect;
use crate::error::SqliteErrorExt;

pub(crate) struct SqliteLogController {
    pool: SqlitePool,
    admission: AdmissionGate,
}

impl SqliteLogController {
    pub(crate) fn new(pool: SqlitePool, admission: AdmissionGate) -> Self {
        Self { pool, admission }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> StorageResult<LogRow> {
        let data_json: String = row.try_get("data").map_err(StorageError::other)?;
        let data: Log = serde_json::from_str(&data_json).map_err(StorageError::other)?;
        let created_at: String = row.try_get("created_at").map_err(StorageError::other)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(StorageError::other)?
            .with_timezone(&Utc);
        Ok(LogRow {
            id: row.try_get("id").map_err(StorageError::other)?,
            created_at,
            data,
            index: row.try_get::<i64, _>("row_index").map_err(StorageError::other)?,
        })
    }
}

const SELECT_COLUMNS: &str = "rowid AS row_index, id, created_at, data";

#[async_trait]
impl LogController for SqliteLogController {
    async fn create(&self, row: NewLog) -> StorageResult<LogRow> {
        let _permit = self.admission.admit().await?;
        let data_json = serde_json::to_string(&row.data).map_err(StorageError::other)?;

        sqlx::query("INSERT INTO logs (id, created_at, data) VALUES (?, ?, ?)")
            .bind(row.id.as_str())
            .bind(row.created_at.to_rfc3339())
            .bind(data_json.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_storage_error(|| row.id.clone()))?;

        let index: i64 = sqlx::query_scalar("SELECT rowid FROM logs WHERE id = ?")
            .bind(row.id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::other)?;

        Ok(LogRow {
            id: row.id,
            created_at: row.created_at,
            data: row.data,
            index,
        })
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<LogRow>> {
        let _permit = self.admission.admit().await?;
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM logs WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::other)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn get_all(&self, range: &RangeQueryParams) -> StorageResult<Vec<LogRow>> {
        let _permit = self.admission.admit().await?;
        let clause = SqliteDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM logs");
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

    async fn find(&self, query: &Query, range: &RangeQueryParams) -> StorageResult<Vec<LogRow>> {
        let _permit = self.admission.admit().await?;
        let filter = SqliteDialect.compile_query(query);
        let clause = SqliteDialect.compile_range(range);

        let mut sql = format!("SELECT {SELECT_COLUMNS} FROM logs WHERE {}", filter.sql);
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

    async fn update(&self, id: &str, update: LogUpdate) -> StorageResult<Option<LogRow>> {
        let existing = match self.get_by_id(id).await? {
            Some(row) => row,
            None => return Ok(None),
        };
        let data = update.data.unwrap_or(existing.data);
        let data_json = serde_json::to_string(&data).map_err(StorageError::other)?;

        let _permit = self.admission.admit().await?;
        sqlx::query("UPDATE logs SET data = ? WHERE id = ?")
            .bind(data_json.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| e.into_storage_error(|| id.to_string()))?;
        drop(_permit);

        Ok(Some(LogRow {
            id: existing.id,
            created_at: existing.created_at,
            data,
            index: existing.index,
        }))
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let _permit = self.admission.admit().await?;
        let result = sqlx::query("DELETE FROM logs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::other)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let _permit = self.admission.admit().await?;
        sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::other)
    }
}
