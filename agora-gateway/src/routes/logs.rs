use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_model::{Log, LogRow, ListEnvelope};
use agora_query::RangeQueryParams;
use agora_storage::NewLog;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    pub log: Log,
}

#[derive(Debug, Serialize)]
pub struct CreateLogResponse {
    pub error: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateLogRequest>,
) -> Result<Json<CreateLogResponse>, AppError> {
    state
        .backend
        .logs()
        .create(NewLog {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            data: body.log,
        })
        .await?;
    Ok(Json(CreateLogResponse { error: None }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<LogRow>>, AppError> {
    let logs = state.backend.logs();
    let offset = params.offset.unwrap_or(0);
    let mut range = RangeQueryParams::new().with_offset(offset);
    if let Some(limit) = params.limit {
        range = range.with_limit(limit);
    }
    let range = range.with_overfetch();
    let mut items = logs.get_all(&range).await?;

    let has_more = params.limit.is_some_and(|limit| items.len() as i64 > limit);
    if let Some(limit) = params.limit {
        items.truncate(limit as usize);
    }
    let total = logs.count().await?;

    Ok(Json(ListEnvelope {
        items,
        total: Some(total),
        offset,
        limit: params.limit,
        has_more: Some(has_more),
    }))
}
