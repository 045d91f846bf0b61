use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use agora_auth::TokenService;
use agora_model::{AgentProfile, ListEnvelope, ParticipantRow};
use agora_query::RangeQueryParams;
use agora_storage::{NewParticipant, StorageError};

use crate::error::AppError;
use crate::state::AppState;

const REGISTER_RETRY_BUDGET: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub agent: AgentProfile,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub agent: ParticipantRow,
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let base_id = body.agent.id.clone();
    let participants = state.backend.participants();

    let mut row = None;
    for _ in 0..REGISTER_RETRY_BUDGET {
        let candidate_id = state.allocator.allocate(&base_id, participants).await?;
        let candidate = NewParticipant {
            id: candidate_id.clone(),
            created_at: Utc::now(),
            data: AgentProfile {
                id: candidate_id,
                metadata: body.agent.metadata.clone(),
            },
            embedding: None,
            auth_token: None,
        };
        match participants.create(candidate).await {
            Ok(created) => {
                row = Some(created);
                break;
            }
            Err(StorageError::DuplicateId(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    let row = row.ok_or_else(|| AppError::Conflict(format!("could not allocate an id for base '{base_id}'")))?;

    let token_service = TokenService::new(participants);
    let token = token_service.generate_token(&row.id).await?;
    let agent = participants
        .get_by_id(&row.id)
        .await?
        .ok_or_else(|| AppError::Internal("participant vanished immediately after registration".to_string()))?;

    Ok(Json(RegisterResponse { agent, token }))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope<ParticipantRow>>, AppError> {
    let participants = state.backend.participants();
    let offset = params.offset.unwrap_or(0);
    let mut range = RangeQueryParams::new().with_offset(offset);
    if let Some(limit) = params.limit {
        range = range.with_limit(limit);
    }
    let range = range.with_overfetch();
    let mut items = participants.get_all(&range).await?;

    let has_more = params.limit.is_some_and(|limit| items.len() as i64 > limit);
    if let Some(limit) = params.limit {
        items.truncate(limit as usize);
    }
    let total = participants.count().await?;

    Ok(Json(ListEnvelope {
        items,
        total: Some(total),
        offset,
        limit: params.limit,
        has_more: Some(has_more),
    }))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ParticipantRow>, AppError> {
    let agent = state
        .backend
        .participants()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no agent with id '{id}'")))?;
    Ok(Json(agent))
}
