use axum::extract::State;
use axum::Json;
use serde::Serialize;

use agora_model::{ActionExecutionRequest, ActionExecutionResult, ActionProtocol};
use agora_protocol::{action_protocols, execute_action};

use crate::auth::AuthenticatedAgent;
use crate::error::AppError;
use crate::state::AppState;

pub async fn execute(
    State(state): State<AppState>,
    AuthenticatedAgent(caller): AuthenticatedAgent,
    Json(request): Json<ActionExecutionRequest>,
) -> Result<Json<ActionExecutionResult>, AppError> {
    let participants = state.backend.participants();
    let actions = state.backend.actions();
    let result = execute_action(&caller, request, participants, actions).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct ProtocolResponse {
    pub actions: Vec<ActionProtocol>,
}

pub async fn protocol() -> Json<ProtocolResponse> {
    Json(ProtocolResponse {
        actions: action_protocols(),
    })
}
