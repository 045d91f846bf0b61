use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use agora_model::ParticipantRow;

use crate::error::AppError;
use crate::state::AppState;

/// The participant a bearer token resolved to. Extracting this from a
/// request authenticates it; there is no separate authentication step.
pub struct AuthenticatedAgent(pub ParticipantRow);

fn extract_bearer_token(header_value: &str) -> Result<&str, AppError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or_else(|| AppError::Unauthorized("malformed Authorization header".to_string()))?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AppError::Unauthorized("expected a Bearer token".to_string()));
    }
    Ok(token)
}

impl FromRequestParts<AppState> for AuthenticatedAgent {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| AppError::Unauthorized("Authorization header is not valid UTF-8".to_string()))?;
        let token = extract_bearer_token(header)?;

        let agent = state
            .backend
            .participants()
            .get_by_auth_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid or revoked token".to_string()))?;

        Ok(AuthenticatedAgent(agent))
    }
}
