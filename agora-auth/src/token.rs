use agora_storage::{ParticipantController, ParticipantUpdate};
use uuid::Uuid;

use crate::error::AuthResult;

/// Issues and checks bearer tokens bound to a participant row. A token is
/// an opaque UUID, not a JWT: validation is a database lookup, and
/// revocation just clears the column. There is no rotation or expiry at
/// this layer — callers that need it build it on top.
pub struct TokenService<'a> {
    participants: &'a dyn ParticipantController,
}

impl<'a> TokenService<'a> {
    pub fn new(participants: &'a dyn ParticipantController) -> Self {
        Self { participants }
    }

    /// Mints a fresh token, persists it on `agent_id`, and returns it.
    /// Overwrites any token the participant already held.
    pub async fn generate_token(&self, agent_id: &str) -> AuthResult<String> {
        let token = Uuid::new_v4().to_string();
        self.participants
            .update(agent_id, ParticipantUpdate::set_auth_token(token.clone()))
            .await?;
        Ok(token)
    }

    /// Resolves a bearer token to the id of the participant it's bound to.
    pub async fn validate_token(&self, token: &str) -> AuthResult<Option<String>> {
        let row = self.participants.get_by_auth_token(token).await?;
        Ok(row.map(|row| row.id))
    }

    /// The token currently bound to `agent_id`, if any.
    pub async fn get_agent_token(&self, agent_id: &str) -> AuthResult<Option<String>> {
        let row = self.participants.get_by_id(agent_id).await?;
        Ok(row.and_then(|row| row.auth_token))
    }

    /// Clears `agent_id`'s token. Returns `false` if the participant
    /// doesn't exist.
    pub async fn revoke_token(&self, agent_id: &str) -> AuthResult<bool> {
        let updated = self
            .participants
            .update(agent_id, ParticipantUpdate::revoke_auth_token())
            .await?;
        Ok(updated.is_some())
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

    async fn backend_with_participant(id: &str) -> SqliteBackend {
        let backend = SqliteBackend::in_memory().await.unwrap();
        backend
            .participants()
            .create(NewParticipant {
                id: id.to_string(),
                created_at: Utc::now(),
                data: AgentProfile {
                    id: id.to_string(),
                    metadata: Map::new(),
                },
                embedding: None,
                auth_token: None,
            })
            .await
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn generates_and_validates_a_token() {
        let backend = backend_with_participant("agent-0").await;
        let service = TokenService::new(backend.participants());

        let token = service.generate_token("agent-0").await.unwrap();
        let resolved = service.validate_token(&token).await.unwrap();
        assert_eq!(resolved.as_deref(), Some("agent-0"));
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let backend = backend_with_participant("agent-0").await;
        let service = TokenService::new(backend.participants());

        let resolved = service.validate_token("not-a-real-token").await.unwrap();
        assert_eq!(resolved, None);
    }

    #[tokio::test]
    async fn revoke_clears_the_token() {
        let backend = backend_with_participant("agent-0").await;
        let service = TokenService::new(backend.participants());

        let token = service.generate_token("agent-0").await.unwrap();
        assert!(service.revoke_token("agent-0").await.unwrap());
        assert_eq!(service.validate_token(&token).await.unwrap(), None);
        assert_eq!(service.get_agent_token("agent-0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn revoke_on_missing_agent_returns_false() {
        let backend = SqliteBackend::in_memory().await.unwrap();
        let service = TokenService::new(backend.participants());
        assert!(!service.revoke_token("does-not-exist").await.unwrap());
    }
}
