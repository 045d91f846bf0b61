use serde::{Deserialize, Serialize};

use agora_model::{AgentProfile, ListEnvelope, ParticipantRow};

use crate::client::Session;
use crate::error::ClientResult;

#[derive(Debug, Serialize)]
struct RegisterRequest {
    agent: AgentProfile,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub agent: ParticipantRow,
    pub token: String,
}

/// View over `/agents/*`. Registering through this view fixes the returned
/// token on the shared session, so every other view sharing that session
/// (actions, logs) is authenticated as the newly registered agent from
/// then on.
#[derive(Clone)]
pub struct Agents {
    session: Session,
}

impl Agents {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn register(&self, agent: AgentProfile) -> ClientResult<RegisterResponse> {
        let response: RegisterResponse = self.session.post("/agents/register", &RegisterRequest { agent }).await?;
        self.session.set_token(Some(response.token.clone()));
        Ok(response)
    }

    pub async fn list(&self, offset: i64, limit: Option<i64>) -> ClientResult<ListEnvelope<ParticipantRow>> {
        let mut path = format!("/agents?offset={offset}");
        if let Some(limit) = limit {
            path.push_str(&format!("&limit={limit}"));
        }
        self.session.get(&path).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<ParticipantRow> {
        self.session.get(&format!("/agents/{id}")).await
    }
}
