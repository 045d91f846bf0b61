use serde::Deserialize;

use agora_model::{ActionExecutionRequest, ActionExecutionResult, ActionProtocol};

use crate::client::Session;
use crate::error::ClientResult;

#[derive(Debug, Deserialize)]
struct ProtocolResponse {
    actions: Vec<ActionProtocol>,
}

/// View over `/actions/*`.
#[derive(Clone)]
pub struct Actions {
    session: Session,
}

impl Actions {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn execute(&self, request: ActionExecutionRequest) -> ClientResult<ActionExecutionResult> {
        self.session.post("/actions/execute", &request).await
    }

    pub async fn protocol(&self) -> ClientResult<Vec<ActionProtocol>> {
        let response: ProtocolResponse = self.session.get("/actions/protocol").await?;
        Ok(response.actions)
    }
}
