use std::time::Duration;

use agora_model::{ActionExecutionRequest, AgentProfile};
use agora_runtime::{Agent, AgentContext, AgentError};
use async_trait::async_trait;

/// A reference agent with no policy of its own: it registers, then polls
/// `fetch_messages` on an interval and logs what it sees. Exercises the
/// full client/runtime surface end to end without depending on any
/// out-of-scope decision logic.
pub struct HeartbeatAgent {
    profile: AgentProfile,
    poll_interval: Duration,
}

impl HeartbeatAgent {
    pub fn new(profile: AgentProfile, poll_interval: Duration) -> Self {
        Self { profile, poll_interval }
    }
}

#[async_trait]
impl Agent for HeartbeatAgent {
    fn profile(&self) -> AgentProfile {
        self.profile.clone()
    }

    async fn on_started(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        ctx.logger.info("heartbeat agent online");
        Ok(())
    }

    async fn step(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        let request = ActionExecutionRequest {
            name: "fetch_messages".to_string(),
            parameters: serde_json::json!({}),
            metadata: Default::default(),
        };
        let result = ctx.client.actions().execute(request).await?;
        if result.is_error {
            ctx.logger.warning(format!("fetch_messages returned an error: {}", result.content));
        } else if let Some(messages) = result.content.get("messages").and_then(|m| m.as_array()) {
            if !messages.is_empty() {
                ctx.logger.info(format!("received {} message(s)", messages.len()));
            }
        }

        if !ctx.shutdown.is_shutting_down() {
            tokio::time::sleep(self.poll_interval).await;
        }
        Ok(())
    }

    async fn on_will_stop(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        ctx.logger.info("heartbeat agent shutting down");
        Ok(())
    }
}
