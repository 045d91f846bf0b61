use std::sync::Arc;

use agora_client::MarketplaceClient;
use agora_model::AgentProfile;
use async_trait::async_trait;

use crate::logger::DualLogger;
use crate::shutdown::ShutdownHandle;

pub type AgentError = Box<dyn std::error::Error + Send + Sync>;

/// Handed to every lifecycle hook. Cheap to clone; everything inside is
/// reference-counted or itself a thin handle.
#[derive(Clone)]
pub struct AgentContext {
    pub client: MarketplaceClient,
    pub logger: Arc<DualLogger>,
    pub shutdown: ShutdownHandle,
    pub agent_id: String,
}

/// A long-lived marketplace participant. Implementations are driven by
/// [`crate::lifecycle::run_agent`], which owns registration, the polling
/// loop, and the shutdown handshake; `step()` is the only method that does
/// real work, the hooks exist for setup and teardown.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The profile to register with when the agent starts. The id submitted
    /// here may not be the id the agent actually runs under: the gateway
    /// appends a numeric suffix on collision.
    fn profile(&self) -> AgentProfile;

    async fn on_started(&self, _ctx: &AgentContext) -> Result<(), AgentError> {
        Ok(())
    }

    /// One iteration of the agent's work. Called back-to-back with no
    /// runtime-imposed delay between successful calls; an agent that has
    /// nothing to do between polls is responsible for sleeping itself.
    async fn step(&self, ctx: &AgentContext) -> Result<(), AgentError>;

    async fn on_will_stop(&self, _ctx: &AgentContext) -> Result<(), AgentError> {
        Ok(())
    }

    async fn on_stopped(&self, _ctx: &AgentContext) -> Result<(), AgentError> {
        Ok(())
    }

    /// How long to wait before retrying after a failed `step()`. Only
    /// consulted when the agent is not already shutting down.
    fn error_backoff(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1)
    }
}
