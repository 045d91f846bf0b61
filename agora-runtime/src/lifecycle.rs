use std::sync::Arc;

use agora_client::MarketplaceClient;

use crate::agent::{Agent, AgentContext, AgentError};
use crate::logger::DualLogger;
use crate::shutdown::ShutdownHandle;

/// Connects to the marketplace, registers the agent, and runs it until
/// `shutdown` fires.
///
/// 1. register, fixing the assigned id and token on the client
/// 2. `on_started`
/// 3. loop `step()` until shutdown; a failed `step()` is logged and, unless
///    shutdown was requested meanwhile, followed by `error_backoff()` before
///    the next attempt
/// 4. `on_will_stop`, `on_stopped`, flush the logger
pub async fn run_agent(
    agent: &dyn Agent,
    client: MarketplaceClient,
    shutdown: ShutdownHandle,
) -> Result<(), AgentError> {
    let registration = client.agents().register(agent.profile()).await?;
    let agent_id = registration.agent.id;

    let logger = Arc::new(DualLogger::new(agent_id.clone(), client.logs()));
    let ctx = AgentContext {
        client,
        logger: logger.clone(),
        shutdown: shutdown.clone(),
        agent_id,
    };

    logger.info(format!("agent {} started", ctx.agent_id));
    if let Err(err) = agent.on_started(&ctx).await {
        logger.exception("on_started failed", err.as_ref());
        logger.flush().await;
        return Err(err);
    }

    while !shutdown.is_shutting_down() {
        if let Err(err) = agent.step(&ctx).await {
            logger.exception("step failed", err.as_ref());
            if shutdown.is_shutting_down() {
                break;
            }
            tokio::time::sleep(agent.error_backoff()).await;
        }
    }

    if let Err(err) = agent.on_will_stop(&ctx).await {
        logger.exception("on_will_stop failed", err.as_ref());
    }
    if let Err(err) = agent.on_stopped(&ctx).await {
        logger.exception("on_stopped failed", err.as_ref());
    }
    logger.info(format!("agent {} stopped", ctx.agent_id));
    logger.flush().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use agora_model::AgentProfile;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    struct CountingAgent {
        steps: AtomicUsize,
        shutdown_after: usize,
    }

    #[async_trait]
    impl Agent for CountingAgent {
        fn profile(&self) -> AgentProfile {
            AgentProfile::new("counter")
        }

        async fn step(&self, ctx: &AgentContext) -> Result<(), AgentError> {
            let count = self.steps.fetch_add(1, Ordering::SeqCst) + 1;
            if count >= self.shutdown_after {
                ctx.shutdown.shutdown();
            }
            Ok(())
        }

        fn error_backoff(&self) -> std::time::Duration {
            std::time::Duration::from_millis(1)
        }
    }

    #[tokio::test]
    async fn registers_then_steps_until_it_requests_its_own_shutdown() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/agents/register");
                then.status(200).json_body(json!({
                    "agent": {
                        "id": "counter",
                        "created_at": "2026-01-01T00:00:00Z",
                        "data": {"id": "counter", "metadata": {}},
                        "index": 1,
                        "embedding": null,
                        "auth_token": "tok"
                    },
                    "token": "tok"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/logs/create");
                then.status(200).json_body(json!({"error": null}));
            })
            .await;

        let client = MarketplaceClient::new(server.base_url());
        let shutdown = ShutdownHandle::new();
        let agent = CountingAgent {
            steps: AtomicUsize::new(0),
            shutdown_after: 3,
        };

        run_agent(&agent, client, shutdown.clone()).await.unwrap();

        assert_eq!(agent.steps.load(Ordering::SeqCst), 3);
        assert!(shutdown.is_shutting_down());
    }
}
