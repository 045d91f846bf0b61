use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agora_launcher::{AgentLauncher, MarketplaceLauncher};
use agora_model::AgentProfile;
use agora_runtime::{Agent, AgentContext, AgentError};
use agora_storage_sqlite::SqliteBackend;
use async_trait::async_trait;

struct OneShotAgent {
    id: String,
    ran: Arc<AtomicUsize>,
}

#[async_trait]
impl Agent for OneShotAgent {
    fn profile(&self) -> AgentProfile {
        AgentProfile::new(self.id.clone())
    }

    async fn step(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        self.ran.fetch_add(1, Ordering::SeqCst);
        ctx.shutdown.shutdown();
        Ok(())
    }
}

struct FailingAgent {
    id: String,
}

#[async_trait]
impl Agent for FailingAgent {
    fn profile(&self) -> AgentProfile {
        AgentProfile::new(self.id.clone())
    }

    async fn step(&self, _ctx: &AgentContext) -> Result<(), AgentError> {
        Err("boom".into())
    }
}

struct UntilShutdownAgent {
    id: String,
    steps: Arc<AtomicUsize>,
}

#[async_trait]
impl Agent for UntilShutdownAgent {
    fn profile(&self) -> AgentProfile {
        AgentProfile::new(self.id.clone())
    }

    async fn step(&self, ctx: &AgentContext) -> Result<(), AgentError> {
        self.steps.fetch_add(1, Ordering::SeqCst);
        if !ctx.shutdown.is_shutting_down() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        Ok(())
    }
}

async fn start_launcher() -> MarketplaceLauncher {
    let backend = Arc::new(SqliteBackend::in_memory().await.unwrap());
    MarketplaceLauncher::start("127.0.0.1:0", backend).await.unwrap()
}

#[tokio::test]
async fn launcher_starts_and_reports_a_healthy_snapshot() {
    let launcher = start_launcher().await;

    let state = launcher.query_marketplace_state().await.unwrap();
    assert!(state.healthy);
    assert!(state.agents.is_empty());
    assert_eq!(state.actions.len(), 3);

    launcher.stop().await.unwrap();
}

#[tokio::test]
async fn agent_launcher_runs_a_flat_set_and_surfaces_registrations() {
    let launcher = start_launcher().await;
    let agent_runner = AgentLauncher::new(launcher.base_url());

    let ran = Arc::new(AtomicUsize::new(0));
    let agents: Vec<Box<dyn Agent>> = vec![Box::new(OneShotAgent {
        id: "shopper".to_string(),
        ran: ran.clone(),
    })];
    agent_runner.run_flat(agents).await.unwrap();

    assert_eq!(ran.load(Ordering::SeqCst), 1);
    let state = agent_runner.query_marketplace_state().await.unwrap();
    assert_eq!(state.agents.len(), 1);

    launcher.stop().await.unwrap();
}

#[tokio::test]
async fn a_failing_agent_in_a_flat_set_surfaces_its_error() {
    let launcher = start_launcher().await;
    let agent_runner = AgentLauncher::new(launcher.base_url());

    let agents: Vec<Box<dyn Agent>> = vec![Box::new(FailingAgent { id: "broken".to_string() })];
    let result = agent_runner.run_flat(agents).await;

    assert!(result.is_err());
    launcher.stop().await.unwrap();
}

#[tokio::test]
async fn dependents_are_shut_down_once_primaries_finish() {
    let launcher = start_launcher().await;
    let agent_runner = AgentLauncher::new(launcher.base_url());

    let primary_ran = Arc::new(AtomicUsize::new(0));
    let dependent_steps = Arc::new(AtomicUsize::new(0));

    let primaries: Vec<Box<dyn Agent>> = vec![Box::new(OneShotAgent {
        id: "primary".to_string(),
        ran: primary_ran.clone(),
    })];
    let dependents: Vec<Box<dyn Agent>> = vec![Box::new(UntilShutdownAgent {
        id: "dependent".to_string(),
        steps: dependent_steps.clone(),
    })];

    agent_runner.run_tiered(primaries, dependents).await.unwrap();

    assert_eq!(primary_ran.load(Ordering::SeqCst), 1);
    assert!(dependent_steps.load(Ordering::SeqCst) >= 1);

    launcher.stop().await.unwrap();
}
