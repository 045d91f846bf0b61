use std::collections::HashMap;
use std::time::Duration;

use agora_client::MarketplaceClient;
use agora_runtime::{run_agent, Agent, ShutdownHandle};
use tokio::task::{Id, JoinSet};

use crate::marketplace::{query_marketplace_state, LauncherError, MarketplaceState};

const SHUTDOWN_PROPAGATION_GRACE: Duration = Duration::from_millis(100);
const SHUTDOWN_SETTLE_PAUSE: Duration = Duration::from_millis(200);

/// Runs a set of agents against an already-running gateway. Does not own
/// the gateway's own lifecycle, only the agents'.
pub struct AgentLauncher {
    base_url: String,
}

/// A running group of agent tasks plus the shutdown handle each was given,
/// so the group can be signalled as a whole.
struct Group {
    tasks: JoinSet<Result<(), agora_runtime::AgentError>>,
    shutdowns: HashMap<Id, ShutdownHandle>,
}

impl Group {
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            shutdowns: HashMap::new(),
        }
    }

    fn spawn(&mut self, base_url: &str, agent: Box<dyn Agent>) {
        let shutdown = ShutdownHandle::new();
        let client = MarketplaceClient::new(base_url.to_string());
        let task_shutdown = shutdown.clone();
        let handle = self
            .tasks
            .spawn(async move { run_agent(agent.as_ref(), client, task_shutdown).await });
        self.shutdowns.insert(handle.id(), shutdown);
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn shutdown_all(&self) {
        for shutdown in self.shutdowns.values() {
            shutdown.shutdown();
        }
    }

    /// Awaits every task in the group as it finishes (not in spawn order),
    /// signalling the rest of the group to shut down on the first failure.
    /// Returns the first failure once the whole group has settled.
    async fn await_all_signalling_on_failure(mut self) -> Result<(), LauncherError> {
        let mut first_error = None;
        while let Some(result) = self.tasks.join_next().await {
            let outcome = result.expect("agent task panicked");
            if let Err(err) = outcome {
                if first_error.is_none() {
                    self.shutdown_all();
                    first_error = Some(LauncherError::from(err));
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Signals every task to shut down, gives the propagation grace window,
    /// then awaits all of them with failures suppressed.
    async fn shut_down_and_settle(mut self) {
        self.shutdown_all();
        tokio::time::sleep(SHUTDOWN_PROPAGATION_GRACE).await;
        while self.tasks.join_next().await.is_some() {}
        tokio::time::sleep(SHUTDOWN_SETTLE_PAUSE).await;
    }
}

impl AgentLauncher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Runs every agent concurrently with no ordering between them. Any
    /// failure signals the rest of the set to shut down, gives them the
    /// grace window, and re-raises the first failure once the set is
    /// settled.
    pub async fn run_flat(&self, agents: Vec<Box<dyn Agent>>) -> Result<(), LauncherError> {
        let mut group = Group::new();
        for agent in agents {
            group.spawn(&self.base_url, agent);
        }
        group.await_all_signalling_on_failure().await
    }

    /// Runs `primaries` to completion, then signals `dependents` to shut
    /// down, waits the grace window, then awaits them. Any failure in
    /// either tier signals the whole group to shut down and re-raises the
    /// original error once it has settled.
    pub async fn run_tiered(
        &self,
        primaries: Vec<Box<dyn Agent>>,
        dependents: Vec<Box<dyn Agent>>,
    ) -> Result<(), LauncherError> {
        let mut primary_group = Group::new();
        for agent in primaries {
            primary_group.spawn(&self.base_url, agent);
        }
        let mut dependent_group = Group::new();
        for agent in dependents {
            dependent_group.spawn(&self.base_url, agent);
        }

        if let Err(err) = primary_group.await_all_signalling_on_failure().await {
            dependent_group.shut_down_and_settle().await;
            return Err(err);
        }

        if dependent_group.is_empty() {
            return Ok(());
        }
        dependent_group.shutdown_all();
        tokio::time::sleep(SHUTDOWN_PROPAGATION_GRACE).await;
        let result = dependent_group.await_all_signalling_on_failure().await;
        tokio::time::sleep(SHUTDOWN_SETTLE_PAUSE).await;
        result
    }

    /// Reflects registrations made against the already-running gateway this
    /// launcher targets.
    pub async fn query_marketplace_state(&self) -> Result<MarketplaceState, LauncherError> {
        let client = MarketplaceClient::new(self.base_url.clone());
        query_marketplace_state(&client).await
    }
}
