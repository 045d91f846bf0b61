use std::sync::Arc;
use std::time::Duration;

use agora_client::MarketplaceClient;
use agora_gateway::AppState;
use agora_model::{ActionProtocol, LogRow, ParticipantRow};
use agora_storage::StorageBackend;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const HEALTH_CHECK_MAX_ATTEMPTS: u32 = 10;
const HEALTH_CHECK_BASE_DELAY: Duration = Duration::from_millis(100);
const HEALTH_CHECK_MAX_DELAY: Duration = Duration::from_secs(5);
const ROSTER_PAGE_SIZE: i64 = 100;
const RECENT_LOG_COUNT: i64 = 10;

/// A snapshot of marketplace state, assembled by walking the gateway's own
/// HTTP surface: health, the full agent roster, the advertised action
/// protocol, and the most recent log rows. Useful for CLI status reporting
/// and for tests that want to assert on end-to-end state rather than
/// reaching into storage directly.
#[derive(Debug, Clone)]
pub struct MarketplaceState {
    pub healthy: bool,
    pub backend: String,
    pub agents: Vec<ParticipantRow>,
    pub actions: Vec<ActionProtocol>,
    pub recent_logs: Vec<LogRow>,
}

/// Starts the gateway on a bound listener, waits for it to report healthy,
/// and stops it again on [`MarketplaceLauncher::stop`] (or on drop, via the
/// cancellation token's own graceful-shutdown signal to `axum::serve`).
pub struct MarketplaceLauncher {
    cancel: CancellationToken,
    server: Option<JoinHandle<std::io::Result<()>>>,
    base_url: String,
}

impl MarketplaceLauncher {
    /// Binds `addr`, spawns the gateway, and blocks until `/health` reports
    /// OK (or the backoff budget is exhausted).
    pub async fn start(addr: &str, backend: Arc<dyn StorageBackend>) -> Result<Self, LauncherError> {
        let listener = TcpListener::bind(addr).await.map_err(LauncherError::Bind)?;
        let bound_addr = listener.local_addr().map_err(LauncherError::Bind)?;
        let base_url = format!("http://{bound_addr}");

        let state = AppState::new(backend);
        let app = agora_gateway::router(state);
        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();

        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        });

        let launcher = Self {
            cancel,
            server: Some(server),
            base_url,
        };
        launcher.wait_until_healthy().await?;
        Ok(launcher)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> MarketplaceClient {
        MarketplaceClient::new(self.base_url.clone())
    }

    async fn wait_until_healthy(&self) -> Result<(), LauncherError> {
        let client = self.client();
        let mut delay = HEALTH_CHECK_BASE_DELAY;
        for attempt in 0..HEALTH_CHECK_MAX_ATTEMPTS {
            if let Ok(status) = client.health().check().await {
                if status.is_healthy() {
                    return Ok(());
                }
            }
            if attempt + 1 == HEALTH_CHECK_MAX_ATTEMPTS {
                break;
            }
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(HEALTH_CHECK_MAX_DELAY);
        }
        Err(LauncherError::NeverHealthy)
    }

    /// Assembles a full snapshot of marketplace state by walking the
    /// gateway's own HTTP surface.
    pub async fn query_marketplace_state(&self) -> Result<MarketplaceState, LauncherError> {
        query_marketplace_state(&self.client()).await
    }

    /// Signals the server to stop accepting new connections and finish
    /// in-flight ones, and awaits its task.
    pub async fn stop(mut self) -> std::io::Result<()> {
        self.cancel.cancel();
        if let Some(server) = self.server.take() {
            server.await.expect("gateway server task panicked")?;
        }
        Ok(())
    }
}

impl Drop for MarketplaceLauncher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Assembles a [`MarketplaceState`] snapshot against an already-running
/// gateway, without owning its process lifecycle. Shared by
/// [`MarketplaceLauncher::query_marketplace_state`] and
/// [`crate::AgentLauncher::query_marketplace_state`].
pub async fn query_marketplace_state(client: &MarketplaceClient) -> Result<MarketplaceState, LauncherError> {
    let health = client.health().check().await.map_err(LauncherError::Client)?;

    let mut agents = Vec::new();
    let mut offset = 0;
    loop {
        let page = client
            .agents()
            .list(offset, Some(ROSTER_PAGE_SIZE))
            .await
            .map_err(LauncherError::Client)?;
        let fetched = page.items.len() as i64;
        agents.extend(page.items);
        if !page.has_more.unwrap_or(false) || fetched == 0 {
            break;
        }
        offset += fetched;
    }

    let actions = client.actions().protocol().await.map_err(LauncherError::Client)?;

    let recent_logs = client
        .logs()
        .list(0, Some(RECENT_LOG_COUNT))
        .await
        .map_err(LauncherError::Client)?
        .items;

    Ok(MarketplaceState {
        healthy: health.is_healthy(),
        backend: health.backend,
        agents,
        actions,
        recent_logs,
    })
}

#[derive(Debug)]
pub enum LauncherError {
    Bind(std::io::Error),
    NeverHealthy,
    Client(agora_client::ClientError),
    Agent(agora_runtime::AgentError),
}

impl std::fmt::Display for LauncherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LauncherError::Bind(err) => write!(f, "failed to bind gateway listener: {err}"),
            LauncherError::NeverHealthy => write!(f, "gateway never reported healthy within the backoff budget"),
            LauncherError::Client(err) => write!(f, "marketplace client error: {err}"),
            LauncherError::Agent(err) => write!(f, "agent failed: {err}"),
        }
    }
}

impl std::error::Error for LauncherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LauncherError::Bind(err) => Some(err),
            LauncherError::Client(err) => Some(err),
            LauncherError::Agent(err) => Some(err.as_ref()),
            LauncherError::NeverHealthy => None,
        }
    }
}

impl From<agora_runtime::AgentError> for LauncherError {
    fn from(err: agora_runtime::AgentError) -> Self {
        LauncherError::Agent(err)
    }
}

pub type LauncherResult<T> = Result<T, LauncherError>;
