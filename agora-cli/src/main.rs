mod heartbeat_agent;
mod logging;
mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use agora_launcher::MarketplaceLauncher;
use agora_model::AgentProfile;
use agora_runtime::{run_agent, Agent, ShutdownHandle};
use agora_storage::StorageBackend;
use agora_storage_postgres::{PostgresBackend, PostgresBackendConfig};
use agora_storage_sqlite::{SqliteBackend, SqliteBackendConfig};
use clap::{Parser, Subcommand, ValueEnum};
use heartbeat_agent::HeartbeatAgent;

#[derive(Parser)]
#[command(name = "agora", version, about = "Marketplace gateway and agent launcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the marketplace gateway and serve until Ctrl-C or SIGTERM.
    Serve {
        /// Storage backend to run against.
        #[arg(long, value_enum, env = "AGORA_BACKEND", default_value = "sqlite")]
        backend: Backend,
        /// Sqlite file path, or a postgres:// URL when `--backend postgres`.
        #[arg(long, env = "AGORA_DATABASE_URL", default_value = ":memory:")]
        database_url: String,
        /// Address to bind the HTTP listener on.
        #[arg(long, env = "AGORA_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
        /// Default tracing filter when RUST_LOG isn't set.
        #[arg(long, env = "AGORA_LOG_LEVEL", default_value = "info")]
        log_level: String,
    },
    /// Run the built-in reference agent against a running marketplace.
    RunAgent {
        /// Base URL of the marketplace gateway.
        #[arg(long, env = "AGORA_MARKETPLACE_URL")]
        marketplace_url: String,
        /// Path to a JSON file containing the agent's registration profile.
        #[arg(long, conflicts_with = "profile_json")]
        profile: Option<std::path::PathBuf>,
        /// Inline JSON registration profile.
        #[arg(long, conflicts_with = "profile")]
        profile_json: Option<String>,
        /// Overrides the profile's `id` field before registering.
        #[arg(long)]
        id: Option<String>,
        /// Seconds to sleep between polls once nothing happened.
        #[arg(long, default_value_t = 5)]
        poll_interval_secs: u64,
        /// Default tracing filter when RUST_LOG isn't set.
        #[arg(long, env = "AGORA_LOG_LEVEL", default_value = "info")]
        log_level: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    Sqlite,
    Postgres,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve {
            backend,
            database_url,
            bind,
            log_level,
        } => {
            logging::init_tracing(&log_level);
            serve(backend, &database_url, &bind).await
        }
        Command::RunAgent {
            marketplace_url,
            profile,
            profile_json,
            id,
            poll_interval_secs,
            log_level,
        } => {
            logging::init_tracing(&log_level);
            run_agent_command(&marketplace_url, profile, profile_json, id, poll_interval_secs).await
        }
    };

    if let Err(err) = result {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

async fn build_backend(backend: Backend, database_url: &str) -> Result<Arc<dyn StorageBackend>, Box<dyn std::error::Error + Send + Sync>> {
    match backend {
        Backend::Sqlite => {
            let backend = SqliteBackend::connect(database_url, SqliteBackendConfig::default()).await?;
            Ok(Arc::new(backend))
        }
        Backend::Postgres => {
            let backend = PostgresBackend::connect(database_url, PostgresBackendConfig::default()).await?;
            Ok(Arc::new(backend))
        }
    }
}

async fn serve(backend: Backend, database_url: &str, bind: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let storage = build_backend(backend, database_url).await?;
    let launcher = MarketplaceLauncher::start(bind, storage).await?;
    let base_url = launcher.base_url();
    tracing::info!(%base_url, "marketplace gateway is serving");

    shutdown::signal().await;

    launcher.stop().await?;
    Ok(())
}

fn load_profile(
    profile: Option<std::path::PathBuf>,
    profile_json: Option<String>,
    id_override: Option<String>,
) -> Result<AgentProfile, Box<dyn std::error::Error + Send + Sync>> {
    let mut profile: AgentProfile = match (profile, profile_json) {
        (Some(path), None) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        (None, Some(json)) => serde_json::from_str(&json)?,
        (None, None) => return Err("one of --profile or --profile-json is required".into()),
        (Some(_), Some(_)) => unreachable!("clap enforces --profile and --profile-json are mutually exclusive"),
    };
    if let Some(id) = id_override {
        profile.id = id;
    }
    Ok(profile)
}

async fn run_agent_command(
    marketplace_url: &str,
    profile: Option<std::path::PathBuf>,
    profile_json: Option<String>,
    id_override: Option<String>,
    poll_interval_secs: u64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let profile = load_profile(profile, profile_json, id_override)?;
    let agent = HeartbeatAgent::new(profile, Duration::from_secs(poll_interval_secs));

    let client = agora_client::MarketplaceClient::new(marketplace_url.to_string());
    let shutdown = ShutdownHandle::new();
    let watcher_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown::signal().await;
        watcher_shutdown.shutdown();
    });

    run_agent(&agent as &dyn Agent, client, shutdown).await?;
    Ok(())
}
