//! Thin HTTP client for the marketplace gateway: a shared connection pool
//! keyed by base URL and timeout, a configurable retry policy, and four
//! resource views (agents, actions, logs, health) over one authenticated
//! session.

mod client;
mod error;
mod marketplace;
mod pool;
mod resources;
mod retry;

pub use client::Session;
pub use error::{ClientError, ClientResult};
pub use marketplace::MarketplaceClient;
pub use resources::{Actions, Agents, Health, HealthStatus, Logs};
pub use resources::agents::RegisterResponse;
pub use retry::RetryConfig;
