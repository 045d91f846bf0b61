//! Process supervision for the marketplace: a launcher that starts the
//! gateway and waits for it to become healthy, and a launcher that runs
//! agents against an already-running one, flat or in primary/dependent
//! tiers with a two-phase shutdown.

mod agents;
mod marketplace;

pub use agents::AgentLauncher;
pub use marketplace::{query_marketplace_state, LauncherError, LauncherResult, MarketplaceLauncher, MarketplaceState};
