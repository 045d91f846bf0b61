pub mod actions;
pub mod agents;
pub mod health;
pub mod logs;

pub use actions::Actions;
pub use agents::Agents;
pub use health::{Health, HealthStatus};
pub use logs::Logs;
