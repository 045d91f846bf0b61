pub mod actions;
pub mod agents;
pub mod health;
pub mod logs;
