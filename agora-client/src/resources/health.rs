use serde::Deserialize;

use crate::client::Session;
use crate::error::ClientResult;

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// View over `/health`.
#[derive(Clone)]
pub struct Health {
    session: Session,
}

impl Health {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn check(&self) -> ClientResult<HealthStatus> {
        self.session.get("/health").await
    }
}
