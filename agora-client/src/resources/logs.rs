use serde::Serialize;

use agora_model::{ListEnvelope, Log, LogRow};

use crate::client::Session;
use crate::error::ClientResult;

#[derive(Debug, Serialize)]
struct CreateLogRequest {
    log: Log,
}

/// View over `/logs/*`.
#[derive(Clone)]
pub struct Logs {
    session: Session,
}

impl Logs {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn create(&self, log: Log) -> ClientResult<()> {
        let _: serde_json::Value = self.session.post("/logs/create", &CreateLogRequest { log }).await?;
        Ok(())
    }

    pub async fn list(&self, offset: i64, limit: Option<i64>) -> ClientResult<ListEnvelope<LogRow>> {
        let mut path = format!("/logs?offset={offset}");
        if let Some(limit) = limit {
            path.push_str(&format!("&limit={limit}"));
        }
        self.session.get(&path).await
    }
}
