use serde::{Deserialize, Serialize};

/// A paginated list response envelope shared by the agents and logs endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<i64>,
    pub offset: i64,
    pub limit: Option<i64>,
    #[serde(default)]
    pub has_more: Option<bool>,
}
