use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::ActionRowData;
use crate::log::Log;
use crate::participant::AgentProfile;

/// Monotonic, backend-assigned ordering key. Authoritative for all iteration order.
pub type RowIndex = i64;

/// A generic database row: an id, an insertion timestamp, a row index, and a
/// typed JSON payload. Backends assign `index` at insertion time and never
/// renumber it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row<T> {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: T,
    pub index: RowIndex,
}

/// A participant row. `embedding` and `auth_token` live alongside the JSON
/// payload rather than inside it, as separate, always-present columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: AgentProfile,
    pub index: RowIndex,
    pub embedding: Option<Vec<u8>>,
    pub auth_token: Option<String>,
}

pub type ActionRow = Row<ActionRowData>;
pub type LogRow = Row<Log>;
