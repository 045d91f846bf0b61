use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use agora_model::{ActionRowData, AgentProfile, Log};

/// A participant row before insertion — the backend assigns the row index.
pub struct NewParticipant {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: AgentProfile,
    pub embedding: Option<Vec<u8>>,
    pub auth_token: Option<String>,
}

pub struct NewAction {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: ActionRowData,
}

pub struct NewLog {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub data: Log,
}

/// Field-level update for a participant row. `None` leaves a field
/// untouched; `Some(None)` clears an optional field; `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct ParticipantUpdate {
    pub metadata: Option<Map<String, Value>>,
    pub embedding: Option<Option<Vec<u8>>>,
    pub auth_token: Option<Option<String>>,
}

impl ParticipantUpdate {
    pub fn set_auth_token(token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(Some(token.into())),
            ..Default::default()
        }
    }

    pub fn revoke_auth_token() -> Self {
        Self {
            auth_token: Some(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionUpdate {
    pub data: Option<ActionRowData>,
}

#[derive(Debug, Clone, Default)]
pub struct LogUpdate {
    pub data: Option<Log>,
}
