use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares one supported action: its name, a human description, and a JSON
/// schema for its parameters. Protocol modules advertise these at `/actions/protocol`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionProtocol {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// The request half of an action journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecutionRequest {
    pub name: String,
    pub parameters: Value,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// The result half of an action journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionExecutionResult {
    pub content: Value,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ActionExecutionResult {
    pub fn success(content: Value) -> Self {
        Self {
            content,
            is_error: false,
            metadata: Map::new(),
        }
    }

    pub fn error(content: Value) -> Self {
        Self {
            content,
            is_error: true,
            metadata: Map::new(),
        }
    }
}

/// The full payload stored on an action row: who ran it, what was asked, and
/// what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRowData {
    pub agent_id: String,
    pub request: ActionExecutionRequest,
    pub result: ActionExecutionResult,
}
