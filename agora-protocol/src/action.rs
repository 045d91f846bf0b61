use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_model::{ActionExecutionRequest, RowIndex};

use crate::message::Message;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub created_at: DateTime<Utc>,
    pub message: Message,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchMessagesRequest {
    #[serde(default)]
    pub from_agent_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub after: Option<DateTime<Utc>>,
    #[serde(default)]
    pub after_index: Option<RowIndex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivedMessage {
    pub from_agent_id: String,
    pub to_agent_id: String,
    pub created_at: DateTime<Utc>,
    pub message: Message,
    pub index: RowIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchMessagesResponse {
    pub messages: Vec<ReceivedMessage>,
    pub has_more: bool,
}

/// Page size used when a fetch-messages caller doesn't specify one,
/// matching the launcher's own default polling page size.
pub const DEFAULT_FETCH_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchAlgorithm {
    Simple,
    Filtered,
    Lexical,
    Optimal,
    /// Retrieve-and-rerank via embeddings. Named only so the wire format
    /// stays forward-compatible; executing it is out of scope and always
    /// fails with `unsupported_algorithm`.
    Rnr,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConstraints {
    #[serde(default)]
    pub rating_threshold: Option<f64>,
    #[serde(default)]
    pub amenity_features: Option<Vec<String>>,
    #[serde(default)]
    pub menu_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_algorithm: SearchAlgorithm,
    #[serde(default)]
    pub constraints: Option<SearchConstraints>,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
    #[serde(default = "default_search_page")]
    pub page: i64,
}

fn default_search_limit() -> i64 {
    10
}

fn default_search_page() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub businesses: Vec<agora_model::Business>,
    pub search_algorithm: SearchAlgorithm,
    pub total_possible_results: i64,
    pub total_pages: i64,
}

/// The closed set of actions the marketplace protocol supports. Unknown
/// action names are rejected before ever reaching this type.
#[derive(Debug, Clone)]
pub enum Action {
    SendMessage(SendMessageRequest),
    FetchMessages(FetchMessagesRequest),
    Search(SearchRequest),
}

#[derive(Debug)]
pub struct UnknownAction(pub String);

impl std::fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl Action {
    pub const SEND_MESSAGE: &'static str = "send_message";
    pub const FETCH_MESSAGES: &'static str = "fetch_messages";
    pub const SEARCH: &'static str = "search";

    pub fn name(&self) -> &'static str {
        match self {
            Action::SendMessage(_) => Self::SEND_MESSAGE,
            Action::FetchMessages(_) => Self::FETCH_MESSAGES,
            Action::Search(_) => Self::SEARCH,
        }
    }

    /// Parses a request envelope's `name`/`parameters` into a concrete
    /// action, or `UnknownAction` if the name isn't one of the three the
    /// marketplace protocol declares.
    pub fn from_request(request: &ActionExecutionRequest) -> Result<Action, UnknownAction> {
        fn parse<T: serde::de::DeserializeOwned>(
            value: &serde_json::Value,
            name: &str,
        ) -> Result<T, UnknownAction> {
            serde_json::from_value(value.clone()).map_err(|_| UnknownAction(name.to_string()))
        }
        match request.name.as_str() {
            Self::SEND_MESSAGE => Ok(Action::SendMessage(parse(&request.parameters, &request.name)?)),
            Self::FETCH_MESSAGES => Ok(Action::FetchMessages(parse(&request.parameters, &request.name)?)),
            Self::SEARCH => Ok(Action::Search(parse(&request.parameters, &request.name)?)),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_known_action_names() {
        let request = ActionExecutionRequest {
            name: "fetch_messages".into(),
            parameters: json!({"limit": 5}),
            metadata: Default::default(),
        };
        let action = Action::from_request(&request).unwrap();
        assert!(matches!(action, Action::FetchMessages(_)));
        assert_eq!(action.name(), "fetch_messages");
    }

    #[test]
    fn rejects_unknown_action_names() {
        let request = ActionExecutionRequest {
            name: "teleport".into(),
            parameters: json!({}),
            metadata: Default::default(),
        };
        assert!(Action::from_request(&request).is_err());
    }
}
