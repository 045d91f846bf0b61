use chrono::Utc;
use uuid::Uuid;

use agora_model::{ActionExecutionRequest, ActionExecutionResult, ActionProtocol, ActionRow, ParticipantRow};
use agora_storage::{ActionController, NewAction, ParticipantController};

use crate::action::Action;
use crate::error::{DispatchError, DispatchResult};
use crate::handlers::{fetch_messages, search, send_message};

/// Declares the three action names the marketplace protocol supports, with
/// their parameter schemas, for `GET /actions/protocol`.
pub fn action_protocols() -> Vec<ActionProtocol> {
    vec![
        ActionProtocol {
            name: Action::SEND_MESSAGE.to_string(),
            description: "Send a message to another participant.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "required": ["from_agent_id", "to_agent_id", "created_at", "message"],
                "properties": {
                    "from_agent_id": {"type": "string"},
                    "to_agent_id": {"type": "string"},
                    "created_at": {"type": "string", "format": "date-time"},
                    "message": {"type": "object"},
                },
            }),
            metadata: Default::default(),
        },
        ActionProtocol {
            name: Action::FETCH_MESSAGES.to_string(),
            description: "Fetch messages addressed to the caller.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "from_agent_id": {"type": "string"},
                    "limit": {"type": "integer"},
                    "offset": {"type": "integer"},
                    "after": {"type": "string", "format": "date-time"},
                    "after_index": {"type": "integer"},
                },
            }),
            metadata: Default::default(),
        },
        ActionProtocol {
            name: Action::SEARCH.to_string(),
            description: "Search for businesses in the marketplace.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "required": ["query", "search_algorithm"],
                "properties": {
                    "query": {"type": "string"},
                    "search_algorithm": {
                        "type": "string",
                        "enum": ["simple", "filtered", "lexical", "optimal", "rnr"],
                    },
                    "constraints": {"type": "object"},
                    "limit": {"type": "integer"},
                    "page": {"type": "integer"},
                },
            }),
            metadata: Default::default(),
        },
    ]
}

/// Runs the named action and journals the resulting `{agent_id, request,
/// result}` tuple. Steps 3 and 4 of dispatch (run the handler, persist the
/// row) are atomic from the caller's perspective: either both happen or the
/// caller sees a retryable storage error and nothing was written.
pub async fn execute_action(
    caller: &ParticipantRow,
    request: ActionExecutionRequest,
    participants: &dyn ParticipantController,
    actions: &dyn ActionController,
) -> DispatchResult<ActionExecutionResult> {
    let action = Action::from_request(&request).map_err(|err| DispatchError::UnknownAction(err.0))?;

    let result = match &action {
        Action::SendMessage(send) => {
            send_message::execute_send_message(send, participants, actions).await
        }
        Action::FetchMessages(fetch) => {
            fetch_messages::execute_fetch_messages(fetch, &caller.id, actions).await
        }
        Action::Search(params) => {
            let caller_customer = caller.data.customer();
            search::execute_search(params, caller_customer.as_ref(), participants).await
        }
    };

    let row: ActionRow = actions
        .create(NewAction {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            data: agora_model::ActionRowData {
                agent_id: caller.id.clone(),
                request,
                result: result.clone(),
            },
        })
        .await?;

    Ok(row.data.result)
}
