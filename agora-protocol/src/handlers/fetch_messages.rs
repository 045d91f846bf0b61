use agora_model::{ActionExecutionResult, ActionRow};
use agora_query::{Query, RangeQueryParams};
use agora_storage::ActionController;

use crate::action::{
    Action, FetchMessagesRequest, FetchMessagesResponse, ReceivedMessage, DEFAULT_FETCH_LIMIT,
};
use crate::message::Message;

pub async fn execute_fetch_messages(
    request: &FetchMessagesRequest,
    recipient_id: &str,
    actions: &dyn ActionController,
) -> ActionExecutionResult {
    let limit = request.limit.unwrap_or(DEFAULT_FETCH_LIMIT);

    let mut query = Query::eq("request.name", Action::SEND_MESSAGE)
        .and(Query::eq("request.parameters.to_agent_id", recipient_id.to_string()));
    if let Some(from_agent_id) = &request.from_agent_id {
        query = query.and(Query::eq(
            "request.parameters.from_agent_id",
            from_agent_id.clone(),
        ));
    }

    let range = RangeQueryParams {
        offset: request.offset,
        limit: Some(limit),
        after: request.after,
        after_index: request.after_index,
        ..RangeQueryParams::new()
    }
    .with_overfetch();

    let rows = match actions.find(&query, &range).await {
        Ok(rows) => rows,
        Err(err) => {
            return ActionExecutionResult::error(serde_json::json!({"error": err.to_string()}))
        }
    };

    let mut messages: Vec<ReceivedMessage> = rows.iter().filter_map(to_received_message).collect();

    let has_more = messages.len() as i64 > limit;
    if has_more {
        messages.truncate(limit as usize);
    }

    let response = FetchMessagesResponse { messages, has_more };
    ActionExecutionResult::success(serde_json::to_value(response).unwrap_or(serde_json::Value::Null))
}

fn to_received_message(row: &ActionRow) -> Option<ReceivedMessage> {
    let params = &row.data.request.parameters;
    let from_agent_id = params.get("from_agent_id")?.as_str()?.to_string();
    let to_agent_id = params.get("to_agent_id")?.as_str()?.to_string();
    let message: Message = serde_json::from_value(params.get("message")?.clone()).ok()?;

    Some(ReceivedMessage {
        from_agent_id,
        to_agent_id,
        created_at: row.created_at,
        message,
        index: row.index,
    })
}
