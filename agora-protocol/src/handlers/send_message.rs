use agora_model::ActionExecutionResult;
use agora_query::{Query, RangeQueryParams};
use agora_storage::{ActionController, ParticipantController, StorageError};

use crate::action::{Action, SendMessageRequest};
use crate::message::Payment;

/// Validates and "executes" a send-message action. There is no messages
/// table: the action row the dispatcher appends afterwards is the message.
pub async fn execute_send_message(
    request: &SendMessageRequest,
    participants: &dyn ParticipantController,
    actions: &dyn ActionController,
) -> ActionExecutionResult {
    let recipient = match participants.get_by_id(&request.to_agent_id).await {
        Ok(recipient) => recipient,
        Err(err) => {
            return ActionExecutionResult::error(serde_json::json!({"error": err.to_string()}))
        }
    };
    if recipient.is_none() {
        return ActionExecutionResult::error(serde_json::json!({
            "error_type": "recipient_not_found",
            "message": format!("to_agent_id {} not found", request.to_agent_id),
        }));
    }

    if let Some(payment) = request.message.as_payment() {
        match proposal_exists(payment, request, actions).await {
            Ok(true) => {}
            Ok(false) => {
                return ActionExecutionResult::error(serde_json::json!({
                    "error_type": "invalid_proposal",
                    "message": format!(
                        "no order proposal found with id {}",
                        payment.proposal_message_id
                    ),
                }));
            }
            Err(err) => {
                return ActionExecutionResult::error(serde_json::json!({
                    "error_type": "database_error",
                    "message": err.to_string(),
                }));
            }
        }
    }

    let content = serde_json::to_value(request).unwrap_or(serde_json::Value::Null);
    let mut result = ActionExecutionResult::success(content);
    result
        .metadata
        .insert("status".into(), serde_json::Value::String("sent".into()));
    result
}

/// A payment is valid only against an order proposal sent by the payer's
/// counterpart (`to_agent_id`) to the payer (`from_agent_id`), identified
/// by application-level proposal id.
async fn proposal_exists(
    payment: &Payment,
    request: &SendMessageRequest,
    actions: &dyn ActionController,
) -> Result<bool, StorageError> {
    let query = Query::eq("request.name", Action::SEND_MESSAGE)
        .and(Query::eq(
            "request.parameters.from_agent_id",
            request.to_agent_id.clone(),
        ))
        .and(Query::eq(
            "request.parameters.message.type",
            "order_proposal",
        ))
        .and(Query::eq(
            "request.parameters.message.id",
            payment.proposal_message_id.clone(),
        ));

    let rows = actions.find(&query, &RangeQueryParams::new()).await?;
    Ok(!rows.is_empty())
}
