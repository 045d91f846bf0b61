use serde::{Deserialize, Serialize};

/// One item in an order proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// A plain text message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMessage {
    pub content: String,
}

/// An order proposal sent by a business to a customer. `expiry_time` is
/// carried but never read by send-message validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProposal {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

/// A payment message accepting a prior order proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub proposal_message_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_message: Option<String>,
}

/// The closed set of message payloads a send-message action can carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Text(TextMessage),
    OrderProposal(OrderProposal),
    Payment(Payment),
}

impl Message {
    pub fn as_order_proposal(&self) -> Option<&OrderProposal> {
        match self {
            Message::OrderProposal(proposal) => Some(proposal),
            _ => None,
        }
    }

    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            Message::Payment(payment) => Some(payment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_message_tags_as_text() {
        let message = Message::Text(TextMessage {
            content: "hi".into(),
        });
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["content"], "hi");
    }

    #[test]
    fn payment_round_trips() {
        let message = Message::Payment(Payment {
            proposal_message_id: "p-1".into(),
            payment_method: Some("cash".into()),
            delivery_address: None,
            payment_message: None,
        });
        let value = serde_json::to_value(&message).unwrap();
        let back: Message = serde_json::from_value(value).unwrap();
        assert!(back.as_payment().is_some());
    }
}
