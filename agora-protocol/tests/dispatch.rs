use agora_model::{ActionExecutionRequest, AgentProfile, Business, ParticipantRow};
use agora_protocol::{execute_action, Action};
use agora_storage::{NewParticipant, StorageBackend};
use agora_storage_sqlite::SqliteBackend;
use chrono::Utc;
use serde_json::{json, Map};

async fn register(backend: &SqliteBackend, id: &str, metadata: Map<String, serde_json::Value>) -> ParticipantRow {
    backend
        .participants()
        .create(NewParticipant {
            id: id.to_string(),
            created_at: Utc::now(),
            data: AgentProfile {
                id: id.to_string(),
                metadata,
            },
            embedding: None,
            auth_token: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn send_then_fetch_round_trips_a_text_message() {
    let backend = SqliteBackend::in_memory().await.unwrap();
    let alice = register(&backend, "alice", Map::new()).await;
    let _bob = register(&backend, "bob", Map::new()).await;

    let send_request = ActionExecutionRequest {
        name: Action::SEND_MESSAGE.to_string(),
        parameters: json!({
            "from_agent_id": "alice",
            "to_agent_id": "bob",
            "created_at": Utc::now(),
            "message": {"type": "text", "content": "hi bob"},
        }),
        metadata: Map::new(),
    };
    let result = execute_action(&alice, send_request, backend.participants(), backend.actions())
        .await
        .unwrap();
    assert!(!result.is_error);

    let bob = backend.participants().get_by_id("bob").await.unwrap().unwrap();
    let fetch_request = ActionExecutionRequest {
        name: Action::FETCH_MESSAGES.to_string(),
        parameters: json!({}),
        metadata: Map::new(),
    };
    let result = execute_action(&bob, fetch_request, backend.participants(), backend.actions())
        .await
        .unwrap();
    assert!(!result.is_error);
    let messages = result.content["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message"]["content"], "hi bob");
}

#[tokio::test]
async fn send_message_to_unknown_recipient_is_a_handler_error_with_a_journaled_row() {
    let backend = SqliteBackend::in_memory().await.unwrap();
    let alice = register(&backend, "alice", Map::new()).await;

    let request = ActionExecutionRequest {
        name: Action::SEND_MESSAGE.to_string(),
        parameters: json!({
            "from_agent_id": "alice",
            "to_agent_id": "ghost",
            "created_at": Utc::now(),
            "message": {"type": "text", "content": "hello?"},
        }),
        metadata: Map::new(),
    };
    let result = execute_action(&alice, request, backend.participants(), backend.actions())
        .await
        .unwrap();
    assert!(result.is_error);
    assert_eq!(result.content["error_type"], "recipient_not_found");
    assert_eq!(backend.actions().count().await.unwrap(), 1);
}

#[tokio::test]
async fn optimal_search_returns_only_fully_stockable_businesses() {
    let backend = SqliteBackend::in_memory().await.unwrap();

    let mut business_a = Map::new();
    business_a.insert(
        "business".into(),
        serde_json::to_value(Business {
            id: "a".into(),
            name: "A".into(),
            description: String::new(),
            rating: 3.0,
            progenitor_customer: String::new(),
            menu_features: [("bread".to_string(), 1.0)].into_iter().collect(),
            amenity_features: Default::default(),
            min_price_factor: 1.0,
        })
        .unwrap(),
    );
    register(&backend, "a", business_a).await;

    let mut business_b = Map::new();
    business_b.insert(
        "business".into(),
        serde_json::to_value(Business {
            id: "b".into(),
            name: "B".into(),
            description: String::new(),
            rating: 4.0,
            progenitor_customer: String::new(),
            menu_features: [("bread".to_string(), 1.0), ("milk".to_string(), 1.0)]
                .into_iter()
                .collect(),
            amenity_features: Default::default(),
            min_price_factor: 1.0,
        })
        .unwrap(),
    );
    register(&backend, "b", business_b).await;

    let mut customer_metadata = Map::new();
    customer_metadata.insert(
        "customer".into(),
        json!({
            "id": "cust",
            "name": "Cust",
            "request": "",
            "menu_features": {"bread": 1.0, "milk": 1.0},
            "amenity_features": [],
        }),
    );
    let customer = register(&backend, "cust", customer_metadata).await;

    let request = ActionExecutionRequest {
        name: Action::SEARCH.to_string(),
        parameters: json!({
            "query": "",
            "search_algorithm": "optimal",
            "limit": 10,
            "page": 1,
        }),
        metadata: Map::new(),
    };
    let result = execute_action(&customer, request, backend.participants(), backend.actions())
        .await
        .unwrap();
    assert!(!result.is_error);
    let businesses = result.content["businesses"].as_array().unwrap();
    assert_eq!(businesses.len(), 1);
    assert_eq!(businesses[0]["id"], "b");
}
