use agora_client::MarketplaceClient;
use agora_model::AgentProfile;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn register_fixes_the_returned_token_for_later_calls() {
    let server = MockServer::start_async().await;

    let register_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/agents/register");
            then.status(200).json_body(json!({
                "agent": {
                    "id": "alice-0",
                    "created_at": "2026-01-01T00:00:00Z",
                    "data": {"id": "alice-0", "metadata": {}},
                    "index": 0,
                    "embedding": null,
                    "auth_token": "tok-123"
                },
                "token": "tok-123"
            }));
        })
        .await;
    let protocol_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/actions/protocol")
                .header("authorization", "Bearer tok-123");
            then.status(200).json_body(json!({"actions": []}));
        })
        .await;

    let client = MarketplaceClient::new(server.base_url());
    let response = client
        .agents()
        .register(AgentProfile::new("alice"))
        .await
        .unwrap();
    assert_eq!(response.agent.id, "alice-0");
    assert_eq!(client.token().as_deref(), Some("tok-123"));

    let protocol = client.actions().protocol().await.unwrap();
    assert!(protocol.is_empty());

    register_mock.assert_async().await;
    protocol_mock.assert_async().await;
}

#[tokio::test]
async fn a_429_response_is_retried_until_the_budget_is_exhausted() {
    let server = MockServer::start_async().await;

    let busy_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/agents/alice-0");
            then.status(429).json_body(json!({"error": "too busy"}));
        })
        .await;

    let client = MarketplaceClient::new(server.base_url()).with_retry(agora_client::RetryConfig {
        max_attempts: 2,
        base_delay: std::time::Duration::from_millis(1),
        max_delay: std::time::Duration::from_millis(2),
        jitter: 0.0,
    });

    let result = client.agents().get("alice-0").await;
    assert!(result.is_err());
    busy_mock.assert_hits_async(2).await;
}

#[tokio::test]
async fn a_404_is_not_retried() {
    let server = MockServer::start_async().await;

    let not_found_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/agents/ghost");
            then.status(404).json_body(json!({"error": "no such agent"}));
        })
        .await;

    let client = MarketplaceClient::new(server.base_url());
    let result = client.agents().get("ghost").await;
    assert!(result.is_err());
    not_found_mock.assert_hits_async(1).await;
}
