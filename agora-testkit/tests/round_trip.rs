use std::sync::Arc;

use agora_model::AgentProfile;
use agora_storage::StorageBackend;
use agora_storage_sqlite::SqliteBackend;
use agora_testkit::TestApp;
use serde_json::json;

async fn app() -> TestApp {
    let backend = SqliteBackend::in_memory().await.unwrap();
    TestApp::new(Arc::new(backend) as Arc<dyn StorageBackend>)
}

#[tokio::test]
async fn register_execute_and_fetch_round_trip_without_a_socket() {
    let app = app().await;

    let registered: serde_json::Value = app
        .post_json("/agents/register", &json!({"agent": AgentProfile::new("buyer")}))
        .await
        .assert_ok()
        .json();
    let token = registered["token"].as_str().unwrap().to_string();
    let agent_id = registered["agent"]["id"].as_str().unwrap().to_string();

    app.post_json("/agents/register", &json!({"agent": AgentProfile::new("seller")}))
        .await
        .assert_ok();

    app.post_json_authenticated(
        "/actions/execute",
        &json!({
            "name": "send_message",
            "parameters": {
                "from_agent_id": agent_id,
                "to_agent_id": "seller",
                "created_at": chrono::Utc::now().to_rfc3339(),
                "message": {"type": "text", "content": "hi"},
            },
            "metadata": {},
        }),
        &token,
    )
    .await
    .assert_ok();

    let protocol: serde_json::Value = app.get("/actions/protocol").await.assert_ok().json();
    assert!(!protocol["actions"].as_array().unwrap().is_empty());

    app.get("/agents/does-not-exist").await.assert_not_found();
    app.post_json_authenticated("/actions/execute", &json!({"name": "send_message", "parameters": {}}), "not-a-real-token")
        .await
        .assert_unauthorized();
}
