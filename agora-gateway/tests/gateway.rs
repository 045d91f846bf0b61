use std::sync::Arc;

use agora_gateway::{router, AppState};
use agora_storage::StorageBackend;
use agora_storage_sqlite::SqliteBackend;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let backend = SqliteBackend::in_memory().await.unwrap();
    AppState::new(Arc::new(backend) as Arc<dyn StorageBackend>)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_the_backend_name() {
    let app = router(test_state().await);
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "sqlite");
}

#[tokio::test]
async fn register_allocates_a_suffixed_id_and_returns_a_token() {
    let app = router(test_state().await);
    let (status, body) = send(
        app,
        post(
            "/agents/register",
            json!({"agent": {"id": "alice", "metadata": {}}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agent"]["id"], "alice-0");
    assert!(body["token"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn get_unknown_agent_is_404() {
    let app = router(test_state().await);
    let (status, _) = send(app, get("/agents/ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn execute_action_without_a_token_is_401() {
    let app = router(test_state().await);
    let (status, _) = send(
        app,
        post(
            "/actions/execute",
            json!({"name": "fetch_messages", "parameters": {}, "metadata": {}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_then_execute_round_trips_through_the_http_surface() {
    let state = test_state().await;
    let app = router(state.clone());

    let (_, register_body) = send(
        app.clone(),
        post(
            "/agents/register",
            json!({"agent": {"id": "alice", "metadata": {}}}),
        ),
    )
    .await;
    let token = register_body["token"].as_str().unwrap().to_string();

    let request = Request::post("/actions/execute")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({"name": "fetch_messages", "parameters": {}, "metadata": {}}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_error"], false);
    assert_eq!(body["content"]["messages"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn protocol_lists_the_three_marketplace_actions() {
    let app = router(test_state().await);
    let (status, body) = send(app, get("/actions/protocol")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actions"].as_array().unwrap().len(), 3);
}
