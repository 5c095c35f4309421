//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use questforge_core::clock::Clock;
use questforge_core::rng::DeterministicRng;
use questforge_event_store::in_memory_event_repository::InMemoryEventRepository;
use questforge_session::domain::config::TurnConfig;
use questforge_test_support::{FixedClock, MockRng};
use tower::ServiceExt;

use questforge_api::build_router;
use questforge_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over a fresh in-memory store, a `MockRng`
/// (every roll is the minimum) and no automatic enemy turns.
pub fn build_test_app() -> Router {
    build_test_app_with(
        MockRng,
        TurnConfig {
            auto_enemy_turn: false,
            ..TurnConfig::default()
        },
    )
}

/// Build the full app router with a custom RNG and turn configuration.
pub fn build_test_app_with(
    rng: impl DeterministicRng + Send + 'static,
    turn_config: TurnConfig,
) -> Router {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::new(fixed_clock(), rng, Arc::new(InMemoryEventRepository::new()))
        .with_turn_config(turn_config);
    build_router(app_state)
}

/// Build the app router and hand back its state, for tests that need to
/// hold a session lock from outside.
pub fn build_test_app_and_state() -> (Router, AppState) {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let app_state = AppState::new(fixed_clock(), rng, Arc::new(InMemoryEventRepository::new()));
    (build_router(app_state.clone()), app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Start a session with the default character and return its id.
pub async fn start_session(app: &Router) -> String {
    let (status, json) =
        post_json(app.clone(), "/api/v1/sessions", &serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    json["sessionId"].as_str().unwrap().to_owned()
}

/// Play one turn and return the response.
pub async fn play(
    app: &Router,
    session_id: &str,
    text: &str,
    is_in_combat: bool,
) -> (StatusCode, serde_json::Value) {
    post_json(
        app.clone(),
        &format!("/api/v1/sessions/{session_id}/turns"),
        &serde_json::json!({
            "messages": [{ "role": "user", "content": text }],
            "isInCombat": is_in_combat
        }),
    )
    .await
}
