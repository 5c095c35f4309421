//! Integration tests for the character-creation dialogue.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_creation_completes_once_name_race_and_class_are_known() {
    let app = common::build_test_app();

    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/character-creation",
        &serde_json::json!({ "messages": [
            { "role": "user", "content": "I'd like to be a halfling rogue" }
        ]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["isComplete"], false);
    assert_eq!(json["characterDataDelta"]["race"], "Halfling");

    let (_, json) = common::post_json(
        app,
        "/api/v1/character-creation",
        &serde_json::json!({ "messages": [
            { "role": "user", "content": "I'd like to be a halfling rogue" },
            { "role": "assistant", "content": "What is your name?" },
            { "role": "user", "content": "My name is Pip" }
        ]}),
    )
    .await;
    assert_eq!(json["isComplete"], true);
    assert_eq!(json["action"], "character_creation");
    assert_eq!(json["characterDataDelta"]["name"], "Pip");
    assert_eq!(json["characterDataDelta"]["class"], "Rogue");
}
