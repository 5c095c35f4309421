//! Integration tests for session start and turn processing.

mod common;

use axum::http::StatusCode;
use questforge_session::domain::config::TurnConfig;
use questforge_test_support::MockRng;
use uuid::Uuid;

#[tokio::test]
async fn test_start_session_returns_scenario_and_opening() {
    let app = common::build_test_app();

    let (status, json) =
        common::post_json(app, "/api/v1/sessions", &serde_json::json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["sessionId"].is_string());
    let title = json["scenario"]["title"].as_str().unwrap();
    assert!(json["openingMessage"].as_str().unwrap().contains(title));
    assert_eq!(json["state"]["character"]["name"], "Adventurer");
    assert_eq!(json["eventIds"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_look_turn_has_no_roll_and_no_events() {
    let app = common::build_test_app();
    let session_id = common::start_session(&app).await;

    let (status, json) = common::play(&app, &session_id, "I look around", false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action"], "look");
    assert!(json.get("diceRoll").is_none());
    assert!(json.get("characterDataDelta").is_none());
    assert_eq!(json["events"], serde_json::json!([]));
}

#[tokio::test]
async fn test_encounter_then_attack_round_trip() {
    // Arrange
    let app = common::build_test_app();
    let session_id = common::start_session(&app).await;

    // Act: a named monster starts an encounter
    let (status, json) = common::play(&app, &session_id, "worg", false).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action"], "trigger_encounter");
    let spawned = &json["events"][0];
    assert_eq!(spawned["type"], "enemySpawned");
    assert_eq!(spawned["name"], "Worg");
    assert_eq!(spawned["hp"], 26);
    assert_eq!(spawned["ac"], 13);
    assert_eq!(spawned["damage"], "2d6+3");

    let (_, state) =
        common::get_json(app.clone(), &format!("/api/v1/sessions/{session_id}")).await;
    assert_eq!(state["state"]["combat"]["inCombat"], true);

    // Act: every roll is 1, so the attack misses
    let (status, json) = common::play(&app, &session_id, "I attack the worg", true).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["action"], "perform_attack");
    assert_eq!(json["diceRoll"]["expression"], "1d20");
    assert_eq!(json["diceRoll"]["result"], 1);
}

#[tokio::test]
async fn test_quest_dialogue_through_turns() {
    let app = common::build_test_app();
    let session_id = common::start_session(&app).await;

    let (_, offered) = common::play(&app, &session_id, "Any work for me?", false).await;
    assert_eq!(offered["action"], "ask_about_quest");
    assert_eq!(offered["events"][0]["type"], "questUpdated");
    assert_eq!(offered["events"][0]["status"], "proposed");

    let (_, accepted) = common::play(&app, &session_id, "I accept the quest", false).await;
    assert_eq!(accepted["events"][0]["status"], "accepted");

    let (_, completed) = common::play(&app, &session_id, "Quest complete!", false).await;
    assert_eq!(completed["action"], "quest_complete");
    assert_eq!(completed["characterDataDelta"]["level"], 2);
    assert_eq!(completed["characterDataDelta"]["gold"], 115);

    let (_, again) = common::play(&app, &session_id, "Quest complete!", false).await;
    assert_eq!(again["events"][0]["type"], "actionRejected");
    assert!(again.get("characterDataDelta").is_none());
}

#[tokio::test]
async fn test_legacy_tags_are_appended_when_enabled() {
    let app = common::build_test_app_with(
        MockRng,
        TurnConfig {
            auto_enemy_turn: false,
            legacy_tags: true,
            ..TurnConfig::default()
        },
    );
    let session_id = common::start_session(&app).await;

    let (_, json) = common::play(&app, &session_id, "goblin", false).await;

    let message = json["message"].as_str().unwrap();
    assert!(message.contains("[ENEMY:{"));
    assert!(message.contains(r#""name":"Goblin""#));
}

#[tokio::test]
async fn test_turn_for_unknown_session_returns_404() {
    let app = common::build_test_app();

    let (status, json) = common::play(&app, &Uuid::new_v4().to_string(), "hello", false).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "aggregate_not_found");
}

#[tokio::test]
async fn test_turn_without_user_message_returns_400() {
    let app = common::build_test_app();
    let session_id = common::start_session(&app).await;

    let (status, json) = common::post_json(
        app,
        &format!("/api/v1/sessions/{session_id}/turns"),
        &serde_json::json!({ "messages": [{ "role": "assistant", "content": "Hi." }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}
