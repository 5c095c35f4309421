//! Route for the character-creation dialogue.

use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use questforge_session::application::character_creation::handle_create_character;
use questforge_session::domain::commands::CreateCharacter;
use questforge_session::domain::turn::{ChatMessage, TurnResponse};

use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateCharacterRequest {
    /// The conversation so far.
    pub messages: Vec<ChatMessage>,
}

/// POST /
#[instrument(skip_all)]
async fn create_character(Json(request): Json<CreateCharacterRequest>) -> Json<TurnResponse> {
    let command = CreateCharacter {
        correlation_id: Uuid::new_v4(),
        messages: request.messages,
    };

    info!(correlation_id = %command.correlation_id, "handling create_character command");

    Json(handle_create_character(&command))
}

/// Returns the router for character creation.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_character))
}
