//! Routes for adventure sessions: start, turn processing and state reads.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use questforge_session::application::command_handlers::{
    SessionStartedView, handle_process_turn, handle_start_session,
};
use questforge_session::domain::commands::{ProcessTurn, StartSession};
use questforge_session::domain::turn::{TurnRequest, TurnResponse};
use questforge_world_state::application::query_handlers::{GameStateView, get_game_state};
use questforge_world_state::domain::model::Character;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// The finished character; the default adventurer when absent.
    #[serde(default)]
    pub character: Option<Character>,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    #[serde(flatten)]
    pub session: SessionStartedView,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// POST /
#[instrument(skip(state, request))]
async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, ApiError> {
    let command = StartSession {
        correlation_id: Uuid::new_v4(),
        character: request.character,
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let (session, stored_events) = handle_start_session(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.event_repository,
    )
    .await?;

    let event_ids = stored_events.iter().map(|e| e.event_id).collect();

    Ok(Json(StartSessionResponse { session, event_ids }))
}

/// POST /{session_id}/turns
#[instrument(skip(state, request), fields(session_id = %session_id))]
async fn process_turn(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let command = ProcessTurn {
        correlation_id: Uuid::new_v4(),
        session_id,
        request,
    };

    info!(correlation_id = %command.correlation_id, "handling process_turn command");

    let response = handle_process_turn(
        &command,
        state.clock.as_ref(),
        &state.rng,
        &*state.event_repository,
        state.narrator.as_deref(),
        &state.locks,
        &state.turn_config,
    )
    .await?;

    Ok(Json(response))
}

/// GET /{session_id}
#[instrument(skip(state), fields(session_id = %session_id))]
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<GameStateView>, ApiError> {
    let view = get_game_state(session_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// Returns the router for sessions, quest routes included.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_session))
        .route("/{session_id}", get(get_session))
        .route("/{session_id}/turns", post(process_turn))
        .merge(super::quests::router())
}
