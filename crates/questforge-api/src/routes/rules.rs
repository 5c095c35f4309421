//! Routes for the Rules & Resolution bounded context.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use questforge_rules::application::command_handlers::handle_roll_dice;
use questforge_rules::domain::commands::RollDice;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /roll.
#[derive(Debug, Deserialize)]
pub struct RollRequest {
    /// Dice notation such as `2d6+3`.
    pub expression: String,
}

/// Response body for POST /roll.
#[derive(Debug, Serialize)]
pub struct RollResponse {
    /// Normalized notation of what was rolled.
    pub expression: String,
    pub rolls: Vec<u32>,
    pub modifier: i32,
    pub total: i32,
}

/// POST /roll
#[instrument(skip(state, request), fields(expression = %request.expression))]
async fn roll(
    State(state): State<AppState>,
    Json(request): Json<RollRequest>,
) -> Result<Json<RollResponse>, ApiError> {
    let command = RollDice {
        correlation_id: Uuid::new_v4(),
        expression: request.expression,
    };

    info!(correlation_id = %command.correlation_id, "handling roll_dice command");

    let outcome = handle_roll_dice(&command, &state.rng)?;

    Ok(Json(RollResponse {
        expression: outcome.expression.to_string(),
        rolls: outcome.rolls,
        modifier: outcome.modifier,
        total: outcome.total,
    }))
}

/// Returns the router for the rules context.
pub fn router() -> Router<AppState> {
    Router::new().route("/roll", post(roll))
}
