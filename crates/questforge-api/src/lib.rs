//! Questforge — HTTP API library.
//!
//! Exposes the router, application state, configuration and error mapping
//! so that the binary and the integration tests build the same app.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full route tree over `state`, without middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/sessions", routes::sessions::router())
        .nest("/api/v1/character-creation", routes::character_creation::router())
        .nest("/api/v1/rules", routes::rules::router())
        .with_state(state)
}
