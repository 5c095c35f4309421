//! Questforge API server entry point.

use std::sync::{Arc, Mutex};

use questforge_api::config::AppConfig;
use questforge_api::error::AppError;
use questforge_api::state::AppState;
use questforge_core::clock::SystemClock;
use questforge_core::rng::{DeterministicRng, SeededRng};
use questforge_event_store::in_memory_event_repository::InMemoryEventRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Questforge API server");

    let config = AppConfig::from_env()?;

    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = match config.rng_seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded RNG");
            Arc::new(Mutex::new(SeededRng::from_seed(seed)))
        }
        None => Arc::new(Mutex::new(SeededRng::from_os())),
    };
    let app_state = AppState::new(
        Arc::new(SystemClock),
        rng,
        Arc::new(InMemoryEventRepository::new()),
    )
    .with_turn_config(config.turn_config());

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = questforge_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
