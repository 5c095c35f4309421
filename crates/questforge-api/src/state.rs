//! Shared application state.

use std::sync::{Arc, Mutex};

use questforge_core::clock::Clock;
use questforge_core::narrator::Narrator;
use questforge_core::repository::EventRepository;
use questforge_core::rng::DeterministicRng;
use questforge_session::application::locks::SessionLocks;
use questforge_session::domain::config::TurnConfig;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock used for event timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// The shared random source; locked only around synchronous domain calls.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Event persistence.
    pub event_repository: Arc<dyn EventRepository>,
    /// Optional generative narrator.
    pub narrator: Option<Arc<dyn Narrator>>,
    /// Per-session turn serialization.
    pub locks: SessionLocks,
    /// Turn-processing switches.
    pub turn_config: TurnConfig,
}

impl AppState {
    /// Create new application state with no narrator and default turn settings.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            clock,
            rng,
            event_repository,
            narrator: None,
            locks: SessionLocks::new(),
            turn_config: TurnConfig::default(),
        }
    }

    /// Installs a narrator.
    #[must_use]
    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    /// Replaces the turn-processing switches.
    #[must_use]
    pub fn with_turn_config(mut self, turn_config: TurnConfig) -> Self {
        self.turn_config = turn_config;
        self
    }
}
