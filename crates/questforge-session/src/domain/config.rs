//! Turn-processing switches.

use std::time::Duration;

use questforge_narrative::application::narration::DEFAULT_NARRATOR_TIMEOUT;

/// Behavior switches for turn processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnConfig {
    /// Run the enemy's turn right after each player combat action.
    pub auto_enemy_turn: bool,
    /// Append `[ENEMY:{json}]` and `[DICE:NdM]` tags to the message.
    pub legacy_tags: bool,
    /// Bound on one narrator call.
    pub narrator_timeout: Duration,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            auto_enemy_turn: true,
            legacy_tags: false,
            narrator_timeout: DEFAULT_NARRATOR_TIMEOUT,
        }
    }
}
