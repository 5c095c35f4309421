//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Nothing here is fatal to the process: turn processing converts the
/// player-facing variants into a narrative response so the session continues.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate (game session) was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed dice expression or malformed structured narrator output.
    #[error("parse error: {0}")]
    Parse(String),

    /// Completing or failing a quest that is not active, or accepting one
    /// that is not awaiting a decision.
    #[error("quest state error: {0}")]
    QuestState(String),

    /// A combat action requested in an incompatible phase.
    #[error("invalid combat action: {0}")]
    InvalidCombatAction(String),

    /// The external narration service did not answer in time.
    #[error("external service timed out after {0} ms")]
    ExternalServiceTimeout(u64),

    /// The external narration service answered with an error.
    #[error("external service failure: {0}")]
    ExternalServiceFailure(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` for errors caused by the player's request that a turn
    /// reports back as narrative instead of failing.
    #[must_use]
    pub fn is_player_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::QuestState(_) | Self::InvalidCombatAction(_)
        )
    }
}
