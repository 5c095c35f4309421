//! Command handlers for the Rules & Resolution context.

use std::sync::Mutex;

use questforge_core::command::Command;
use questforge_core::error::DomainError;
use questforge_core::rng::DeterministicRng;
use tracing::info;

use crate::domain::commands::RollDice;
use crate::domain::dice::{DiceExpression, DiceOutcome};

/// Handles the `RollDice` command.
///
/// The expression is parsed before the `Mutex` is taken, and the lock is
/// held only for the roll itself.
///
/// # Errors
///
/// Returns `DomainError::Parse` for malformed notation, or
/// `DomainError::Infrastructure` if the RNG mutex is poisoned.
pub fn handle_roll_dice(
    command: &RollDice,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<DiceOutcome, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        expression = %command.expression,
        "handling {}", command.command_type()
    );
    let expression = DiceExpression::parse(&command.expression)?;

    let mut rng_guard = rng
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    expression.roll(&mut *rng_guard)
}
