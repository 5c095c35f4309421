//! Commands for the Rules & Resolution context.

use questforge_core::command::Command;
use uuid::Uuid;

/// Command to roll a free-standing dice expression such as `2d6+3`.
#[derive(Debug, Clone)]
pub struct RollDice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Dice notation `NdM[+/-K]`.
    pub expression: String,
}

impl Command for RollDice {
    fn command_type(&self) -> &'static str {
        "rules.roll_dice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
