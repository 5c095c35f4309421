//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every command a handler accepts.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable command name, used in logs and spans.
    fn command_type(&self) -> &'static str;

    /// Correlation ID shared by every event the command produces.
    fn correlation_id(&self) -> Uuid;
}
