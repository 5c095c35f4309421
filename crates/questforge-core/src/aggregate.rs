//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that record their transitions as events.
///
/// Transitions apply their event immediately and queue it as uncommitted;
/// `apply` is only called while reconstituting from stored history.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the persisted version (number of committed events).
    fn version(&self) -> i64;

    /// Apply a stored event while reconstituting the aggregate.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events recorded since the last commit.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Marks every uncommitted event as persisted, advancing the version.
    fn mark_committed(&mut self);
}
