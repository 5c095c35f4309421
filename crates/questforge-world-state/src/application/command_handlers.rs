//! Command handlers for the World State context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.
//! [`load_game_state`] and [`persist`] are shared with the session context.

use questforge_core::aggregate::AggregateRoot;
use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use questforge_core::event::EventMetadata;
use questforge_core::repository::{EventRepository, StoredEvent};
use tracing::debug;
use uuid::Uuid;

use crate::domain::aggregates::GameState;
use crate::domain::commands::{ProposeQuest, QuestDecision, ResolveQuest};
use crate::domain::events::{GameEvent, GameEventKind};
use crate::domain::model::{Quest, QuestStatus};

/// Reconstitutes a `GameState` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if an event payload cannot be
/// deserialized.
pub fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<GameState, DomainError> {
    let mut state = GameState::new(session_id);
    for stored in existing_events {
        let kind: GameEventKind = serde_json::from_value(stored.payload.clone()).map_err(|e| {
            DomainError::Infrastructure(format!("event deserialization failed: {e}"))
        })?;
        let event = GameEvent {
            metadata: EventMetadata {
                event_id: stored.event_id,
                event_type: stored.event_type.clone(),
                aggregate_id: stored.aggregate_id,
                sequence_number: stored.sequence_number,
                correlation_id: stored.correlation_id,
                causation_id: stored.causation_id,
                occurred_at: stored.occurred_at,
            },
            kind,
        };
        state.apply(&event);
    }
    Ok(state)
}

/// Loads and reconstitutes a started session.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the session has no events,
/// or any error from the repository or deserialization.
pub async fn load_game_state(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameState, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let state = reconstitute(session_id, &stored_events)?;
    if !state.is_started() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    Ok(state)
}

/// Appends the aggregate's uncommitted events and marks them committed.
///
/// Nothing is written when no events were recorded.
///
/// # Errors
///
/// Returns `DomainError::ConcurrencyConflict` if the stream moved on since
/// the aggregate was loaded, or any other repository error.
pub async fn persist(
    state: &mut GameState,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = state
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_event)
        .collect();
    if stored_events.is_empty() {
        return Ok(stored_events);
    }

    repo.append_events(state.id, state.version(), &stored_events)
        .await?;
    debug!(session_id = %state.id, count = stored_events.len(), "persisted game events");
    state.mark_committed();

    Ok(stored_events)
}

/// Handles the `ProposeQuest` command. Returns the new quest id and the
/// persisted events.
///
/// # Errors
///
/// Returns `DomainError::Validation` for an empty title, or any error from
/// loading or persisting the session.
pub async fn handle_propose_quest(
    command: &ProposeQuest,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<(Uuid, Vec<StoredEvent>), DomainError> {
    let mut state = load_game_state(command.session_id, repo).await?;

    let quest = Quest {
        id: Uuid::new_v4(),
        title: command.title.clone(),
        description: command.description.clone(),
        quest_giver: command.quest_giver.clone(),
        xp_reward: command.xp_reward,
        gold_reward: command.gold_reward,
        status: QuestStatus::Active,
        created_at: clock.now(),
        completed_at: None,
        objectives: command.objectives.clone(),
        quest_type: command.quest_type,
    };
    let quest_id = state.propose_quest(quest, command.correlation_id, clock)?;

    let stored_events = persist(&mut state, repo).await?;
    Ok((quest_id, stored_events))
}

/// Handles the `ResolveQuest` command: accept, decline, complete or fail.
///
/// # Errors
///
/// Returns `DomainError::QuestState` if the quest is in the wrong state for
/// the decision, or any error from loading or persisting the session.
pub async fn handle_resolve_quest(
    command: &ResolveQuest,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let mut state = load_game_state(command.session_id, repo).await?;
    let (quest_id, correlation_id) = (command.quest_id, command.correlation_id);

    match command.decision {
        QuestDecision::Accept => {
            state.accept_quest(quest_id, correlation_id, clock)?;
        }
        QuestDecision::Decline => state.decline_quest(quest_id, correlation_id, clock)?,
        QuestDecision::Complete => {
            state.complete_quest(quest_id, correlation_id, clock)?;
        }
        QuestDecision::Fail => {
            state.fail_quest(quest_id, correlation_id, clock)?;
        }
    }

    persist(&mut state, repo).await
}
