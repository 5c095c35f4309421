//! Command handlers for the Session context.
//!
//! Session start and turn processing: load the session, resolve the action,
//! persist what it recorded, then let the narrator embellish the text.

use std::sync::Mutex;

use questforge_core::clock::Clock;
use questforge_core::command::Command;
use questforge_core::error::DomainError;
use questforge_core::narrator::{NarrationRequest, Narrator};
use questforge_core::repository::{EventRepository, StoredEvent};
use questforge_core::rng::DeterministicRng;
use questforge_narrative::application::narration::narrate_with_fallback;
use questforge_narrative::domain::scenario::{self, Scenario};
use questforge_narrative::domain::templates::generate_opening_message;
use questforge_rules::domain::intent::{Mode, classify};
use questforge_world_state::application::command_handlers::{load_game_state, persist};
use questforge_world_state::domain::aggregates::GameState;
use questforge_world_state::domain::model::{GameData, LoreEntry, SessionInfo};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::dispatch::{self, Resolution};
use super::locks::SessionLocks;
use crate::domain::commands::{ProcessTurn, StartSession};
use crate::domain::config::TurnConfig;
use crate::domain::tags::append_legacy_tags;
use crate::domain::turn::{CharacterDelta, TurnResponse};

/// Number of trailing conversation lines handed to the narrator.
const NARRATOR_CONTEXT_MESSAGES: usize = 6;

/// Result of starting a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStartedView {
    pub session_id: Uuid,
    pub scenario: Scenario,
    pub opening_message: String,
    pub state: GameData,
}

fn lock_rng(
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<std::sync::MutexGuard<'_, dyn DeterministicRng + Send + 'static>, DomainError> {
    rng.lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))
}

/// Handles the `StartSession` command: generates a scenario for the
/// character, starts the session and persists its first events.
///
/// The `Mutex` is locked only around the synchronous scenario draw.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a character without a name or with
/// level 0, or any error from appending the events.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_start_session(
    command: &StartSession,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn EventRepository,
) -> Result<(SessionStartedView, Vec<StoredEvent>), DomainError> {
    info!("handling {}", command.command_type());

    let character = command.character.clone().unwrap_or_default();
    if character.name.trim().is_empty() {
        return Err(DomainError::Validation("character name must not be empty".into()));
    }
    if character.level == 0 {
        return Err(DomainError::Validation("character level must be at least 1".into()));
    }

    let scenario = {
        let mut rng_guard = lock_rng(rng)?;
        scenario::generate(&character, &mut *rng_guard)
    };

    let session_id = Uuid::new_v4();
    let data = GameData::new(
        character,
        SessionInfo {
            id: session_id,
            started_at: clock.now(),
            scenario_title: scenario.title.clone(),
        },
    );
    let mut state = GameState::start(session_id, data, command.correlation_id, clock);
    state.record_lore(
        LoreEntry {
            title: scenario.title.clone(),
            text: scenario.description.clone(),
        },
        command.correlation_id,
        clock,
    )?;

    let stored_events = persist(&mut state, repo).await?;
    let data = state.data()?.clone();
    let opening_message = generate_opening_message(&data.character, &scenario);
    info!(%session_id, scenario = %scenario.title, "session started");

    Ok((
        SessionStartedView {
            session_id,
            scenario,
            opening_message,
            state: data,
        },
        stored_events,
    ))
}

/// Handles the `ProcessTurn` command.
///
/// The session lock is held from load to persist. A refused action
/// (`Validation`, `QuestState`, `InvalidCombatAction`) restores the state to
/// its pre-action checkpoint and answers with an `actionRejected` event.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the request holds no user message,
/// `DomainError::AggregateNotFound` for an unknown session, or any error
/// from syncing the character sheet or persisting.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, session_id = %command.session_id)
)]
pub async fn handle_process_turn(
    command: &ProcessTurn,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn EventRepository,
    narrator: Option<&dyn Narrator>,
    locks: &SessionLocks,
    config: &TurnConfig,
) -> Result<TurnResponse, DomainError> {
    info!("handling {}", command.command_type());

    let utterance = command
        .request
        .utterance()
        .ok_or_else(|| DomainError::Validation("turn requires a user message".into()))?;

    let session_guard = locks.acquire(command.session_id).await;
    let mut state = load_game_state(command.session_id, repo).await?;

    if let Some(character) = &command.request.character_state {
        let synced = state.sync_character(character.clone(), command.correlation_id, clock)?;
        if synced {
            debug!("character sheet synced from client");
        }
    }

    let in_combat = state.data()?.combat.in_combat;
    if command.request.is_in_combat != in_combat {
        warn!(
            client = command.request.is_in_combat,
            stored = in_combat,
            "client combat flag disagrees with stored state; using stored state"
        );
    }
    let action = classify(utterance, Mode::from_in_combat(in_combat));
    debug!(action = action.label(), "classified utterance");

    let checkpoint = state.clone();
    let before = state.data()?.character.clone();
    let outcome = {
        let mut rng_guard = lock_rng(rng)?;
        dispatch::resolve(
            &mut state,
            &action,
            utterance,
            &mut *rng_guard,
            command.correlation_id,
            clock,
            config,
        )
    };
    let resolution = match outcome {
        Ok(resolution) => resolution,
        Err(e) if e.is_player_facing() => {
            info!(action = action.label(), reason = %e, "action rejected");
            state = checkpoint;
            Resolution::rejected(&rejection_reason(&e))
        }
        Err(e) => return Err(e),
    };

    let stored_events = persist(&mut state, repo).await?;
    drop(session_guard);
    debug!(count = stored_events.len(), "turn persisted");

    let data = state.data()?;
    let request = NarrationRequest {
        action: action.label().to_owned(),
        base_narrative: resolution.narrative.clone(),
        character_name: data.character.name.clone(),
        location: data.location.name.clone(),
        recent_messages: recent_messages(command),
    };
    let mut message = narrate_with_fallback(narrator, &request, config.narrator_timeout).await;
    if config.legacy_tags {
        append_legacy_tags(&mut message, &resolution.events);
    }

    Ok(TurnResponse {
        message,
        character_data_delta: CharacterDelta::between(&before, &data.character),
        dice_roll: TurnResponse::headline_roll(&resolution.events),
        is_complete: None,
        action: action.label().to_owned(),
        events: resolution.events,
    })
}

fn rejection_reason(error: &DomainError) -> String {
    match error {
        DomainError::Validation(reason)
        | DomainError::QuestState(reason)
        | DomainError::InvalidCombatAction(reason) => reason.clone(),
        other => other.to_string(),
    }
}

fn recent_messages(command: &ProcessTurn) -> Vec<String> {
    let messages = &command.request.messages;
    messages[messages.len().saturating_sub(NARRATOR_CONTEXT_MESSAGES)..]
        .iter()
        .map(|m| m.content.clone())
        .collect()
}
