//! Character-creation dialogue.
//!
//! Stateless: every request carries the whole conversation, and the details
//! are re-extracted from the player's lines each time.

use questforge_core::command::Command;
use questforge_rules::domain::creation::CharacterSketch;
use questforge_world_state::domain::model::Character;
use tracing::{debug, info};

use crate::domain::commands::CreateCharacter;
use crate::domain::turn::{CharacterDelta, Role, TurnResponse};

/// Action label reported by creation responses.
pub const CHARACTER_CREATION_ACTION: &str = "character_creation";

/// Merges the details found in every user message, earliest first.
#[must_use]
pub fn sketch_from_messages(command: &CreateCharacter) -> CharacterSketch {
    command
        .messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| CharacterSketch::from_text(&m.content))
        .fold(CharacterSketch::default(), CharacterSketch::merge)
}

/// Builds a full character from a complete sketch.
#[must_use]
pub fn character_from_sketch(sketch: &CharacterSketch) -> Option<Character> {
    Some(Character {
        name: sketch.name.clone()?,
        race: sketch.race.clone()?,
        class: sketch.class.clone()?,
        appearance: sketch.appearance_or_default().to_owned(),
        backstory: sketch.backstory_or_default().to_owned(),
        ..Character::default()
    })
}

/// Handles one step of the creation dialogue.
///
/// The delta carries every detail found so far; `isComplete` turns true once
/// name, race and class are known.
#[must_use]
pub fn handle_create_character(command: &CreateCharacter) -> TurnResponse {
    let sketch = sketch_from_messages(command);
    let complete = sketch.is_complete();
    info!(
        correlation_id = %command.correlation_id(),
        complete,
        "handling {}", command.command_type()
    );

    let delta = CharacterDelta {
        name: sketch.name.clone(),
        race: sketch.race.clone(),
        class: sketch.class.clone(),
        appearance: sketch.appearance.clone(),
        backstory: sketch.backstory.clone(),
        ..CharacterDelta::default()
    };

    let message = if complete {
        format!(
            "Welcome, {} the {} {}! {} Your story begins now.",
            sketch.name.as_deref().unwrap_or_default(),
            sketch.race.as_deref().unwrap_or_default(),
            sketch.class.as_deref().unwrap_or_default(),
            sketch.backstory_or_default(),
        )
    } else {
        let missing: Vec<&str> = [
            (sketch.name.is_none(), "name"),
            (sketch.race.is_none(), "race"),
            (sketch.class.is_none(), "class"),
        ]
        .into_iter()
        .filter_map(|(absent, field)| absent.then_some(field))
        .collect();
        debug!(?missing, "character sketch incomplete");
        format!(
            "Tell me more about your hero. I still need their {}.",
            missing.join(" and ")
        )
    };

    TurnResponse {
        message,
        character_data_delta: (delta != CharacterDelta::default()).then_some(delta),
        dice_roll: None,
        is_complete: Some(complete),
        action: CHARACTER_CREATION_ACTION.to_owned(),
        events: Vec::new(),
    }
}
