//! Pure text templates layered on a [`Scenario`].

use questforge_world_state::domain::model::Character;

use super::scenario::Scenario;

/// Formats the first message of a session.
#[must_use]
pub fn generate_opening_message(character: &Character, scenario: &Scenario) -> String {
    let mut message = format!("**{}**\n\n{}\n\n", scenario.title, scenario.description);
    if let Some(first) = scenario.locations.first() {
        message.push_str(&format!(
            "You stand in {first}, {} gold in your purse and your {} at your side.",
            character.gold,
            if character.spells.is_empty() { "gear" } else { "spellbook" },
        ));
    }
    if !scenario.hooks.is_empty() {
        message.push_str("\n\nRumors you have heard:\n");
        for hook in &scenario.hooks {
            message.push_str(&format!("- {hook}\n"));
        }
    }
    message.push_str("\nWhat do you do?");
    message
}

/// Formats the announcement of an unprovoked encounter.
#[must_use]
pub fn generate_random_encounter(location: &str, enemy_name: &str, enemy_description: &str) -> String {
    format!(
        "As you make your way through {location}, a {enemy_name} blocks your path! \
         {enemy_description} Roll for initiative!"
    )
}
