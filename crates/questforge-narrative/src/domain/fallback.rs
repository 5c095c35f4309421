//! Rule-based narration.
//!
//! Every turn carries one of these texts whether or not a generative
//! narrator is configured.

use questforge_core::rng::DeterministicRng;
use questforge_world_state::domain::model::Location;

/// Opening line of every look-around.
pub const EXPLORATION_DESCRIPTION: &str =
    "You take a moment to survey your surroundings, noting every shadow and doorway.";

/// Reply to a help request.
pub const HELP_TEXT: &str = "You can look around, move to a nearby place, talk to people, \
ask about quests and accept or decline them, or go looking for trouble. In combat you can \
attack, cast a spell, dodge, hide, sneak attack, use an item, or let the enemy act. Try a \
skill check such as \"I climb the wall\" or \"I listen at the door\".";

/// Reply when nothing in the utterance was understood.
pub const UNKNOWN_TEXT: &str =
    "The world waits for you to act. (Not sure what to do? Ask for help.)";

static RUMORS: &[&str] = &[
    "Folk say the old watchtower is lit at night, though no one has kept it in years.",
    "Wolves have been bolder on the Old Road since the last full moon.",
    "A stranger paid in ancient coin last week and asked about the crypt.",
    "The miners swear they hear hammering from the sealed shafts.",
];

/// Describes `location` for a look-around.
#[must_use]
pub fn look(location: &Location) -> String {
    let mut text = format!(
        "{EXPLORATION_DESCRIPTION} {}: {}",
        location.name, location.description
    );
    if !location.npcs.is_empty() {
        text.push_str(&format!(" You see {}.", join(location.npcs.iter())));
    }
    if !location.exits.is_empty() {
        text.push_str(&format!(" Paths lead to {}.", join(location.exits.iter())));
    }
    text
}

/// Arrival text after moving to `location`.
#[must_use]
pub fn arrive(location: &Location) -> String {
    format!(
        "You make your way to {}. {}",
        location.name, location.description
    )
}

/// A rumor from someone at `location`, or an empty room.
pub fn talk(location: &Location, rng: &mut dyn DeterministicRng) -> String {
    let Some(npc) = location.npcs.iter().next() else {
        return "There is no one here to talk to but the wind.".to_owned();
    };
    let last = u32::try_from(RUMORS.len() - 1).unwrap_or(0);
    let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
    let rumor = RUMORS.get(index).copied().unwrap_or(RUMORS[0]);
    format!("{npc} lowers their voice: \"{rumor}\"")
}

/// Outcome text of a skill check.
#[must_use]
pub fn skill_check(skill: &str, roll: i32, bonus: i32, dc: i32) -> String {
    let total = roll + bonus;
    let verdict = if total >= dc { "Success!" } else { "Failure." };
    format!("{skill} check: {roll} {bonus:+} = {total} against DC {dc}. {verdict}")
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let items: Vec<&str> = items.map(String::as_str).collect();
    match items.as_slice() {
        [] => String::new(),
        [one] => (*one).to_owned(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use questforge_test_support::SequenceRng;

    use super::*;

    #[test]
    fn test_look_contains_fixed_exploration_description() {
        let text = look(&Location::default());

        assert!(text.starts_with(EXPLORATION_DESCRIPTION));
        assert!(text.contains("Barkeep Odo and Old Mira"));
        assert!(text.contains("Old Road and Town Square"));
    }

    #[test]
    fn test_talk_in_empty_place() {
        let mut here = Location::default();
        here.npcs.clear();
        let mut rng = SequenceRng::new(vec![]);

        let text = talk(&here, &mut rng);

        assert!(text.contains("no one here"));
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_talk_passes_on_a_rumor() {
        let text = talk(&Location::default(), &mut SequenceRng::new(vec![1]));

        assert!(text.starts_with("Barkeep Odo"));
        assert!(text.contains("Wolves have been bolder"));
    }

    #[test]
    fn test_skill_check_reports_sum_and_verdict() {
        assert_eq!(
            skill_check("Athletics", 10, 2, 12),
            "Athletics check: 10 +2 = 12 against DC 12. Success!"
        );
        assert!(skill_check("Stealth", 5, -1, 12).ends_with("Failure."));
    }
}
