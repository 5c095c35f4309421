//! Location atlas: the fixed map travel resolves against.

use std::collections::BTreeSet;

use questforge_core::rng::DeterministicRng;
use questforge_world_state::domain::model::{Location, LocationKind};

/// A place on the map.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: LocationKind,
    pub npcs: &'static [&'static str],
    pub exits: &'static [&'static str],
}

impl Place {
    /// The place as a model [`Location`].
    #[must_use]
    pub fn to_location(&self) -> Location {
        Location {
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            kind: self.kind,
            npcs: self.npcs.iter().map(|&n| n.to_owned()).collect(),
            exits: self.exits.iter().map(|&e| e.to_owned()).collect(),
        }
    }
}

pub static PLACES: &[Place] = &[
    Place {
        name: "The Rusty Tankard",
        description: "A smoky tavern where travelers trade rumors over cheap ale.",
        kind: LocationKind::Tavern,
        npcs: &["Barkeep Odo", "Old Mira"],
        exits: &["Town Square", "Old Road"],
    },
    Place {
        name: "Town Square",
        description: "Market stalls crowd around a moss-covered fountain; a notice board leans by the well.",
        kind: LocationKind::Town,
        npcs: &["Captain Hale", "Healer Brenna", "Merchant Tobiah"],
        exits: &["The Rusty Tankard", "Highgate Keep", "Old Road"],
    },
    Place {
        name: "Old Road",
        description: "A rutted cart track winding between hedgerows toward the hills.",
        kind: LocationKind::Road,
        npcs: &[],
        exits: &["The Rusty Tankard", "Whispering Woods", "Ruined Watchtower"],
    },
    Place {
        name: "Whispering Woods",
        description: "Ancient oaks crowd close, and the wind carries voices that are not quite there.",
        kind: LocationKind::Wilderness,
        npcs: &[],
        exits: &["Old Road", "Deepdelve Mine"],
    },
    Place {
        name: "Ruined Watchtower",
        description: "A broken tower of black stone, its stair spiralling into shadow.",
        kind: LocationKind::Dungeon,
        npcs: &[],
        exits: &["Old Road", "Sunken Crypt"],
    },
    Place {
        name: "Deepdelve Mine",
        description: "Abandoned shafts drip with cold water and echo with distant hammering.",
        kind: LocationKind::Dungeon,
        npcs: &[],
        exits: &["Whispering Woods"],
    },
    Place {
        name: "Sunken Crypt",
        description: "Flooded tombs where candles burn that no living hand has lit.",
        kind: LocationKind::Dungeon,
        npcs: &[],
        exits: &["Ruined Watchtower"],
    },
    Place {
        name: "Highgate Keep",
        description: "A grey fortress whose banners snap above a gate of iron-bound oak.",
        kind: LocationKind::Castle,
        npcs: &["Steward Aldric"],
        exits: &["Town Square"],
    },
];

/// Looks up a place by name (case-insensitive).
#[must_use]
pub fn place(name: &str) -> Option<&'static Place> {
    PLACES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Resolves where a travel request leads from `current`.
///
/// An exit named in `utterance` wins; otherwise one exit is drawn uniformly.
/// Exits missing from the atlas become a plain road. Returns `None` when
/// `current` has no exits.
pub fn destination(
    current: &Location,
    utterance: &str,
    rng: &mut dyn DeterministicRng,
) -> Option<Location> {
    let exits: Vec<&String> = current.exits.iter().collect();
    let spoken = utterance.to_lowercase();
    let named = exits
        .iter()
        .find(|exit| spoken.contains(&exit.to_lowercase()) || mentions_core_word(&spoken, exit));
    let chosen = match named {
        Some(exit) => *exit,
        None => {
            let last = u32::try_from(exits.len().checked_sub(1)?).unwrap_or(0);
            let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
            *exits.get(index)?
        }
    };
    Some(place(chosen).map_or_else(
        || Location {
            name: chosen.clone(),
            description: format!("The way to {chosen} stretches out before you."),
            kind: LocationKind::Road,
            npcs: BTreeSet::new(),
            exits: [current.name.clone()].into(),
        },
        Place::to_location,
    ))
}

/// True if the last word of an exit name ("woods", "square") was spoken.
fn mentions_core_word(spoken: &str, exit: &str) -> bool {
    exit.split_whitespace()
        .last()
        .map(str::to_lowercase)
        .is_some_and(|core| spoken.split(|c: char| !c.is_alphanumeric()).any(|w| w == core))
}

#[cfg(test)]
mod tests {
    use questforge_test_support::{MockRng, SequenceRng};

    use super::*;

    #[test]
    fn test_every_exit_is_in_the_atlas() {
        for p in PLACES {
            for exit in p.exits {
                assert!(place(exit).is_some(), "{} has unknown exit {exit}", p.name);
            }
        }
    }

    #[test]
    fn test_named_exit_wins_without_drawing() {
        let mut rng = SequenceRng::new(vec![]);

        let to = destination(&Location::default(), "I walk to the town square", &mut rng).unwrap();

        assert_eq!(to.name, "Town Square");
        assert_eq!(to.kind, LocationKind::Town);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_core_word_of_exit_is_enough() {
        let to = destination(&Location::default(), "head for the road", &mut MockRng).unwrap();

        assert_eq!(to.name, "Old Road");
    }

    #[test]
    fn test_unnamed_travel_draws_an_exit() {
        let mut rng = SequenceRng::new(vec![1]);

        let to = destination(&Location::default(), "I leave", &mut rng).unwrap();

        assert_eq!(to.name, "Town Square");
    }

    #[test]
    fn test_dead_end_has_no_destination() {
        let mut here = Location::default();
        here.exits.clear();

        assert!(destination(&here, "go north", &mut MockRng).is_none());
    }
}
