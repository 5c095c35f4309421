//! Procedural scenario generator.
//!
//! A scenario is assembled from three fixed tables keyed by the character's
//! class, background and race. Each table contributes one uniformly drawn
//! entry, so the result depends only on the character and the RNG stream.
//! Draws happen in table order: class, then background, then race.

use questforge_core::rng::DeterministicRng;
use questforge_world_state::domain::model::Character;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fallback bucket for unknown classes.
pub const DEFAULT_CLASS: &str = "Fighter";
/// Fallback bucket for unknown backgrounds.
pub const DEFAULT_BACKGROUND: &str = "Folk Hero";
/// Fallback bucket for unknown races.
pub const DEFAULT_RACE: &str = "Human";

/// A procedurally assembled adventure opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub title: String,
    pub description: String,
    pub setting: String,
    pub initial_challenge: String,
    pub npcs: Vec<String>,
    pub locations: Vec<String>,
    pub hooks: Vec<String>,
}

/// Class table entry: what the adventure is about.
#[derive(Debug, Clone, Copy)]
pub struct Premise {
    pub title: &'static str,
    pub challenge: &'static str,
    pub hook: &'static str,
}

/// Background table entry: who brings the news.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub npc: &'static str,
    pub hook: &'static str,
}

/// Race table entry: where it starts.
#[derive(Debug, Clone, Copy)]
pub struct Homeland {
    pub setting: &'static str,
    pub locations: &'static [&'static str],
}

pub static PREMISES: &[(&str, &[Premise])] = &[
    (
        "Fighter",
        &[
            Premise {
                title: "The Broken Shield",
                challenge: "Raiders have overrun the border watchtower and its garrison is missing.",
                hook: "The captain of the watch is offering a purse to anyone who can hold a blade.",
            },
            Premise {
                title: "Steel and Ash",
                challenge: "A mercenary company has seized the mill road and taxes every cart that passes.",
                hook: "The farmers have pooled their coin to hire a champion.",
            },
        ],
    ),
    (
        "Wizard",
        &[
            Premise {
                title: "The Unbound Tome",
                challenge: "A spellbook has vanished from the archive and the wards around it are failing.",
                hook: "Strange lights have been seen in the ruined observatory.",
            },
            Premise {
                title: "Echoes of the Arcane",
                challenge: "Cantrips misfire across the valley as though magic itself is unravelling.",
                hook: "An old hedge mage claims to know where the disturbance began.",
            },
        ],
    ),
    (
        "Rogue",
        &[
            Premise {
                title: "The Gilded Lock",
                challenge: "A merchant prince's vault has been emptied and you are the first suspect.",
                hook: "The real thief left a calling card: a silver raven.",
            },
            Premise {
                title: "Shadows over the Market",
                challenge: "The thieves' guild has gone silent and its fences have disappeared.",
                hook: "Someone is buying up old debts in the guild's name.",
            },
        ],
    ),
    (
        "Cleric",
        &[
            Premise {
                title: "The Silent Bell",
                challenge: "The shrine bell has stopped ringing and the dead no longer rest easy.",
                hook: "A pilgrim arrived last night babbling of open graves.",
            },
            Premise {
                title: "A Plague of Doubt",
                challenge: "A wasting sickness spreads from the lower town and prayers go unanswered.",
                hook: "The healers whisper that the well water tastes of iron.",
            },
        ],
    ),
    (
        "Ranger",
        &[
            Premise {
                title: "Tracks in the Frost",
                challenge: "Something huge is hunting the deer herds to the edge of the forest.",
                hook: "A trapper's cabin was found torn open from the inside.",
            },
            Premise {
                title: "The Green Border",
                challenge: "Loggers are vanishing along the old forest road.",
                hook: "The last one came back speaking only of eyes in the dark.",
            },
        ],
    ),
    (
        "Paladin",
        &[Premise {
            title: "Oath of the Dawn",
            challenge: "A fallen knight has raised a banner of black iron over the hill fort.",
            hook: "The order you serve has called for a champion to answer the challenge.",
        }],
    ),
    (
        "Barbarian",
        &[Premise {
            title: "Blood of the Clans",
            challenge: "The clan moot has been broken by a murder no one will name.",
            hook: "The elders will not speak until the killer is found.",
        }],
    ),
    (
        "Bard",
        &[Premise {
            title: "The Lost Refrain",
            challenge: "A song that once sealed away an old evil has been forgotten.",
            hook: "The last verse is said to be carved in a barrow beyond the hills.",
        }],
    ),
];

pub static CONTACTS: &[(&str, &[Contact])] = &[
    (
        "Folk Hero",
        &[
            Contact {
                npc: "Elder Rowan",
                hook: "The villagers still remember what you did for them and need you again.",
            },
            Contact {
                npc: "Tamsin the Miller",
                hook: "A childhood friend begs for help with trouble the lord ignores.",
            },
        ],
    ),
    (
        "Noble",
        &[
            Contact {
                npc: "Lady Vessa",
                hook: "Your family's seal was found on a letter you never wrote.",
            },
            Contact {
                npc: "Steward Aldric",
                hook: "Your house owes a debt of honor that has come due.",
            },
        ],
    ),
    (
        "Criminal",
        &[Contact {
            npc: "One-Eyed Pell",
            hook: "An old partner needs a job done and knows too much to refuse.",
        }],
    ),
    (
        "Sage",
        &[Contact {
            npc: "Archivist Quill",
            hook: "A scholar has found a reference to your research in a forbidden text.",
        }],
    ),
    (
        "Soldier",
        &[Contact {
            npc: "Sergeant Brask",
            hook: "Your old company has been declared deserters and only you can clear them.",
        }],
    ),
    (
        "Acolyte",
        &[Contact {
            npc: "Sister Maren",
            hook: "Your temple has received an omen that points to you.",
        }],
    ),
];

pub static HOMELANDS: &[(&str, &[Homeland])] = &[
    (
        "Human",
        &[
            Homeland {
                setting: "the river town of Millbrook",
                locations: &["The Rusty Tankard", "Town Square", "Old Road"],
            },
            Homeland {
                setting: "the walled city of Highgate",
                locations: &["The Rusty Tankard", "Town Square", "Highgate Keep"],
            },
        ],
    ),
    (
        "Elf",
        &[Homeland {
            setting: "the twilight glades of Silverbough",
            locations: &["The Rusty Tankard", "Whispering Woods", "Old Road"],
        }],
    ),
    (
        "Dwarf",
        &[Homeland {
            setting: "the mountain hold of Karak Dun",
            locations: &["The Rusty Tankard", "Deepdelve Mine", "Old Road"],
        }],
    ),
    (
        "Halfling",
        &[Homeland {
            setting: "the rolling fields of Thistledown",
            locations: &["The Rusty Tankard", "Town Square", "Whispering Woods"],
        }],
    ),
    (
        "Half-Orc",
        &[Homeland {
            setting: "the frontier stockade of Grimwall",
            locations: &["The Rusty Tankard", "Old Road", "Ruined Watchtower"],
        }],
    ),
    (
        "Tiefling",
        &[Homeland {
            setting: "the lantern-lit port of Saltmere",
            locations: &["The Rusty Tankard", "Town Square", "Sunken Crypt"],
        }],
    ),
    (
        "Dragonborn",
        &[Homeland {
            setting: "the ember cliffs of Vhaldor",
            locations: &["The Rusty Tankard", "Old Road", "Ruined Watchtower"],
        }],
    ),
];

/// Builds a scenario for `character`.
///
/// Unknown classes, backgrounds and races use the [`DEFAULT_CLASS`],
/// [`DEFAULT_BACKGROUND`] and [`DEFAULT_RACE`] buckets.
pub fn generate(character: &Character, rng: &mut dyn DeterministicRng) -> Scenario {
    let premise = pick(bucket(PREMISES, &character.class), rng);
    let contact = pick(bucket(CONTACTS, &character.background), rng);
    let homeland = pick(bucket(HOMELANDS, &character.race), rng);
    debug!(title = premise.title, npc = contact.npc, "scenario generated");

    let description = format!(
        "{name} the {race} {class} arrives in {setting}. {challenge} {npc} sends word: {hook}",
        name = character.name,
        race = character.race,
        class = character.class,
        setting = homeland.setting,
        challenge = premise.challenge,
        npc = contact.npc,
        hook = contact.hook,
    );

    Scenario {
        title: premise.title.to_owned(),
        description,
        setting: homeland.setting.to_owned(),
        initial_challenge: premise.challenge.to_owned(),
        npcs: vec![contact.npc.to_owned()],
        locations: homeland.locations.iter().map(|&l| l.to_owned()).collect(),
        hooks: vec![premise.hook.to_owned(), contact.hook.to_owned()],
    }
}

/// The entries for `key`, else the table's first row, which holds the
/// fallback bucket.
fn bucket<'a, T>(table: &'a [(&str, &'a [T])], key: &str) -> &'a [T] {
    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key.trim()))
        .map_or(table[0].1, |(_, entries)| *entries)
}

fn pick<T: Copy>(entries: &[T], rng: &mut dyn DeterministicRng) -> T {
    let last = u32::try_from(entries.len() - 1).unwrap_or(0);
    let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
    entries[index.min(entries.len() - 1)]
}
