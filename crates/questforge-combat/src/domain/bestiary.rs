//! Enemy templates.

use questforge_core::rng::DeterministicRng;
use questforge_world_state::domain::model::Combatant;
use serde::Serialize;

/// Stat block for a spawnable enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub hp: u32,
    pub ac: u32,
    /// Damage notation shown to the player.
    pub damage: &'static str,
    pub description: &'static str,
    pub xp: u32,
}

impl EnemyTemplate {
    /// The template as a fresh, unhurt combatant.
    #[must_use]
    pub fn to_combatant(&self) -> Combatant {
        Combatant {
            name: self.name.to_owned(),
            initiative: 0,
            hp: self.hp,
            max_hp: self.hp,
            ac: self.ac,
            xp_value: self.xp,
            is_player: false,
        }
    }
}

/// Enemies summoned by name, keyed by the intent classifier's hint.
pub static NAMED_ENEMIES: &[(&str, EnemyTemplate)] = &[
    (
        "worg",
        EnemyTemplate {
            name: "Worg",
            hp: 26,
            ac: 13,
            damage: "2d6+3",
            description: "A massive wolf with malevolent intelligence burning in its eyes.",
            xp: 100,
        },
    ),
    (
        "dragon",
        EnemyTemplate {
            name: "Dragon Wyrmling",
            hp: 75,
            ac: 17,
            damage: "1d10+4",
            description: "A young dragon, small for its kind but already wreathed in menace.",
            xp: 450,
        },
    ),
    (
        "troll",
        EnemyTemplate {
            name: "Troll",
            hp: 84,
            ac: 15,
            damage: "2d6+4",
            description: "A hulking, rubbery brute whose wounds knit closed as you watch.",
            xp: 1_800,
        },
    ),
    (
        "orc",
        EnemyTemplate {
            name: "Orc",
            hp: 15,
            ac: 13,
            damage: "1d12+3",
            description: "A scarred raider hefting a greataxe and bellowing a war cry.",
            xp: 100,
        },
    ),
    (
        "goblin",
        EnemyTemplate {
            name: "Goblin",
            hp: 7,
            ac: 15,
            damage: "1d6+2",
            description: "A wiry goblin with a notched scimitar and a nasty grin.",
            xp: 50,
        },
    ),
];

/// Enemies for an unnamed encounter, picked uniformly.
pub static RANDOM_ENEMIES: &[EnemyTemplate] = &[
    EnemyTemplate {
        name: "Giant Rat",
        hp: 7,
        ac: 12,
        damage: "1d4+2",
        description: "A dog-sized rat with matted fur and yellowed teeth.",
        xp: 25,
    },
    EnemyTemplate {
        name: "Giant Spider",
        hp: 26,
        ac: 14,
        damage: "1d8+3",
        description: "A bloated spider descending on a thread thick as rope.",
        xp: 200,
    },
    EnemyTemplate {
        name: "Wolf",
        hp: 11,
        ac: 13,
        damage: "2d4+2",
        description: "A lean grey wolf circling with its hackles raised.",
        xp: 50,
    },
    EnemyTemplate {
        name: "Skeleton Warrior",
        hp: 13,
        ac: 13,
        damage: "1d6+2",
        description: "Rattling bones in rusted mail, a shortsword in its grip.",
        xp: 50,
    },
];

/// Looks up a named enemy by hint (case-insensitive).
#[must_use]
pub fn named(hint: &str) -> Option<&'static EnemyTemplate> {
    NAMED_ENEMIES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(hint.trim()))
        .map(|(_, template)| template)
}

/// The named template for `hint`, else a uniform pick from
/// [`RANDOM_ENEMIES`]. Only the random pick draws from `rng`.
pub fn choose(hint: Option<&str>, rng: &mut dyn DeterministicRng) -> &'static EnemyTemplate {
    if let Some(template) = hint.and_then(named) {
        return template;
    }
    let last = u32::try_from(RANDOM_ENEMIES.len() - 1).unwrap_or(0);
    let index = usize::try_from(rng.next_u32_range(0, last)).unwrap_or(0);
    &RANDOM_ENEMIES[index.min(RANDOM_ENEMIES.len() - 1)]
}
