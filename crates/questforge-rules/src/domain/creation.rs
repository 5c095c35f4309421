//! Character-creation extraction.
//!
//! Pulls a name, race, class, appearance and backstory out of free-form
//! creation dialogue. Races and classes are matched against data tables of
//! canonical terms plus curated misspellings; the first entry in table order
//! wins, so compound races ("half-elf") sit ahead of their parts ("elf").

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder used when no appearance detail was given.
pub const DEFAULT_APPEARANCE: &str = "An unremarkable traveler with a forgettable face.";

/// Placeholder used when no backstory detail was given.
pub const DEFAULT_BACKSTORY: &str = "A wanderer with a past yet to be told.";

/// A canonical term and the spellings that map to it.
pub struct Alias {
    /// Canonical display name.
    pub canonical: &'static str,
    /// Lowercase substrings recognized as this term, canonical first.
    pub spellings: &'static [&'static str],
}

/// Races, compound and longer names first.
pub static RACES: &[Alias] = &[
    Alias { canonical: "Dragonborn", spellings: &["dragonborn", "dragon born", "dragonbourn", "dragonborne"] },
    Alias { canonical: "Half-Elf", spellings: &["half-elf", "half elf", "halfelf", "half-elven"] },
    Alias { canonical: "Half-Orc", spellings: &["half-orc", "half orc", "halforc"] },
    Alias { canonical: "Tiefling", spellings: &["tiefling", "teifling", "tiefing", "tielfing"] },
    Alias { canonical: "Halfling", spellings: &["halfling", "halflin", "hafling", "halfing", "hobbit"] },
    Alias { canonical: "Dwarf", spellings: &["dwarf", "dwarv", "dwarfe", "dwaf", "dorf"] },
    Alias { canonical: "Gnome", spellings: &["gnome", "gnom"] },
    Alias { canonical: "Human", spellings: &["human", "humn", "huamn", "hooman", "humen"] },
    Alias { canonical: "Elf", spellings: &["elf", "elfe", "elven", "elvish"] },
];

/// Classes.
pub static CLASSES: &[Alias] = &[
    Alias { canonical: "Barbarian", spellings: &["barbarian", "barbarain", "barbarion", "barb"] },
    Alias { canonical: "Bard", spellings: &["bard", "minstrel"] },
    Alias { canonical: "Cleric", spellings: &["cleric", "cleirc", "clerik", "priest"] },
    Alias { canonical: "Druid", spellings: &["druid", "druide", "druud"] },
    Alias { canonical: "Fighter", spellings: &["fighter", "figher", "fightr", "warrior"] },
    Alias { canonical: "Monk", spellings: &["monk", "monc"] },
    Alias { canonical: "Paladin", spellings: &["paladin", "paladine", "palladin", "paliden"] },
    Alias { canonical: "Ranger", spellings: &["ranger", "rangr", "ranjer"] },
    Alias { canonical: "Rogue", spellings: &["rogue", "rouge", "rogeu", "thief"] },
    Alias { canonical: "Sorcerer", spellings: &["sorcerer", "sorceror", "sorcerr", "sorceress"] },
    Alias { canonical: "Warlock", spellings: &["warlock", "warlok", "warlocke"] },
    Alias { canonical: "Wizard", spellings: &["wizard", "wizzard", "wizerd", "mage"] },
];

const APPEARANCE_TRIGGERS: &[&str] = &["tall", "short", "hair", "eyes"];
const BACKSTORY_TRIGGERS: &[&str] = &["noble", "betrayed", "revenge", "family"];

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[Nn]amed|[Cc]alled|[Nn]ame is|[Nn]ame's)\s+([A-Z][a-zA-Z'\-]*)")
        .unwrap_or_else(|e| panic!("invalid name pattern: {e}"))
});

/// Everything that could be pulled out of the creation dialogue so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSketch {
    /// Character name, if one was given.
    pub name: Option<String>,
    /// Canonical race.
    pub race: Option<String>,
    /// Canonical class.
    pub class: Option<String>,
    /// Appearance fragment.
    pub appearance: Option<String>,
    /// Backstory fragment.
    pub backstory: Option<String>,
}

impl CharacterSketch {
    /// Extracts every detail present in `text`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            name: extract_name(text),
            race: extract_race(text).map(str::to_owned),
            class: extract_class(text).map(str::to_owned),
            appearance: extract_appearance(text),
            backstory: extract_backstory(text),
        }
    }

    /// Fills in fields still missing from `self` with those from `later`.
    ///
    /// Earlier answers win, so a player naming a race once keeps it.
    #[must_use]
    pub fn merge(self, later: Self) -> Self {
        Self {
            name: self.name.or(later.name),
            race: self.race.or(later.race),
            class: self.class.or(later.class),
            appearance: self.appearance.or(later.appearance),
            backstory: self.backstory.or(later.backstory),
        }
    }

    /// True once name, race and class are all known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.race.is_some() && self.class.is_some()
    }

    /// Appearance, or [`DEFAULT_APPEARANCE`].
    #[must_use]
    pub fn appearance_or_default(&self) -> &str {
        self.appearance.as_deref().unwrap_or(DEFAULT_APPEARANCE)
    }

    /// Backstory, or [`DEFAULT_BACKSTORY`].
    #[must_use]
    pub fn backstory_or_default(&self) -> &str {
        self.backstory.as_deref().unwrap_or(DEFAULT_BACKSTORY)
    }
}

/// The capitalized word following "named", "called", "name is" or "name's".
#[must_use]
pub fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
}

/// Canonical race mentioned in `text`.
#[must_use]
pub fn extract_race(text: &str) -> Option<&'static str> {
    match_alias(RACES, text)
}

/// Canonical class mentioned in `text`.
#[must_use]
pub fn extract_class(text: &str) -> Option<&'static str> {
    match_alias(CLASSES, text)
}

/// First sentence fragment mentioning height, hair or eyes.
#[must_use]
pub fn extract_appearance(text: &str) -> Option<String> {
    first_fragment_with(text, APPEARANCE_TRIGGERS)
}

/// First sentence fragment mentioning nobility, betrayal, revenge or family.
#[must_use]
pub fn extract_backstory(text: &str) -> Option<String> {
    first_fragment_with(text, BACKSTORY_TRIGGERS)
}

fn match_alias(table: &'static [Alias], text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    table
        .iter()
        .find(|alias| alias.spellings.iter().any(|s| lowered.contains(s)))
        .map(|alias| alias.canonical)
}

fn first_fragment_with(text: &str, triggers: &[&str]) -> Option<String> {
    text.split(['.', '!', '?', ';'])
        .map(str::trim)
        .find(|fragment| {
            let lowered = fragment.to_lowercase();
            triggers.iter().any(|t| lowered.contains(t))
        })
        .map(str::to_owned)
}
