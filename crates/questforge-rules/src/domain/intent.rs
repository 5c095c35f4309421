//! Intent classification.
//!
//! Player text is matched against an ordered table of rules; the first rule
//! that matches wins. Several keyword sets overlap ("attack" is both a
//! generic fight trigger and an explicit attack), so the order of
//! [`RULES`] is part of the contract and is pinned by tests below.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether the player is exploring or locked in an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// No encounter is active.
    Exploring,
    /// An encounter is active.
    InCombat,
}

impl Mode {
    /// Maps the combat flag to a mode.
    #[must_use]
    pub fn from_in_combat(in_combat: bool) -> Self {
        if in_combat { Self::InCombat } else { Self::Exploring }
    }
}

/// Skills a free-form check can exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Climbing, jumping, swimming.
    Athletics,
    /// Moving unseen.
    Stealth,
    /// Talking someone round.
    Persuasion,
    /// Threats and menace.
    Intimidation,
    /// Searching for clues.
    Investigation,
    /// Noticing things.
    Perception,
}

impl Skill {
    /// Display name, matching skill proficiency names in the game state.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Athletics => "Athletics",
            Self::Stealth => "Stealth",
            Self::Persuasion => "Persuasion",
            Self::Intimidation => "Intimidation",
            Self::Investigation => "Investigation",
            Self::Perception => "Perception",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The structured interpretation of a player's utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Examine the surroundings.
    Look,
    /// Travel somewhere.
    Move,
    /// Speak with someone.
    Talk,
    /// Ask whether any work is on offer.
    AskAboutQuest,
    /// Take on the quest being offered.
    AcceptQuest,
    /// Turn down the quest being offered.
    DeclineQuest,
    /// Start a fight, optionally against a named monster.
    TriggerEncounter {
        /// Canonical monster keyword, when one was named.
        enemy_hint: Option<String>,
    },
    /// Weapon attack.
    PerformAttack,
    /// Offensive spell.
    CastSpell,
    /// Use an inventory item.
    UseItem {
        /// Words following the verb, when any.
        item_hint: Option<String>,
    },
    /// Dodge the next blow.
    Dodge,
    /// Let the enemy act.
    EnemyTurn,
    /// Strike from the shadows (combat only).
    SneakAttack,
    /// Take cover (combat only).
    Hide,
    /// Attempt a skill check.
    SkillCheck {
        /// The skill being tested.
        skill: Skill,
    },
    /// Ask for help with commands.
    Help,
    /// Report the current quest as done.
    QuestComplete,
    /// Nothing matched.
    Unknown,
}

impl Action {
    /// Stable snake-case label for logs and narration requests.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Look => "look",
            Self::Move => "move",
            Self::Talk => "talk",
            Self::AskAboutQuest => "ask_about_quest",
            Self::AcceptQuest => "accept_quest",
            Self::DeclineQuest => "decline_quest",
            Self::TriggerEncounter { .. } => "trigger_encounter",
            Self::PerformAttack => "perform_attack",
            Self::CastSpell => "cast_spell",
            Self::UseItem { .. } => "use_item",
            Self::Dodge => "dodge",
            Self::EnemyTurn => "enemy_turn",
            Self::SneakAttack => "sneak_attack",
            Self::Hide => "hide",
            Self::SkillCheck { .. } => "skill_check",
            Self::Help => "help",
            Self::QuestComplete => "quest_complete",
            Self::Unknown => "unknown",
        }
    }
}

/// One entry of the precedence table.
pub struct IntentRule {
    /// Rule name, used in debug logs.
    pub name: &'static str,
    /// Returns the action when the rule matches the normalized text.
    pub matcher: fn(&str, Mode) -> Option<Action>,
}

/// Monsters that spawn a fixed encounter when named, in priority order.
pub const NAMED_MONSTERS: &[&str] = &["worg", "dragon", "troll", "orc", "goblin"];

const LOOK_PHRASES: &[&str] = &["look", "examine", "inspect", "observe", "survey", "look around"];
const MOVE_PHRASES: &[&str] = &[
    "go", "move", "walk", "travel", "head to", "head for", "enter", "leave", "find", "search for",
];
const TALK_PHRASES: &[&str] = &["talk", "speak", "chat", "greet", "converse"];
const QUEST_NOUNS: &[&str] = &[
    "quest", "quests", "mission", "missions", "job", "jobs", "work", "task", "tasks", "bounty",
];
const QUEST_QUESTION_MARKERS: &[&str] = &[
    "any", "ask about", "about", "available", "is there", "are there", "got any", "looking for",
    "offer",
];
const ACCEPT_PHRASES: &[&str] = &[
    "accept", "agree", "i'll do it", "i will do it", "take the job", "take the quest",
    "count me in",
];
const DECLINE_PHRASES: &[&str] = &["decline", "refuse", "reject", "not interested", "no thanks"];
const ENCOUNTER_PHRASES: &[&str] = &[
    "fight", "attack", "battle", "combat", "monster", "monsters", "enemy", "enemies", "ambush",
];
const ATTACK_PHRASES: &[&str] = &[
    "i attack", "attack the", "attack it", "attack with", "slash", "strike", "swing", "stab",
];
/// Whole utterances that mean "attack" once a fight is on.
const BARE_ATTACK_COMMANDS: &[&str] = &["attack", "fight", "fight back", "attack again", "fight on"];
const SPELL_PHRASES: &[&str] = &["cast", "spell", "magic", "fireball", "magic missile"];
const ITEM_VERBS: &[&str] = &["use", "drink", "quaff", "consume", "eat", "apply"];
const ITEM_NOUNS: &[&str] = &["potion", "potions", "scroll"];
const DODGE_PHRASES: &[&str] = &["dodge", "evade", "defend", "block", "parry"];
const ENEMY_TURN_PHRASES: &[&str] = &[
    "enemy attacks", "enemy turn", "enemy's turn", "monster attacks", "it attacks",
    "they attack", "enemy acts",
];
const SNEAK_ATTACK_PHRASES: &[&str] = &["sneak attack", "backstab", "flank"];
const HIDE_PHRASES: &[&str] = &["hide", "take cover", "duck behind"];
const SKILL_PHRASES: &[(&str, Skill)] = &[
    ("climb", Skill::Athletics),
    ("jump", Skill::Athletics),
    ("stealth", Skill::Stealth),
    ("sneak", Skill::Stealth),
    ("persuade", Skill::Persuasion),
    ("convince", Skill::Persuasion),
    ("intimidate", Skill::Intimidation),
    ("threaten", Skill::Intimidation),
    ("investigate", Skill::Investigation),
    ("perception", Skill::Perception),
    ("listen", Skill::Perception),
    ("spot", Skill::Perception),
];
const QUEST_COMPLETE_PHRASES: &[&str] = &[
    "complete the quest", "completed the quest", "quest complete", "quest completed",
    "finished the quest", "turn in", "mission accomplished", "job done",
];
const HELP_PHRASES: &[&str] = &["help", "what can i do", "commands", "options"];
const ARTICLES: &[&str] = &["the", "a", "an", "my", "some", "one"];

/// The precedence table, highest priority first.
pub static RULES: &[IntentRule] = &[
    IntentRule { name: "look", matcher: |t, _| any_phrase(t, LOOK_PHRASES).then_some(Action::Look) },
    IntentRule { name: "move", matcher: |t, _| any_phrase(t, MOVE_PHRASES).then_some(Action::Move) },
    IntentRule { name: "talk", matcher: |t, _| any_phrase(t, TALK_PHRASES).then_some(Action::Talk) },
    IntentRule { name: "ask_about_quest", matcher: match_ask_about_quest },
    IntentRule {
        name: "accept_quest",
        matcher: |t, _| any_phrase(t, ACCEPT_PHRASES).then_some(Action::AcceptQuest),
    },
    IntentRule {
        name: "decline_quest",
        matcher: |t, _| any_phrase(t, DECLINE_PHRASES).then_some(Action::DeclineQuest),
    },
    IntentRule { name: "trigger_encounter", matcher: match_trigger_encounter },
    IntentRule { name: "perform_attack", matcher: match_perform_attack },
    IntentRule {
        name: "cast_spell",
        matcher: |t, _| any_phrase(t, SPELL_PHRASES).then_some(Action::CastSpell),
    },
    IntentRule { name: "use_item", matcher: match_use_item },
    IntentRule { name: "dodge", matcher: |t, _| any_phrase(t, DODGE_PHRASES).then_some(Action::Dodge) },
    IntentRule {
        name: "enemy_turn",
        matcher: |t, _| any_phrase(t, ENEMY_TURN_PHRASES).then_some(Action::EnemyTurn),
    },
    IntentRule {
        name: "sneak_attack",
        matcher: |t, mode| {
            (mode == Mode::InCombat && any_phrase(t, SNEAK_ATTACK_PHRASES))
                .then_some(Action::SneakAttack)
        },
    },
    IntentRule {
        name: "hide",
        matcher: |t, mode| (mode == Mode::InCombat && any_phrase(t, HIDE_PHRASES)).then_some(Action::Hide),
    },
    IntentRule {
        name: "skill_check",
        matcher: |t, _| {
            SKILL_PHRASES
                .iter()
                .find(|(phrase, _)| contains_phrase(t, phrase))
                .map(|&(_, skill)| Action::SkillCheck { skill })
        },
    },
    IntentRule {
        name: "quest_complete",
        matcher: |t, _| any_phrase(t, QUEST_COMPLETE_PHRASES).then_some(Action::QuestComplete),
    },
    IntentRule { name: "help", matcher: |t, _| any_phrase(t, HELP_PHRASES).then_some(Action::Help) },
];

/// Classifies `text` in the given mode.
///
/// The same `(text, mode)` always yields the same action.
#[must_use]
pub fn classify(text: &str, mode: Mode) -> Action {
    let normalized = text.trim().to_lowercase();
    for rule in RULES {
        if let Some(action) = (rule.matcher)(&normalized, mode) {
            debug!(rule = rule.name, ?mode, "intent classified");
            return action;
        }
    }
    debug!(?mode, "no intent rule matched");
    Action::Unknown
}

/// Generic combat keywords start an encounter, but only while exploring:
/// once a fight is on, "attack" falls through to the explicit attack rule.
fn match_trigger_encounter(text: &str, mode: Mode) -> Option<Action> {
    if mode == Mode::InCombat {
        return None;
    }
    let enemy_hint = named_monster(text);
    (enemy_hint.is_some() || any_phrase(text, ENCOUNTER_PHRASES)).then(|| {
        Action::TriggerEncounter {
            enemy_hint: enemy_hint.map(str::to_owned),
        }
    })
}

fn match_perform_attack(text: &str, mode: Mode) -> Option<Action> {
    if any_phrase(text, ATTACK_PHRASES) {
        return Some(Action::PerformAttack);
    }
    let bare = mode == Mode::InCombat
        && BARE_ATTACK_COMMANDS.contains(&words(text).collect::<Vec<_>>().join(" ").as_str());
    bare.then_some(Action::PerformAttack)
}

fn match_ask_about_quest(text: &str, _mode: Mode) -> Option<Action> {
    let asks = text.contains('?') || any_phrase(text, QUEST_QUESTION_MARKERS);
    (asks && any_phrase(text, QUEST_NOUNS)).then_some(Action::AskAboutQuest)
}

fn match_use_item(text: &str, _mode: Mode) -> Option<Action> {
    let words: Vec<&str> = words(text).collect();
    if let Some(pos) = words.iter().position(|w| ITEM_VERBS.contains(w)) {
        let hint: Vec<&str> = words[pos + 1..]
            .iter()
            .copied()
            .skip_while(|w| ARTICLES.contains(w))
            .collect();
        let item_hint = (!hint.is_empty()).then(|| hint.join(" "));
        return Some(Action::UseItem { item_hint });
    }
    any_phrase(text, ITEM_NOUNS).then(|| Action::UseItem {
        item_hint: words
            .iter()
            .find(|w| ITEM_NOUNS.contains(w))
            .map(|w| (*w).to_owned()),
    })
}

/// Returns the first monster of [`NAMED_MONSTERS`] named in `text`, singular
/// or plural.
#[must_use]
pub fn named_monster(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    NAMED_MONSTERS.iter().copied().find(|name| {
        words(&lowered).any(|w| w == *name || w.strip_suffix('s') == Some(*name))
    })
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
}

fn any_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(text, phrase))
}

/// Word-bounded containment: `"go"` matches "let's go north" but not
/// "goblin".
fn contains_phrase(text: &str, phrase: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric();
    text.match_indices(phrase).any(|(start, matched)| {
        let before = text[..start].chars().next_back();
        let after = text[start + matched.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}
