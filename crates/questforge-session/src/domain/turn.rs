//! The turn-processing contract: request, response and structured events.

use questforge_combat::domain::arbiter::{CombatEffect, Target};
use questforge_rules::domain::dice::DiceOutcome;
use questforge_world_state::domain::model::{
    Character, CombatOutcome, Experience, HitPoints,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a conversation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// A line written by the player.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Input of one turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub messages: Vec<ChatMessage>,
    /// The client's copy of the character sheet, synced first if it differs.
    #[serde(default)]
    pub character_state: Option<Character>,
    /// The client's belief about combat; the stored state wins.
    #[serde(default)]
    pub is_in_combat: bool,
}

impl TurnRequest {
    /// The player's utterance: the last user message.
    #[must_use]
    pub fn utterance(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// The headline roll of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub expression: String,
    pub result: i32,
}

/// Character fields changed by a turn. Absent fields did not change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "class")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Experience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<HitPoints>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
}

impl CharacterDelta {
    /// The fields that differ between two sheets, or `None` if none do.
    #[must_use]
    pub fn between(before: &Character, after: &Character) -> Option<Self> {
        fn changed<T: PartialEq + Clone>(a: &T, b: &T) -> Option<T> {
            (a != b).then(|| b.clone())
        }
        let delta = Self {
            name: changed(&before.name, &after.name),
            race: changed(&before.race, &after.race),
            class: changed(&before.class, &after.class),
            appearance: changed(&before.appearance, &after.appearance),
            backstory: changed(&before.backstory, &after.backstory),
            level: changed(&before.level, &after.level),
            experience: changed(&before.experience, &after.experience),
            hit_points: changed(&before.hit_points, &after.hit_points),
            gold: changed(&before.gold, &after.gold),
        };
        (delta != Self::default()).then_some(delta)
    }
}

/// Lifecycle step reported for a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestUpdate {
    Proposed,
    Accepted,
    Declined,
    Completed,
    Failed,
}

/// Structured record of something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TurnEvent {
    #[serde(rename_all = "camelCase")]
    EnemySpawned {
        name: String,
        hp: u32,
        ac: u32,
        damage: String,
        description: String,
    },
    #[serde(rename_all = "camelCase")]
    DiceRolled {
        purpose: String,
        expression: String,
        rolls: Vec<u32>,
        modifier: i32,
        total: i32,
    },
    #[serde(rename_all = "camelCase")]
    QuestUpdated {
        quest_id: Uuid,
        title: String,
        status: QuestUpdate,
    },
    ItemUsed {
        name: String,
        remaining: u32,
    },
    ItemAcquired {
        name: String,
        quantity: u32,
    },
    #[serde(rename_all = "camelCase")]
    DamageDealt {
        target: Target,
        amount: u32,
        remaining_hp: u32,
    },
    #[serde(rename_all = "camelCase")]
    Healed {
        amount: u32,
        current_hp: u32,
    },
    GuardRaised,
    #[serde(rename_all = "camelCase")]
    CombatEnded {
        outcome: CombatOutcome,
        xp_value: u32,
    },
    ExperienceGained {
        amount: u32,
        total: u32,
    },
    LevelReached {
        level: u32,
    },
    GoldChanged {
        delta: i64,
        balance: u32,
    },
    LocationChanged {
        name: String,
    },
    ActionRejected {
        reason: String,
    },
}

impl TurnEvent {
    /// A dice event for `outcome`.
    #[must_use]
    pub fn dice(purpose: &str, outcome: &DiceOutcome) -> Self {
        Self::DiceRolled {
            purpose: purpose.to_owned(),
            expression: outcome.expression.to_string(),
            rolls: outcome.rolls.clone(),
            modifier: outcome.modifier,
            total: outcome.total,
        }
    }
}

impl From<&CombatEffect> for TurnEvent {
    fn from(effect: &CombatEffect) -> Self {
        match effect {
            CombatEffect::EnemySpawned { template } => Self::EnemySpawned {
                name: template.name.to_owned(),
                hp: template.hp,
                ac: template.ac,
                damage: template.damage.to_owned(),
                description: template.description.to_owned(),
            },
            CombatEffect::DiceRolled { purpose, outcome } => Self::dice(purpose, outcome),
            CombatEffect::DamageDealt {
                target,
                amount,
                remaining_hp,
            } => Self::DamageDealt {
                target: *target,
                amount: *amount,
                remaining_hp: *remaining_hp,
            },
            CombatEffect::Healed { amount, current_hp } => Self::Healed {
                amount: *amount,
                current_hp: *current_hp,
            },
            CombatEffect::ItemUsed { name, remaining } => Self::ItemUsed {
                name: name.clone(),
                remaining: *remaining,
            },
            CombatEffect::GuardRaised => Self::GuardRaised,
            CombatEffect::CombatEnded { outcome, xp_value } => Self::CombatEnded {
                outcome: *outcome,
                xp_value: *xp_value,
            },
        }
    }
}

/// Output of one turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_data_delta: Option<CharacterDelta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dice_roll: Option<DiceRoll>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
    /// Label of the classified action.
    pub action: String,
    pub events: Vec<TurnEvent>,
}

impl TurnResponse {
    /// The first roll of the turn, as `{expression, result}`.
    #[must_use]
    pub fn headline_roll(events: &[TurnEvent]) -> Option<DiceRoll> {
        events.iter().find_map(|event| match event {
            TurnEvent::DiceRolled {
                expression, total, ..
            } => Some(DiceRoll {
                expression: expression.clone(),
                result: *total,
            }),
            _ => None,
        })
    }
}
