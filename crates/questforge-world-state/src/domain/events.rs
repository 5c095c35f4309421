//! Domain events for the World State context.

use chrono::{DateTime, Utc};
use questforge_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{
    Character, CombatOutcome, Combatant, GameData, InventoryItem, Location, LoreEntry, Quest,
};

pub const SESSION_STARTED_EVENT_TYPE: &str = "game.session_started";
pub const CHARACTER_SYNCED_EVENT_TYPE: &str = "game.character_synced";
pub const LOCATION_CHANGED_EVENT_TYPE: &str = "game.location_changed";
pub const LORE_RECORDED_EVENT_TYPE: &str = "game.lore_recorded";
pub const ENCOUNTER_STARTED_EVENT_TYPE: &str = "game.encounter_started";
pub const ENEMY_DAMAGED_EVENT_TYPE: &str = "game.enemy_damaged";
pub const PLAYER_DAMAGED_EVENT_TYPE: &str = "game.player_damaged";
pub const PLAYER_HEALED_EVENT_TYPE: &str = "game.player_healed";
pub const GUARD_RAISED_EVENT_TYPE: &str = "game.guard_raised";
pub const GUARD_CONSUMED_EVENT_TYPE: &str = "game.guard_consumed";
pub const TURN_ADVANCED_EVENT_TYPE: &str = "game.turn_advanced";
pub const COMBAT_ENDED_EVENT_TYPE: &str = "game.combat_ended";
pub const ITEM_USED_EVENT_TYPE: &str = "game.item_used";
pub const ITEM_ACQUIRED_EVENT_TYPE: &str = "game.item_acquired";
pub const GOLD_CHANGED_EVENT_TYPE: &str = "game.gold_changed";
pub const EXPERIENCE_GAINED_EVENT_TYPE: &str = "game.experience_gained";
pub const LEVEL_REACHED_EVENT_TYPE: &str = "game.level_reached";
pub const QUEST_PROPOSED_EVENT_TYPE: &str = "game.quest_proposed";
pub const QUEST_ACCEPTED_EVENT_TYPE: &str = "game.quest_accepted";
pub const QUEST_DECLINED_EVENT_TYPE: &str = "game.quest_declined";
pub const QUEST_COMPLETED_EVENT_TYPE: &str = "game.quest_completed";
pub const QUEST_FAILED_EVENT_TYPE: &str = "game.quest_failed";

/// Emitted once when a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The complete starting state.
    pub data: GameData,
}

/// Emitted when a client-supplied character sheet replaces the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSynced {
    /// The new character sheet.
    pub character: Character,
}

/// Emitted when the party travels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationChanged {
    /// The location arrived at.
    pub location: Location,
}

/// Emitted when the player learns something about the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoreRecorded {
    /// The recorded entry.
    pub entry: LoreEntry,
}

/// Emitted when an encounter begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterStarted {
    /// The player's initiative entry.
    pub player: Combatant,
    /// The spawned enemy.
    pub enemy: Combatant,
}

/// Emitted when the enemy takes damage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDamaged {
    /// Damage applied.
    pub amount: u32,
    /// Enemy hit points afterwards.
    pub remaining_hp: u32,
}

/// Emitted when the player takes damage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDamaged {
    /// Damage applied.
    pub amount: u32,
    /// Player hit points afterwards.
    pub remaining_hp: u32,
}

/// Emitted when the player regains hit points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHealed {
    /// Hit points actually restored.
    pub amount: u32,
    /// Player hit points afterwards.
    pub current_hp: u32,
}

/// Emitted whenever the active combatant changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnAdvanced {
    /// 0 for the player, 1 for the enemy.
    pub current_turn: u32,
    /// Round number.
    pub round: u32,
}

/// Emitted when an encounter ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatEnded {
    /// Victory or defeat.
    pub outcome: CombatOutcome,
}

/// Emitted when one unit of an item is used up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUsed {
    /// The item name.
    pub name: String,
    /// Quantity left afterwards.
    pub remaining: u32,
}

/// Emitted when items are added to the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAcquired {
    /// The acquired stack.
    pub item: InventoryItem,
}

/// Emitted when the character's purse changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldChanged {
    /// Signed change.
    pub delta: i64,
    /// Gold afterwards.
    pub balance: u32,
}

/// Emitted when experience is granted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceGained {
    /// Experience granted.
    pub amount: u32,
    /// Total experience afterwards.
    pub total: u32,
}

/// Emitted for every level gained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelReached {
    /// The new level.
    pub level: u32,
    /// Experience needed for the level after.
    pub needed: u32,
    /// Maximum hit points at the new level.
    pub max_hp: u32,
}

/// Emitted when a quest is offered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestProposed {
    /// The offered quest.
    pub quest: Quest,
}

/// Emitted when a pending quest is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestAccepted {
    /// The quest identifier.
    pub quest_id: Uuid,
}

/// Emitted when a pending quest is turned down.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDeclined {
    /// The quest identifier.
    pub quest_id: Uuid,
}

/// Emitted when an active quest is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestCompleted {
    /// The quest identifier.
    pub quest_id: Uuid,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// Emitted when an active quest fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestFailed {
    /// The quest identifier.
    pub quest_id: Uuid,
}

/// Event payload variants for the World State context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEventKind {
    SessionStarted(Box<SessionStarted>),
    CharacterSynced(Box<CharacterSynced>),
    LocationChanged(LocationChanged),
    LoreRecorded(LoreRecorded),
    EncounterStarted(EncounterStarted),
    EnemyDamaged(EnemyDamaged),
    PlayerDamaged(PlayerDamaged),
    PlayerHealed(PlayerHealed),
    GuardRaised,
    GuardConsumed,
    TurnAdvanced(TurnAdvanced),
    CombatEnded(CombatEnded),
    ItemUsed(ItemUsed),
    ItemAcquired(ItemAcquired),
    GoldChanged(GoldChanged),
    ExperienceGained(ExperienceGained),
    LevelReached(LevelReached),
    QuestProposed(QuestProposed),
    QuestAccepted(QuestAccepted),
    QuestDeclined(QuestDeclined),
    QuestCompleted(QuestCompleted),
    QuestFailed(QuestFailed),
}

impl GameEventKind {
    /// The stored event-type name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => SESSION_STARTED_EVENT_TYPE,
            Self::CharacterSynced(_) => CHARACTER_SYNCED_EVENT_TYPE,
            Self::LocationChanged(_) => LOCATION_CHANGED_EVENT_TYPE,
            Self::LoreRecorded(_) => LORE_RECORDED_EVENT_TYPE,
            Self::EncounterStarted(_) => ENCOUNTER_STARTED_EVENT_TYPE,
            Self::EnemyDamaged(_) => ENEMY_DAMAGED_EVENT_TYPE,
            Self::PlayerDamaged(_) => PLAYER_DAMAGED_EVENT_TYPE,
            Self::PlayerHealed(_) => PLAYER_HEALED_EVENT_TYPE,
            Self::GuardRaised => GUARD_RAISED_EVENT_TYPE,
            Self::GuardConsumed => GUARD_CONSUMED_EVENT_TYPE,
            Self::TurnAdvanced(_) => TURN_ADVANCED_EVENT_TYPE,
            Self::CombatEnded(_) => COMBAT_ENDED_EVENT_TYPE,
            Self::ItemUsed(_) => ITEM_USED_EVENT_TYPE,
            Self::ItemAcquired(_) => ITEM_ACQUIRED_EVENT_TYPE,
            Self::GoldChanged(_) => GOLD_CHANGED_EVENT_TYPE,
            Self::ExperienceGained(_) => EXPERIENCE_GAINED_EVENT_TYPE,
            Self::LevelReached(_) => LEVEL_REACHED_EVENT_TYPE,
            Self::QuestProposed(_) => QUEST_PROPOSED_EVENT_TYPE,
            Self::QuestAccepted(_) => QUEST_ACCEPTED_EVENT_TYPE,
            Self::QuestDeclined(_) => QUEST_DECLINED_EVENT_TYPE,
            Self::QuestCompleted(_) => QUEST_COMPLETED_EVENT_TYPE,
            Self::QuestFailed(_) => QUEST_FAILED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the World State context.
#[derive(Debug, Clone)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
