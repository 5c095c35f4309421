//! The nested game-state data model.
//!
//! Everything here is plain data with camelCase serialization; all
//! mutation goes through [`GameState`](super::aggregates::GameState).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Location every new session starts in.
pub const STARTING_LOCATION: &str = "The Rusty Tankard";

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    /// Ability modifier for a score: `floor((score - 10) / 2)`.
    #[must_use]
    pub fn modifier(score: u8) -> i32 {
        (i32::from(score) - 10).div_euclid(2)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 15,
            dexterity: 14,
            constitution: 13,
            intelligence: 12,
            wisdom: 10,
            charisma: 8,
        }
    }
}

/// Experience towards the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub current: u32,
    /// Total experience at which the next level is reached.
    pub needed: u32,
}

/// Hit points; `current` stays within `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub current: u32,
    pub max: u32,
}

impl HitPoints {
    /// Full health.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub race: String,
    pub class: String,
    pub background: String,
    pub level: u32,
    pub experience: Experience,
    pub ability_scores: AbilityScores,
    pub hit_points: HitPoints,
    pub armor_class: u32,
    pub gold: u32,
    pub appearance: String,
    pub backstory: String,
    /// Names of known spells.
    #[serde(default)]
    pub spells: Vec<String>,
    /// Names of proficient skills.
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Default for Character {
    fn default() -> Self {
        Self {
            name: "Adventurer".to_owned(),
            race: "Human".to_owned(),
            class: "Fighter".to_owned(),
            background: "Folk Hero".to_owned(),
            level: 1,
            experience: Experience {
                current: 0,
                needed: 300,
            },
            ability_scores: AbilityScores::default(),
            hit_points: HitPoints::full(12),
            armor_class: 16,
            gold: 15,
            appearance: "An unremarkable traveler with a forgettable face.".to_owned(),
            backstory: "A wanderer with a past yet to be told.".to_owned(),
            spells: Vec::new(),
            skills: Vec::new(),
        }
    }
}

/// A companion travelling with the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyMember {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u32,
    pub hit_points: HitPoints,
    pub description: String,
}

/// Inventory item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Tool,
    Misc,
}

/// A stack of carried items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub name: String,
    pub quantity: u32,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl InventoryItem {
    /// Creates a stack of `quantity` items.
    #[must_use]
    pub fn new(name: &str, quantity: u32, description: &str, kind: ItemKind) -> Self {
        Self {
            name: name.to_owned(),
            quantity,
            description: description.to_owned(),
            kind,
        }
    }

    /// A stack of the standard healing potion.
    #[must_use]
    pub fn health_potion(quantity: u32) -> Self {
        Self::new(
            "Health Potion",
            quantity,
            "Restores 2d4+2 hit points.",
            ItemKind::Consumable,
        )
    }

    /// True for consumables whose description mentions restoring hit points.
    #[must_use]
    pub fn is_healing(&self) -> bool {
        let text = format!("{} {}", self.name, self.description).to_lowercase();
        self.kind == ItemKind::Consumable
            && (text.contains("heal") || text.contains("restores") || text.contains("hit points"))
    }
}

/// What the character is wearing or wielding. Distinct from the carried list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub clothes: Option<String>,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    pub accessory: Option<String>,
}

/// A known spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spell {
    pub name: String,
    /// Spell level; 0 for cantrips.
    pub level: u8,
    pub description: String,
}

/// A skill proficiency and its total bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProficiency {
    pub name: String,
    pub bonus: i32,
}

/// Quest lifecycle status once accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestStatus {
    Active,
    Completed,
    Failed,
}

/// Which slot of the quest log a quest occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Main,
    Side,
    Daily,
}

/// A quest, pending or accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub quest_giver: String,
    pub xp_reward: u32,
    #[serde(default)]
    pub gold_reward: Option<u32>,
    pub status: QuestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
}

/// The quest log.
///
/// `pending` holds proposals awaiting a decision; they are not members of
/// the three accepted slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestLog {
    pub main_quest: Option<Quest>,
    pub current_mission: Option<Quest>,
    pub side_quests: Vec<Quest>,
    pub pending: Vec<Quest>,
}

impl QuestLog {
    /// Every accepted quest: main, current mission, then side quests.
    pub fn accepted(&self) -> impl Iterator<Item = &Quest> {
        self.main_quest
            .iter()
            .chain(self.current_mission.iter())
            .chain(self.side_quests.iter())
    }

    /// Finds an accepted quest by id.
    #[must_use]
    pub fn accepted_mut(&mut self, id: Uuid) -> Option<&mut Quest> {
        self.main_quest
            .iter_mut()
            .chain(self.current_mission.iter_mut())
            .chain(self.side_quests.iter_mut())
            .find(|q| q.id == id)
    }

    /// True if any quest, pending or accepted, has this id.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.pending.iter().any(|q| q.id == id) || self.accepted().any(|q| q.id == id)
    }
}

/// Location categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Town,
    Tavern,
    Wilderness,
    Dungeon,
    Castle,
    Road,
}

/// Where the party currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    pub npcs: BTreeSet<String>,
    pub exits: BTreeSet<String>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: STARTING_LOCATION.to_owned(),
            description: "A smoky tavern where travelers trade rumors over cheap ale.".to_owned(),
            kind: LocationKind::Tavern,
            npcs: ["Barkeep Odo".to_owned(), "Old Mira".to_owned()].into(),
            exits: ["Town Square".to_owned(), "Old Road".to_owned()].into(),
        }
    }
}

/// A piece of world lore the player has learned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoreEntry {
    pub title: String,
    pub text: String,
}

/// One participant of an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub name: String,
    pub initiative: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub ac: u32,
    #[serde(default)]
    pub xp_value: u32,
    #[serde(default)]
    pub is_player: bool,
}

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Encounter progress.
///
/// Out of combat the initiative list is empty and both counters are zero.
/// `current_turn` is 0 while the player acts and 1 while the enemy acts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    pub in_combat: bool,
    pub initiative: Vec<Combatant>,
    pub current_turn: u32,
    pub round: u32,
    /// Set by a successful dodge or hide; the next enemy attack misses.
    #[serde(default)]
    pub player_guarded: bool,
}

impl CombatState {
    /// The (single) enemy combatant, if an encounter is active.
    #[must_use]
    pub fn enemy(&self) -> Option<&Combatant> {
        self.initiative.iter().find(|c| !c.is_player)
    }

    /// True while it is the player's move.
    #[must_use]
    pub fn is_player_turn(&self) -> bool {
        self.in_combat && self.current_turn == 0
    }
}

/// Session bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub scenario_title: String,
}

/// The full state of one adventure session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub character: Character,
    pub party: Vec<PartyMember>,
    pub inventory: Vec<InventoryItem>,
    pub equipment: Equipment,
    pub spells: Vec<Spell>,
    pub skills: Vec<SkillProficiency>,
    pub quests: QuestLog,
    pub location: Location,
    pub lore: Vec<LoreEntry>,
    pub combat: CombatState,
    pub session: SessionInfo,
}

impl GameData {
    /// Builds a fully populated starting state for `character`.
    ///
    /// Class determines equipment, spells and skill proficiencies; every
    /// character carries the same starter pack.
    #[must_use]
    pub fn new(mut character: Character, session: SessionInfo) -> Self {
        let spells = class_spells(&character.class);
        let skills = class_skills(&character.class, &character.ability_scores);
        character.spells = spells.iter().map(|s| s.name.clone()).collect();
        character.skills = skills.iter().map(|s| s.name.clone()).collect();

        Self {
            equipment: class_equipment(&character.class),
            character,
            party: Vec::new(),
            inventory: starter_inventory(),
            spells,
            skills,
            quests: QuestLog::default(),
            location: Location::default(),
            lore: Vec::new(),
            combat: CombatState::default(),
            session,
        }
    }

    /// Bonus for `skill` if proficient, else the raw ability modifier.
    #[must_use]
    pub fn skill_bonus(&self, skill: &str) -> i32 {
        self.skills
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(skill))
            .map_or_else(
                || AbilityScores::modifier(governing_score(skill, &self.character.ability_scores)),
                |s| s.bonus,
            )
    }
}

const PROFICIENCY_BONUS: i32 = 2;

fn starter_inventory() -> Vec<InventoryItem> {
    vec![
        InventoryItem::health_potion(2),
        InventoryItem::new("Rations", 5, "A day of dried food.", ItemKind::Consumable),
        InventoryItem::new("Torch", 3, "Burns for an hour.", ItemKind::Tool),
        InventoryItem::new("Hempen Rope", 1, "Fifty feet of sturdy rope.", ItemKind::Tool),
    ]
}

fn class_equipment(class: &str) -> Equipment {
    let (weapon, armor) = match class {
        "Barbarian" => ("Greataxe", None),
        "Bard" => ("Rapier", Some("Leather Armor")),
        "Cleric" => ("Mace", Some("Scale Mail")),
        "Druid" => ("Quarterstaff", Some("Leather Armor")),
        "Monk" => ("Shortsword", None),
        "Paladin" => ("Longsword", Some("Chain Mail")),
        "Ranger" => ("Longbow", Some("Leather Armor")),
        "Rogue" => ("Dagger", Some("Leather Armor")),
        "Sorcerer" | "Wizard" => ("Quarterstaff", None),
        "Warlock" => ("Light Crossbow", Some("Leather Armor")),
        _ => ("Longsword", Some("Chain Mail")),
    };
    Equipment {
        clothes: Some("Traveler's Clothes".to_owned()),
        weapon: Some(weapon.to_owned()),
        armor: armor.map(str::to_owned),
        accessory: None,
    }
}

fn class_spells(class: &str) -> Vec<Spell> {
    let spell = |name: &str, level: u8, description: &str| Spell {
        name: name.to_owned(),
        level,
        description: description.to_owned(),
    };
    match class {
        "Wizard" | "Sorcerer" | "Warlock" => vec![
            spell("Fire Bolt", 0, "Hurl a mote of fire at a creature."),
            spell("Magic Missile", 1, "Three glowing darts that never miss."),
        ],
        "Cleric" => vec![
            spell("Sacred Flame", 0, "Radiant flame descends on a creature."),
            spell("Cure Wounds", 1, "A touch that restores hit points."),
        ],
        "Druid" => vec![
            spell("Produce Flame", 0, "A flickering flame in your palm."),
            spell("Healing Word", 1, "A word of power that mends wounds."),
        ],
        "Bard" => vec![
            spell("Vicious Mockery", 0, "Insults laced with subtle enchantment."),
            spell("Healing Word", 1, "A word of power that mends wounds."),
        ],
        _ => Vec::new(),
    }
}

fn class_skills(class: &str, scores: &AbilityScores) -> Vec<SkillProficiency> {
    let names: &[&str] = match class {
        "Rogue" => &["Stealth", "Investigation", "Perception"],
        "Bard" => &["Persuasion", "Perception"],
        "Ranger" | "Druid" => &["Perception", "Athletics"],
        "Wizard" | "Sorcerer" => &["Investigation", "Perception"],
        "Cleric" | "Paladin" => &["Persuasion", "Intimidation"],
        "Warlock" => &["Intimidation", "Investigation"],
        "Monk" => &["Athletics", "Stealth"],
        _ => &["Athletics", "Intimidation"],
    };
    names
        .iter()
        .map(|name| SkillProficiency {
            name: (*name).to_owned(),
            bonus: AbilityScores::modifier(governing_score(name, scores)) + PROFICIENCY_BONUS,
        })
        .collect()
}

fn governing_score(skill: &str, scores: &AbilityScores) -> u8 {
    match skill.to_ascii_lowercase().as_str() {
        "athletics" => scores.strength,
        "stealth" => scores.dexterity,
        "investigation" => scores.intelligence,
        "perception" => scores.wisdom,
        _ => scores.charisma,
    }
}
