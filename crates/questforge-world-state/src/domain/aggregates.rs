//! Aggregate roots for the World State context.
//!
//! [`GameState`] is the single root for an adventure session. Every
//! transition validates first, then records an event that is applied
//! immediately and queued for persistence. Replaying the stored events
//! through [`AggregateRoot::apply`] reproduces the same state.

use questforge_core::aggregate::AggregateRoot;
use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use questforge_core::event::EventMetadata;
use uuid::Uuid;

use super::events::{
    CharacterSynced, CombatEnded, EncounterStarted, EnemyDamaged, GameEvent, GameEventKind,
    GoldChanged, ItemAcquired, ItemUsed, LocationChanged, LoreRecorded, PlayerDamaged,
    PlayerHealed, SessionStarted, TurnAdvanced,
};
use super::model::{
    Character, CombatOutcome, CombatState, Combatant, GameData, InventoryItem, Location,
    LoreEntry,
};

/// The aggregate root for one adventure session.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Aggregate identifier (the session id).
    pub id: Uuid,
    /// Number of persisted events.
    pub(crate) version: i64,
    /// Current game data; `None` until the session has started.
    data: Option<GameData>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<GameEvent>,
}

impl GameState {
    /// Creates an empty aggregate, ready to be reconstituted.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            data: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Starts a new session with `data` as the initial state.
    #[must_use]
    pub fn start(id: Uuid, data: GameData, correlation_id: Uuid, clock: &dyn Clock) -> Self {
        let mut state = Self::new(id);
        state.record(
            GameEventKind::SessionStarted(Box::new(SessionStarted { data })),
            correlation_id,
            clock,
        );
        state
    }

    /// True once a `SessionStarted` event has been applied.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.data.is_some()
    }

    /// The current game data.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn data(&self) -> Result<&GameData, DomainError> {
        self.data.as_ref().ok_or(DomainError::AggregateNotFound(self.id))
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Records `kind` as a new event and applies it.
    pub(crate) fn record(&mut self, kind: GameEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let event = GameEvent {
            metadata: EventMetadata::new(
                kind.event_type(),
                self.id,
                self.next_sequence_number(),
                correlation_id,
                clock.now(),
            ),
            kind,
        };
        self.apply_kind(&event.kind);
        self.uncommitted_events.push(event);
    }

    /// Replaces the character sheet if it differs from the stored one.
    ///
    /// Returns `true` if an event was recorded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty name or a level of 0.
    pub fn sync_character(
        &mut self,
        character: Character,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        if character.name.trim().is_empty() {
            return Err(DomainError::Validation("character name must not be empty".into()));
        }
        if character.level == 0 {
            return Err(DomainError::Validation("character level must be at least 1".into()));
        }
        if self.data()?.character == character {
            return Ok(false);
        }
        let mut character = character;
        character.hit_points.current = character.hit_points.current.min(character.hit_points.max);
        self.record(
            GameEventKind::CharacterSynced(Box::new(CharacterSynced { character })),
            correlation_id,
            clock,
        );
        Ok(true)
    }

    /// Travels to `location`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` during an encounter.
    pub fn move_to(
        &mut self,
        location: Location,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.data()?.combat.in_combat {
            return Err(DomainError::InvalidCombatAction(
                "you cannot leave while locked in combat".into(),
            ));
        }
        self.record(
            GameEventKind::LocationChanged(LocationChanged { location }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Records a lore entry unless one with the same title exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn record_lore(
        &mut self,
        entry: LoreEntry,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<bool, DomainError> {
        if self.data()?.lore.iter().any(|e| e.title == entry.title) {
            return Ok(false);
        }
        self.record(
            GameEventKind::LoreRecorded(LoreRecorded { entry }),
            correlation_id,
            clock,
        );
        Ok(true)
    }

    /// Starts an encounter against `enemy`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` if an encounter is active.
    pub fn begin_encounter(
        &mut self,
        enemy: Combatant,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let data = self.data()?;
        if data.combat.in_combat {
            return Err(DomainError::InvalidCombatAction(
                "an encounter is already underway".into(),
            ));
        }
        let character = &data.character;
        let player = Combatant {
            name: character.name.clone(),
            initiative: 0,
            hp: character.hit_points.current,
            max_hp: character.hit_points.max,
            ac: character.armor_class,
            xp_value: 0,
            is_player: true,
        };
        let enemy = Combatant {
            is_player: false,
            ..enemy
        };
        self.record(
            GameEventKind::EncounterStarted(EncounterStarted { player, enemy }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Applies damage to the enemy; hit points clamp at zero.
    ///
    /// Returns the enemy's remaining hit points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` outside an encounter.
    pub fn damage_enemy(
        &mut self,
        amount: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        let enemy = self
            .data()?
            .combat
            .enemy()
            .ok_or_else(|| DomainError::InvalidCombatAction("there is no enemy to hit".into()))?;
        let remaining_hp = enemy.hp.saturating_sub(amount);
        self.record(
            GameEventKind::EnemyDamaged(EnemyDamaged {
                amount,
                remaining_hp,
            }),
            correlation_id,
            clock,
        );
        Ok(remaining_hp)
    }

    /// Applies damage to the player; hit points clamp at zero.
    ///
    /// Returns the player's remaining hit points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn damage_player(
        &mut self,
        amount: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        let remaining_hp = self
            .data()?
            .character
            .hit_points
            .current
            .saturating_sub(amount);
        self.record(
            GameEventKind::PlayerDamaged(PlayerDamaged {
                amount,
                remaining_hp,
            }),
            correlation_id,
            clock,
        );
        Ok(remaining_hp)
    }

    /// Restores up to `amount` hit points, capped at the maximum.
    ///
    /// Returns the hit points actually restored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn heal_player(
        &mut self,
        amount: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        let hp = self.data()?.character.hit_points;
        let current_hp = hp.current.saturating_add(amount).min(hp.max);
        let restored = current_hp - hp.current;
        self.record(
            GameEventKind::PlayerHealed(PlayerHealed {
                amount: restored,
                current_hp,
            }),
            correlation_id,
            clock,
        );
        Ok(restored)
    }

    /// Raises the one-shot guard against the next enemy attack.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` outside an encounter.
    pub fn raise_guard(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.require_combat()?;
        self.record(GameEventKind::GuardRaised, correlation_id, clock);
        Ok(())
    }

    /// Spends the guard.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` if no guard is raised.
    pub fn consume_guard(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if !self.require_combat()?.player_guarded {
            return Err(DomainError::InvalidCombatAction("no guard is raised".into()));
        }
        self.record(GameEventKind::GuardConsumed, correlation_id, clock);
        Ok(())
    }

    /// Hands the turn to the other side.
    ///
    /// Player → enemy keeps the round; enemy → player starts the next round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` outside an encounter.
    pub fn advance_turn(
        &mut self,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let combat = self.require_combat()?;
        let (current_turn, round) = if combat.current_turn == 0 {
            (1, combat.round)
        } else {
            (0, combat.round + 1)
        };
        self.record(
            GameEventKind::TurnAdvanced(TurnAdvanced {
                current_turn,
                round,
            }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Ends the active encounter.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCombatAction` outside an encounter.
    pub fn end_combat(
        &mut self,
        outcome: CombatOutcome,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_combat()?;
        self.record(
            GameEventKind::CombatEnded(CombatEnded { outcome }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    fn require_combat(&self) -> Result<&CombatState, DomainError> {
        let combat = &self.data()?.combat;
        if combat.in_combat {
            Ok(combat)
        } else {
            Err(DomainError::InvalidCombatAction("you are not in combat".into()))
        }
    }

    /// Uses one unit of the named item.
    ///
    /// Returns the item as it was before use.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if no such item is carried.
    pub fn use_item(
        &mut self,
        name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<InventoryItem, DomainError> {
        let item = self
            .data()?
            .inventory
            .iter()
            .find(|i| i.name == name && i.quantity > 0)
            .cloned()
            .ok_or_else(|| DomainError::Validation(format!("you have no {name} left")))?;
        self.record(
            GameEventKind::ItemUsed(ItemUsed {
                name: item.name.clone(),
                remaining: item.quantity - 1,
            }),
            correlation_id,
            clock,
        );
        Ok(item)
    }

    /// Adds items to the inventory, stacking with an existing entry of the
    /// same name. Returns how many are now carried.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for an empty stack.
    pub fn acquire_item(
        &mut self,
        item: InventoryItem,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        if item.quantity == 0 {
            return Err(DomainError::Validation("cannot acquire zero items".into()));
        }
        let carried = self
            .data()?
            .inventory
            .iter()
            .find(|i| i.name == item.name)
            .map_or(0, |i| i.quantity)
            .saturating_add(item.quantity);
        self.record(
            GameEventKind::ItemAcquired(ItemAcquired { item }),
            correlation_id,
            clock,
        );
        Ok(carried)
    }

    /// Adds (or, with a negative `delta`, spends) gold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when spending more than is carried.
    pub fn adjust_gold(
        &mut self,
        delta: i64,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<u32, DomainError> {
        let gold = i64::from(self.data()?.character.gold);
        let balance = u32::try_from(gold + delta)
            .map_err(|_| DomainError::Validation(format!("not enough gold: have {gold}")))?;
        self.record(
            GameEventKind::GoldChanged(GoldChanged { delta, balance }),
            correlation_id,
            clock,
        );
        Ok(balance)
    }

    fn apply_kind(&mut self, kind: &GameEventKind) {
        if let GameEventKind::SessionStarted(payload) = kind {
            self.data = Some(payload.data.clone());
            return;
        }
        let Some(data) = self.data.as_mut() else {
            return;
        };
        match kind {
            GameEventKind::SessionStarted(_) => {}
            GameEventKind::CharacterSynced(payload) => {
                data.character = payload.character.clone();
                sync_player_combatant(data);
            }
            GameEventKind::LocationChanged(payload) => {
                data.location = payload.location.clone();
            }
            GameEventKind::LoreRecorded(payload) => data.lore.push(payload.entry.clone()),
            GameEventKind::EncounterStarted(payload) => {
                data.combat = CombatState {
                    in_combat: true,
                    initiative: vec![payload.player.clone(), payload.enemy.clone()],
                    current_turn: 0,
                    round: 1,
                    player_guarded: false,
                };
            }
            GameEventKind::EnemyDamaged(payload) => {
                if let Some(enemy) = data.combat.initiative.iter_mut().find(|c| !c.is_player) {
                    enemy.hp = payload.remaining_hp;
                }
            }
            GameEventKind::PlayerDamaged(payload) => {
                data.character.hit_points.current = payload.remaining_hp;
                sync_player_combatant(data);
            }
            GameEventKind::PlayerHealed(payload) => {
                data.character.hit_points.current = payload.current_hp;
                sync_player_combatant(data);
            }
            GameEventKind::GuardRaised => data.combat.player_guarded = true,
            GameEventKind::GuardConsumed => data.combat.player_guarded = false,
            GameEventKind::TurnAdvanced(payload) => {
                data.combat.current_turn = payload.current_turn;
                data.combat.round = payload.round;
            }
            GameEventKind::CombatEnded(_) => data.combat = CombatState::default(),
            GameEventKind::ItemUsed(payload) => {
                if let Some(item) = data.inventory.iter_mut().find(|i| i.name == payload.name) {
                    item.quantity = payload.remaining;
                }
            }
            GameEventKind::ItemAcquired(payload) => {
                match data
                    .inventory
                    .iter_mut()
                    .find(|i| i.name == payload.item.name)
                {
                    Some(existing) => {
                        existing.quantity = existing.quantity.saturating_add(payload.item.quantity);
                    }
                    None => data.inventory.push(payload.item.clone()),
                }
            }
            GameEventKind::GoldChanged(payload) => data.character.gold = payload.balance,
            GameEventKind::ExperienceGained(_) | GameEventKind::LevelReached(_) => {
                super::progression::apply_progression(data, kind);
            }
            GameEventKind::QuestProposed(_)
            | GameEventKind::QuestAccepted(_)
            | GameEventKind::QuestDeclined(_)
            | GameEventKind::QuestCompleted(_)
            | GameEventKind::QuestFailed(_) => super::quest_ledger::apply_quest_event(data, kind),
        }
    }
}

fn sync_player_combatant(data: &mut GameData) {
    let hp = data.character.hit_points;
    if let Some(player) = data.combat.initiative.iter_mut().find(|c| c.is_player) {
        player.hp = hp.current;
        player.max_hp = hp.max;
    }
}

impl AggregateRoot for GameState {
    type Event = GameEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.apply_kind(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    #[allow(clippy::cast_possible_wrap)]
    fn mark_committed(&mut self) {
        self.version += self.uncommitted_events.len() as i64;
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};
    use questforge_core::aggregate::AggregateRoot;
    use questforge_core::event::DomainEvent;
    use questforge_test_support::FixedClock;

    use super::*;
    use crate::domain::events::{
        ENCOUNTER_STARTED_EVENT_TYPE, PLAYER_DAMAGED_EVENT_TYPE, SESSION_STARTED_EVENT_TYPE,
    };
    use crate::domain::model::{ItemKind, SessionInfo};

    pub(crate) fn started_state() -> GameState {
        let id = Uuid::new_v4();
        let clock = FixedClock::standard();
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id,
                started_at: clock.0,
                scenario_title: "The Lost Heir".to_owned(),
            },
        );
        let mut state = GameState::start(id, data, Uuid::new_v4(), &clock);
        state.mark_committed();
        state
    }

    pub(crate) fn goblin() -> Combatant {
        Combatant {
            name: "Goblin".to_owned(),
            initiative: 0,
            hp: 7,
            max_hp: 7,
            ac: 15,
            xp_value: 50,
            is_player: false,
        }
    }

    #[test]
    fn test_start_produces_session_started_event() {
        // Arrange
        let id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id,
                started_at: clock.0,
                scenario_title: "Test".to_owned(),
            },
        );

        // Act
        let state = GameState::start(id, data, correlation_id, &clock);

        // Assert
        let events = state.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), SESSION_STARTED_EVENT_TYPE);
        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
        assert!(state.is_started());
        assert_eq!(state.version(), 0);
    }

    #[test]
    fn test_sequence_numbers_continue_after_commit() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();
        state.damage_player(3, Uuid::new_v4(), &clock).unwrap();

        let events = state.uncommitted_events();
        assert_eq!(events[0].event_type(), ENCOUNTER_STARTED_EVENT_TYPE);
        assert_eq!(events[0].metadata().sequence_number, 2);
        assert_eq!(events[1].event_type(), PLAYER_DAMAGED_EVENT_TYPE);
        assert_eq!(events[1].metadata().sequence_number, 3);

        state.mark_committed();
        assert_eq!(state.version(), 3);
        assert!(state.uncommitted_events().is_empty());
    }

    #[test]
    fn test_encounter_initializes_combat_counters() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();

        let combat = &state.data().unwrap().combat;
        assert!(combat.in_combat);
        assert_eq!(combat.round, 1);
        assert_eq!(combat.current_turn, 0);
        assert_eq!(combat.initiative.len(), 2);
        assert!(combat.initiative[0].is_player);
        assert_eq!(combat.enemy().unwrap().name, "Goblin");
    }

    #[test]
    fn test_second_encounter_is_rejected_without_mutation() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();
        let before = state.data().unwrap().clone();

        let result = state.begin_encounter(goblin(), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
        assert_eq!(state.data().unwrap(), &before);
        assert_eq!(state.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_turns_alternate_and_round_advances_after_enemy() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();

        state.advance_turn(Uuid::new_v4(), &clock).unwrap();
        let combat = &state.data().unwrap().combat;
        assert_eq!((combat.current_turn, combat.round), (1, 1));

        state.advance_turn(Uuid::new_v4(), &clock).unwrap();
        let combat = &state.data().unwrap().combat;
        assert_eq!((combat.current_turn, combat.round), (0, 2));
    }

    #[test]
    fn test_end_combat_resets_combat_state() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();
        state.raise_guard(Uuid::new_v4(), &clock).unwrap();

        state
            .end_combat(CombatOutcome::Victory, Uuid::new_v4(), &clock)
            .unwrap();

        assert_eq!(state.data().unwrap().combat, CombatState::default());
    }

    #[test]
    fn test_damage_and_healing_clamp() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        assert_eq!(state.damage_player(5, Uuid::new_v4(), &clock).unwrap(), 7);
        assert_eq!(state.heal_player(50, Uuid::new_v4(), &clock).unwrap(), 5);
        assert_eq!(state.damage_player(99, Uuid::new_v4(), &clock).unwrap(), 0);
        assert_eq!(state.data().unwrap().character.hit_points.current, 0);
    }

    #[test]
    fn test_combat_only_transitions_fail_when_idle() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        assert!(state.advance_turn(Uuid::new_v4(), &clock).is_err());
        assert!(state.raise_guard(Uuid::new_v4(), &clock).is_err());
        assert!(state.damage_enemy(3, Uuid::new_v4(), &clock).is_err());
        assert!(state.uncommitted_events().is_empty());
    }

    #[test]
    fn test_move_is_rejected_in_combat() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        state.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();

        let result = state.move_to(Location::default(), Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
    }

    #[test]
    fn test_use_item_decrements_quantity() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        let used = state.use_item("Health Potion", Uuid::new_v4(), &clock).unwrap();

        assert_eq!(used.quantity, 2);
        let potion = state
            .data()
            .unwrap()
            .inventory
            .iter()
            .find(|i| i.name == "Health Potion")
            .unwrap();
        assert_eq!(potion.quantity, 1);
    }

    #[test]
    fn test_acquire_item_stacks_by_name() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        let carried = state
            .acquire_item(
                InventoryItem::new("Torch", 2, "Burns for an hour.", ItemKind::Tool),
                Uuid::new_v4(),
                &clock,
            )
            .unwrap();

        let torches = state
            .data()
            .unwrap()
            .inventory
            .iter()
            .filter(|i| i.name == "Torch")
            .map(|i| i.quantity)
            .collect::<Vec<_>>();
        assert_eq!(torches, vec![5]);
        assert_eq!(carried, 5);
    }

    #[test]
    fn test_gold_cannot_go_negative() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        let result = state.adjust_gold(-100, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(state.data().unwrap().character.gold, 15);
    }

    #[test]
    fn test_sync_character_skips_identical_sheet() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let same = state.data().unwrap().character.clone();

        assert!(!state.sync_character(same.clone(), Uuid::new_v4(), &clock).unwrap());

        let renamed = Character {
            name: "Brynn".to_owned(),
            ..same
        };
        assert!(state.sync_character(renamed, Uuid::new_v4(), &clock).unwrap());
        assert_eq!(state.data().unwrap().character.name, "Brynn");
    }

    #[test]
    fn test_replaying_events_reproduces_state() {
        let clock = FixedClock::standard();
        let id = Uuid::new_v4();
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id,
                started_at: clock.0,
                scenario_title: "Replay".to_owned(),
            },
        );
        let mut live = GameState::start(id, data, Uuid::new_v4(), &clock);
        live.begin_encounter(goblin(), Uuid::new_v4(), &clock).unwrap();
        live.damage_enemy(4, Uuid::new_v4(), &clock).unwrap();
        live.advance_turn(Uuid::new_v4(), &clock).unwrap();
        live.use_item("Rations", Uuid::new_v4(), &clock).unwrap();

        let mut replayed = GameState::new(id);
        for event in live.uncommitted_events() {
            replayed.apply(event);
        }

        assert_eq!(replayed.data().unwrap(), live.data().unwrap());
        assert_eq!(replayed.version(), 5);
    }

    #[test]
    fn test_data_before_start_is_not_found() {
        let state = GameState::new(Uuid::new_v4());
        assert!(matches!(state.data(), Err(DomainError::AggregateNotFound(_))));
    }
}
