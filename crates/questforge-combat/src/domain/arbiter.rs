//! Combat arbiter.
//!
//! Resolves one combat action against a [`GameState`]: rolls the dice,
//! applies the transitions and reports what happened as a narrative plus a
//! list of [`CombatEffect`]s. The player acts while `current_turn` is 0 and
//! the enemy while it is 1. An action in the wrong phase fails with
//! `DomainError::InvalidCombatAction` before any dice are rolled, leaving the
//! state untouched.

use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use questforge_core::rng::DeterministicRng;
use questforge_rules::domain::dice::{DiceExpression, DiceOutcome};
use questforge_world_state::domain::aggregates::GameState;
use questforge_world_state::domain::model::{CombatOutcome, InventoryItem, ItemKind};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::bestiary::{self, EnemyTemplate};

/// d20 total needed to land a weapon attack.
pub const ATTACK_DC: i32 = 15;
/// d20 total needed to land a spell.
pub const SPELL_DC: i32 = 15;
/// d20 total needed to dodge or hide.
pub const DEFENSE_DC: i32 = 12;
/// d20 total the enemy needs to hit the player.
pub const ENEMY_HIT_DC: i32 = 12;

/// Damage of a weapon hit.
pub const WEAPON_DAMAGE: DiceExpression = DiceExpression::new(1, 8, 1);
/// Damage of an offensive spell.
pub const SPELL_DAMAGE: DiceExpression = DiceExpression::new(1, 6, 0);
/// Extra damage of a sneak attack hit.
pub const SNEAK_ATTACK_BONUS: DiceExpression = DiceExpression::new(1, 6, 0);
/// Damage of an enemy hit.
pub const ENEMY_DAMAGE: DiceExpression = DiceExpression::new(1, 6, 0);
/// Hit points restored by a healing consumable.
pub const HEALING: DiceExpression = DiceExpression::new(2, 4, 2);

/// Who took damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Player,
    Enemy,
}

/// One observable consequence of a combat action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CombatEffect {
    EnemySpawned {
        template: EnemyTemplate,
    },
    #[serde(rename_all = "camelCase")]
    DiceRolled {
        purpose: &'static str,
        outcome: DiceOutcome,
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
    ItemUsed {
        name: String,
        remaining: u32,
    },
    GuardRaised,
    #[serde(rename_all = "camelCase")]
    CombatEnded {
        outcome: CombatOutcome,
        xp_value: u32,
    },
}

/// The narrative and effects of one resolved action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub narrative: String,
    pub effects: Vec<CombatEffect>,
}

impl CombatReport {
    /// Every dice outcome, in roll order.
    pub fn rolls(&self) -> impl Iterator<Item = &DiceOutcome> {
        self.effects.iter().filter_map(|effect| match effect {
            CombatEffect::DiceRolled { outcome, .. } => Some(outcome),
            _ => None,
        })
    }

    /// How the encounter ended, if it did.
    #[must_use]
    pub fn outcome(&self) -> Option<(CombatOutcome, u32)> {
        self.effects.iter().find_map(|effect| match effect {
            CombatEffect::CombatEnded { outcome, xp_value } => Some((*outcome, *xp_value)),
            _ => None,
        })
    }

    /// The spawned enemy, if this action started an encounter.
    #[must_use]
    pub fn spawned(&self) -> Option<&EnemyTemplate> {
        self.effects.iter().find_map(|effect| match effect {
            CombatEffect::EnemySpawned { template } => Some(template),
            _ => None,
        })
    }

    fn say(&mut self, sentence: &str) {
        if !self.narrative.is_empty() {
            self.narrative.push(' ');
        }
        self.narrative.push_str(sentence);
    }

    fn roll(
        &mut self,
        purpose: &'static str,
        expression: DiceExpression,
        rng: &mut dyn DeterministicRng,
    ) -> Result<DiceOutcome, DomainError> {
        let outcome = expression.roll(rng)?;
        self.effects.push(CombatEffect::DiceRolled {
            purpose,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }
}

/// Starts an encounter. A recognized `hint` picks that enemy; otherwise one
/// is drawn at random.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` if an encounter is active.
pub fn start_encounter(
    state: &mut GameState,
    hint: Option<&str>,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    if state.data()?.combat.in_combat {
        return Err(DomainError::InvalidCombatAction(
            "You are already in combat!".into(),
        ));
    }
    let template = bestiary::choose(hint, rng);
    state.begin_encounter(template.to_combatant(), correlation_id, clock)?;
    debug!(enemy = template.name, "encounter started");

    let mut report = CombatReport::default();
    report.effects.push(CombatEffect::EnemySpawned {
        template: *template,
    });
    report.say(&format!(
        "A {} appears! {} (HP {}, AC {})",
        template.name, template.description, template.hp, template.ac
    ));
    Ok(report)
}

/// A weapon attack: d20 ≥ 15 hits for 1d8+1.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` outside the player's turn.
pub fn player_attack(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    require_player_turn(state)?;
    let weapon = weapon_name(state)?;
    let strike = Strike {
        action: format!("swing your {weapon}"),
        dc: ATTACK_DC,
        damage: &[("damage", WEAPON_DAMAGE)],
    };
    resolve_strike(state, &strike, rng, correlation_id, clock)
}

/// An offensive spell: d20 ≥ 15 hits for 1d6.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` outside the player's turn.
pub fn cast_spell(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    require_player_turn(state)?;
    let spell = state
        .data()?
        .character
        .spells
        .first()
        .cloned()
        .unwrap_or_else(|| "a crackling bolt of arcane energy".to_owned());
    let strike = Strike {
        action: format!("cast {spell}"),
        dc: SPELL_DC,
        damage: &[("spell damage", SPELL_DAMAGE)],
    };
    resolve_strike(state, &strike, rng, correlation_id, clock)
}

/// A sneak attack: a weapon attack adding 1d6 on a hit.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` outside the player's turn.
pub fn sneak_attack(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    require_player_turn(state)?;
    let weapon = weapon_name(state)?;
    let strike = Strike {
        action: format!("slip into the enemy's blind spot and drive in your {weapon}"),
        dc: ATTACK_DC,
        damage: &[
            ("damage", WEAPON_DAMAGE),
            ("sneak attack damage", SNEAK_ATTACK_BONUS),
        ],
    };
    resolve_strike(state, &strike, rng, correlation_id, clock)
}

/// Dodge: d20 ≥ 12 raises a guard; the next enemy attack misses.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` outside the player's turn.
pub fn dodge(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    defend(
        state,
        Defense {
            success: "You read the enemy's stance and ready yourself to dodge.",
            failure: "You try to find your footing, but you are caught flat-footed.",
        },
        rng,
        correlation_id,
        clock,
    )
}

/// Hide: d20 ≥ 12 raises a guard, like a dodge.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` outside the player's turn.
pub fn hide(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    defend(
        state,
        Defense {
            success: "You duck behind cover and vanish from the enemy's sight.",
            failure: "You scramble for cover, but there is nowhere to hide.",
        },
        rng,
        correlation_id,
        clock,
    )
}

/// The enemy's attack. A raised guard makes it miss without a roll;
/// otherwise d20 ≥ 12 hits for 1d6.
///
/// # Errors
///
/// Returns `DomainError::InvalidCombatAction` unless it is the enemy's turn.
pub fn enemy_turn(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    let combat = &state.data()?.combat;
    if !combat.in_combat {
        return Err(DomainError::InvalidCombatAction("There is no enemy here.".into()));
    }
    if combat.current_turn != 1 {
        return Err(DomainError::InvalidCombatAction(
            "The enemy is waiting for you to act.".into(),
        ));
    }
    let guarded = combat.player_guarded;
    let enemy = enemy_name(state)?;
    let mut report = CombatReport::default();

    if guarded {
        state.consume_guard(correlation_id, clock)?;
        report.say(&format!(
            "The {enemy} lunges at you, but you slip aside and the attack misses."
        ));
    } else {
        let attack = report.roll("enemy attack", DiceExpression::D20, rng)?;
        if attack.total >= ENEMY_HIT_DC {
            let damage = report.roll("enemy damage", ENEMY_DAMAGE, rng)?.amount();
            let remaining_hp = state.damage_player(damage, correlation_id, clock)?;
            report.effects.push(CombatEffect::DamageDealt {
                target: Target::Player,
                amount: damage,
                remaining_hp,
            });
            report.say(&format!(
                "The {enemy} strikes you (rolled {}) for {damage} damage.",
                attack.total
            ));
            if remaining_hp == 0 {
                state.end_combat(CombatOutcome::Defeat, correlation_id, clock)?;
                report.effects.push(CombatEffect::CombatEnded {
                    outcome: CombatOutcome::Defeat,
                    xp_value: 0,
                });
                report.say("You collapse, your vision fading to black. You have been defeated.");
                return Ok(report);
            }
            let max = state.data()?.character.hit_points.max;
            report.say(&format!("You have {remaining_hp}/{max} HP."));
        } else {
            report.say(&format!(
                "The {enemy} attacks but misses (rolled {}, needed {ENEMY_HIT_DC}).",
                attack.total
            ));
        }
    }

    state.advance_turn(correlation_id, clock)?;
    Ok(report)
}

/// Uses an item matching `hint`, else the first carried consumable. Healing
/// consumables restore 2d4+2 hit points, capped at the maximum. In combat
/// this takes the player's turn.
///
/// # Errors
///
/// Returns `DomainError::Validation` if nothing usable is carried, or
/// `DomainError::InvalidCombatAction` during the enemy's turn.
pub fn use_item(
    state: &mut GameState,
    hint: Option<&str>,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    let in_combat = state.data()?.combat.in_combat;
    if in_combat {
        require_player_turn(state)?;
    }
    let item = find_item(&state.data()?.inventory, hint)
        .cloned()
        .ok_or_else(|| {
            DomainError::Validation("You search your pack but find nothing you can use.".into())
        })?;

    let used = state.use_item(&item.name, correlation_id, clock)?;
    let mut report = CombatReport::default();
    report.effects.push(CombatEffect::ItemUsed {
        name: used.name.clone(),
        remaining: used.quantity - 1,
    });

    if used.is_healing() {
        let amount = report.roll("healing", HEALING, rng)?.amount();
        let healed = state.heal_player(amount, correlation_id, clock)?;
        let hp = state.data()?.character.hit_points;
        report.effects.push(CombatEffect::Healed {
            amount: healed,
            current_hp: hp.current,
        });
        report.say(&format!(
            "You use the {} and recover {healed} HP ({}/{}).",
            used.name, hp.current, hp.max
        ));
    } else {
        report.say(&format!("You use the {}.", used.name));
    }

    if in_combat {
        state.advance_turn(correlation_id, clock)?;
    }
    Ok(report)
}

struct Strike {
    action: String,
    dc: i32,
    damage: &'static [(&'static str, DiceExpression)],
}

struct Defense {
    success: &'static str,
    failure: &'static str,
}

fn resolve_strike(
    state: &mut GameState,
    strike: &Strike,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    let enemy = enemy_name(state)?;
    let mut report = CombatReport::default();
    let attack = report.roll("attack", DiceExpression::D20, rng)?;

    if attack.total >= strike.dc {
        let mut damage = 0;
        for &(purpose, expression) in strike.damage {
            damage += report.roll(purpose, expression, rng)?.amount();
        }
        let remaining_hp = state.damage_enemy(damage, correlation_id, clock)?;
        report.effects.push(CombatEffect::DamageDealt {
            target: Target::Enemy,
            amount: damage,
            remaining_hp,
        });
        report.say(&format!(
            "You {} and hit the {enemy} (rolled {}) for {damage} damage.",
            strike.action, attack.total
        ));
        if remaining_hp == 0 {
            let xp_value = state
                .data()?
                .combat
                .enemy()
                .map_or(0, |e| e.xp_value);
            state.end_combat(CombatOutcome::Victory, correlation_id, clock)?;
            report.effects.push(CombatEffect::CombatEnded {
                outcome: CombatOutcome::Victory,
                xp_value,
            });
            report.say(&format!("The {enemy} falls! Victory is yours."));
            return Ok(report);
        }
        report.say(&format!("The {enemy} has {remaining_hp} HP left."));
    } else {
        report.say(&format!(
            "You {} at the {enemy} but miss (rolled {} against {}).",
            strike.action, attack.total, strike.dc
        ));
    }

    state.advance_turn(correlation_id, clock)?;
    Ok(report)
}

fn defend(
    state: &mut GameState,
    defense: Defense,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<CombatReport, DomainError> {
    require_player_turn(state)?;
    let mut report = CombatReport::default();
    let check = report.roll("defense", DiceExpression::D20, rng)?;

    if check.total >= DEFENSE_DC {
        state.raise_guard(correlation_id, clock)?;
        report.effects.push(CombatEffect::GuardRaised);
        report.say(defense.success);
    } else {
        report.say(defense.failure);
    }

    state.advance_turn(correlation_id, clock)?;
    Ok(report)
}

fn require_player_turn(state: &GameState) -> Result<(), DomainError> {
    let combat = &state.data()?.combat;
    if !combat.in_combat {
        return Err(DomainError::InvalidCombatAction(
            "You are not in combat. Look for trouble first.".into(),
        ));
    }
    if combat.current_turn != 0 {
        return Err(DomainError::InvalidCombatAction(
            "It is the enemy's turn.".into(),
        ));
    }
    Ok(())
}

fn enemy_name(state: &GameState) -> Result<String, DomainError> {
    state
        .data()?
        .combat
        .enemy()
        .map(|e| e.name.clone())
        .ok_or_else(|| DomainError::InvalidCombatAction("There is no enemy here.".into()))
}

fn weapon_name(state: &GameState) -> Result<String, DomainError> {
    Ok(state
        .data()?
        .equipment
        .weapon
        .clone()
        .unwrap_or_else(|| "fists".to_owned()))
}

fn find_item<'a>(inventory: &'a [InventoryItem], hint: Option<&str>) -> Option<&'a InventoryItem> {
    let carried = || inventory.iter().filter(|i| i.quantity > 0);
    let by_hint = hint.map(str::to_lowercase).and_then(|hint| {
        carried().find(|item| {
            let name = item.name.to_lowercase();
            name.contains(&hint)
                || hint.contains(&name)
                || hint
                    .split_whitespace()
                    .filter(|w| w.len() > 2)
                    .any(|w| name.split_whitespace().any(|n| n == w))
        })
    });
    by_hint.or_else(|| carried().find(|i| i.kind == ItemKind::Consumable))
}

#[cfg(test)]
mod tests {
    use questforge_test_support::{FixedClock, MockRng, SequenceRng};
    use questforge_world_state::domain::model::{Character, GameData, SessionInfo};

    use super::*;

    fn new_state() -> GameState {
        let clock = FixedClock::standard();
        let id = Uuid::new_v4();
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id,
                started_at: clock.0,
                scenario_title: "Test".to_owned(),
            },
        );
        GameState::start(id, data, Uuid::new_v4(), &clock)
    }

    fn fighting(hint: &str) -> GameState {
        let mut state = new_state();
        start_encounter(
            &mut state,
            Some(hint),
            &mut MockRng,
            Uuid::new_v4(),
            &FixedClock::standard(),
        )
        .unwrap();
        state
    }

    fn enemy_hp(state: &GameState) -> u32 {
        state.data().unwrap().combat.enemy().unwrap().hp
    }

    #[test]
    fn test_start_encounter_spawns_named_worg() {
        let mut state = new_state();

        let report = start_encounter(
            &mut state,
            Some("worg"),
            &mut SequenceRng::new(vec![]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        )
        .unwrap();

        let spawned = report.spawned().unwrap();
        assert_eq!((spawned.hp, spawned.ac, spawned.damage), (26, 13, "2d6+3"));
        let combat = &state.data().unwrap().combat;
        assert!(combat.in_combat);
        assert_eq!(combat.round, 1);
        assert_eq!(combat.initiative.len(), 2);
        assert!(report.narrative.contains("Worg"));
    }

    #[test]
    fn test_start_encounter_rejected_while_fighting() {
        let mut state = fighting("goblin");
        let before = state.data().unwrap().clone();

        let result = start_encounter(
            &mut state,
            None,
            &mut SequenceRng::new(vec![]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        );

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
        assert_eq!(state.data().unwrap(), &before);
    }

    #[test]
    fn test_attack_hit_applies_weapon_damage_and_passes_turn() {
        let mut state = fighting("worg");
        let mut rng = SequenceRng::new(vec![15, 5]);

        let report =
            player_attack(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        assert_eq!(enemy_hp(&state), 20);
        assert_eq!(report.rolls().count(), 2);
        assert_eq!(state.data().unwrap().combat.current_turn, 1);
        assert!(report.narrative.contains("for 6 damage"));
    }

    #[test]
    fn test_attack_miss_applies_no_damage() {
        let mut state = fighting("worg");
        let mut rng = SequenceRng::new(vec![14]);

        let report =
            player_attack(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        assert_eq!(enemy_hp(&state), 26);
        assert!(report.narrative.contains("miss"));
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn test_victory_exactly_when_enemy_reaches_zero() {
        let mut state = fighting("goblin");
        let mut rng = SequenceRng::new(vec![20, 6]);

        let report =
            player_attack(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        assert_eq!(report.outcome(), Some((CombatOutcome::Victory, 50)));
        let combat = &state.data().unwrap().combat;
        assert!(!combat.in_combat);
        assert!(combat.initiative.is_empty());
        assert_eq!((combat.round, combat.current_turn), (0, 0));
    }

    #[test]
    fn test_one_hp_left_is_not_victory() {
        let mut state = fighting("goblin");
        let mut rng = SequenceRng::new(vec![20, 5]);

        let report =
            player_attack(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        assert_eq!(report.outcome(), None);
        assert_eq!(enemy_hp(&state), 1);
    }

    #[test]
    fn test_cast_spell_rolls_one_d20_then_one_d6() {
        let mut state = fighting("orc");
        let mut rng = SequenceRng::new(vec![15, 4]);

        let report =
            cast_spell(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        let rolls: Vec<_> = report.rolls().map(|o| o.expression).collect();
        assert_eq!(rolls, vec![DiceExpression::D20, SPELL_DAMAGE]);
        assert_eq!(enemy_hp(&state), 11);
    }

    #[test]
    fn test_sneak_attack_adds_bonus_die() {
        let mut state = fighting("worg");
        let mut rng = SequenceRng::new(vec![16, 3, 4]);

        sneak_attack(&mut state, &mut rng, Uuid::new_v4(), &FixedClock::standard()).unwrap();

        assert_eq!(enemy_hp(&state), 26 - (3 + 1 + 4));
    }

    #[test]
    fn test_player_action_on_enemy_turn_is_rejected() {
        let mut state = fighting("worg");
        let clock = FixedClock::standard();
        player_attack(&mut state, &mut SequenceRng::new(vec![1]), Uuid::new_v4(), &clock).unwrap();
        let before = state.data().unwrap().clone();
        let mut rng = SequenceRng::new(vec![]);

        let result = player_attack(&mut state, &mut rng, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
        assert_eq!(state.data().unwrap(), &before);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_attack_out_of_combat_is_rejected() {
        let mut state = new_state();

        let result = player_attack(
            &mut state,
            &mut SequenceRng::new(vec![]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        );

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
    }

    #[test]
    fn test_enemy_hit_damages_player_and_starts_next_round() {
        let mut state = fighting("worg");
        let clock = FixedClock::standard();
        player_attack(&mut state, &mut SequenceRng::new(vec![1]), Uuid::new_v4(), &clock).unwrap();

        let report =
            enemy_turn(&mut state, &mut SequenceRng::new(vec![12, 4]), Uuid::new_v4(), &clock)
                .unwrap();

        let data = state.data().unwrap();
        assert_eq!(data.character.hit_points.current, 8);
        assert_eq!((data.combat.current_turn, data.combat.round), (0, 2));
        assert!(report.narrative.contains("8/12 HP"));
    }

    #[test]
    fn test_enemy_miss_reports_roll_against_hit_dc() {
        let mut state = fighting("worg");
        let clock = FixedClock::standard();
        player_attack(&mut state, &mut SequenceRng::new(vec![1]), Uuid::new_v4(), &clock).unwrap();

        let report =
            enemy_turn(&mut state, &mut SequenceRng::new(vec![11]), Uuid::new_v4(), &clock)
                .unwrap();

        assert_eq!(report.narrative, "The Worg attacks but misses (rolled 11, needed 12).");
        assert!(!report.narrative.contains("guard"));
        assert_eq!(state.data().unwrap().character.hit_points.current, 12);
    }

    #[test]
    fn test_enemy_turn_out_of_phase_is_rejected() {
        let mut state = fighting("worg");

        let result = enemy_turn(
            &mut state,
            &mut SequenceRng::new(vec![]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        );

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
    }

    #[test]
    fn test_successful_dodge_makes_next_enemy_attack_miss_without_roll() {
        let mut state = fighting("worg");
        let clock = FixedClock::standard();
        let report =
            dodge(&mut state, &mut SequenceRng::new(vec![12]), Uuid::new_v4(), &clock).unwrap();
        assert!(report.effects.contains(&CombatEffect::GuardRaised));

        let mut rng = SequenceRng::new(vec![]);
        let report = enemy_turn(&mut state, &mut rng, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(rng.consumed(), 0);
        assert!(report.narrative.contains("misses"));
        let data = state.data().unwrap();
        assert_eq!(data.character.hit_points.current, 12);
        assert!(!data.combat.player_guarded);
    }

    #[test]
    fn test_failed_hide_raises_no_guard() {
        let mut state = fighting("worg");

        hide(
            &mut state,
            &mut SequenceRng::new(vec![11]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        )
        .unwrap();

        assert!(!state.data().unwrap().combat.player_guarded);
    }

    #[test]
    fn test_defeat_exactly_when_player_reaches_zero() {
        let mut state = fighting("troll");
        let clock = FixedClock::standard();
        state.damage_player(8, Uuid::new_v4(), &clock).unwrap();
        player_attack(&mut state, &mut SequenceRng::new(vec![1]), Uuid::new_v4(), &clock).unwrap();

        let report =
            enemy_turn(&mut state, &mut SequenceRng::new(vec![19, 4]), Uuid::new_v4(), &clock)
                .unwrap();

        assert_eq!(report.outcome(), Some((CombatOutcome::Defeat, 0)));
        let data = state.data().unwrap();
        assert_eq!(data.character.hit_points.current, 0);
        assert!(!data.combat.in_combat);
    }

    #[test]
    fn test_potion_heals_capped_and_decrements() {
        let mut state = fighting("worg");
        let clock = FixedClock::standard();
        state.damage_player(3, Uuid::new_v4(), &clock).unwrap();

        let report = use_item(
            &mut state,
            Some("healing potion"),
            &mut SequenceRng::new(vec![4, 4]),
            Uuid::new_v4(),
            &clock,
        )
        .unwrap();

        let data = state.data().unwrap();
        assert_eq!(data.character.hit_points.current, 12);
        assert!(report.effects.contains(&CombatEffect::Healed {
            amount: 3,
            current_hp: 12
        }));
        assert!(report.effects.contains(&CombatEffect::ItemUsed {
            name: "Health Potion".to_owned(),
            remaining: 1
        }));
        assert_eq!(data.combat.current_turn, 1);
    }

    #[test]
    fn test_use_item_without_hint_takes_first_consumable_outside_combat() {
        let mut state = new_state();

        let report = use_item(
            &mut state,
            None,
            &mut SequenceRng::new(vec![1, 1]),
            Uuid::new_v4(),
            &FixedClock::standard(),
        )
        .unwrap();

        assert!(report.narrative.contains("Health Potion"));
        assert!(!state.data().unwrap().combat.in_combat);
    }

    #[test]
    fn test_use_item_with_nothing_left_is_validation_error() {
        let mut state = new_state();
        let clock = FixedClock::standard();
        for _ in 0..2 {
            state.use_item("Health Potion", Uuid::new_v4(), &clock).unwrap();
        }
        for _ in 0..5 {
            state.use_item("Rations", Uuid::new_v4(), &clock).unwrap();
        }

        let result = use_item(&mut state, Some("potion"), &mut MockRng, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_effects_serialize_with_type_tag() {
        let effect = CombatEffect::DamageDealt {
            target: Target::Enemy,
            amount: 4,
            remaining_hp: 3,
        };

        let json = serde_json::to_value(&effect).unwrap();

        assert_eq!(json["type"], "damageDealt");
        assert_eq!(json["remainingHp"], 3);
        assert_eq!(json["target"], "enemy");
    }
}
