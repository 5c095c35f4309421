//! Routes a classified action to the component that resolves it.
//!
//! Runs synchronously against an already-loaded [`GameState`]; the caller
//! holds the session lock and the RNG lock for the duration.

use questforge_combat::domain::arbiter::{self, CombatReport};
use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use questforge_core::rng::DeterministicRng;
use questforge_narrative::domain::{atlas, fallback, quest_board, templates};
use questforge_rules::domain::dice::DiceExpression;
use questforge_rules::domain::intent::{Action, Skill};
use questforge_world_state::domain::aggregates::GameState;
use questforge_world_state::domain::model::{CombatOutcome, InventoryItem};
use questforge_world_state::domain::progression::Progress;
use uuid::Uuid;

use crate::domain::config::TurnConfig;
use crate::domain::turn::{QuestUpdate, TurnEvent};

/// Difficulty class of every skill check.
pub const SKILL_CHECK_DC: i32 = 12;

/// Narrative and events produced by resolving one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub narrative: String,
    pub events: Vec<TurnEvent>,
}

impl Resolution {
    /// A resolution that only narrates.
    #[must_use]
    pub fn narrate(text: impl Into<String>) -> Self {
        Self {
            narrative: text.into(),
            events: Vec::new(),
        }
    }

    /// A refused action: the reason is both the narrative and the event.
    #[must_use]
    pub fn rejected(reason: &str) -> Self {
        Self {
            narrative: reason.to_owned(),
            events: vec![TurnEvent::ActionRejected {
                reason: reason.to_owned(),
            }],
        }
    }

    fn say(&mut self, text: &str) {
        if !self.narrative.is_empty() {
            self.narrative.push(' ');
        }
        self.narrative.push_str(text);
    }

    fn absorb(&mut self, report: &CombatReport) {
        self.say(&report.narrative);
        self.events.extend(report.effects.iter().map(TurnEvent::from));
    }

    fn reward(&mut self, progress: &Progress) {
        self.events.push(TurnEvent::ExperienceGained {
            amount: progress.gained,
            total: progress.total,
        });
        self.say(&format!("You gain {} experience.", progress.gained));
        for &level in &progress.levels_reached {
            self.events.push(TurnEvent::LevelReached { level });
            self.say(&format!("You have reached level {level}!"));
        }
    }
}

/// Resolves `action` against `state`.
///
/// # Errors
///
/// Returns the player-facing errors `Validation`, `QuestState` and
/// `InvalidCombatAction` for refused actions; the caller restores the state.
/// Other errors are failures of the turn itself.
pub fn resolve(
    state: &mut GameState,
    action: &Action,
    utterance: &str,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
    config: &TurnConfig,
) -> Result<Resolution, DomainError> {
    match action {
        Action::Look => Ok(Resolution::narrate(fallback::look(&state.data()?.location))),
        Action::Talk => Ok(Resolution::narrate(fallback::talk(
            &state.data()?.location,
            rng,
        ))),
        Action::Help => Ok(Resolution::narrate(fallback::HELP_TEXT)),
        Action::Unknown => Ok(Resolution::narrate(fallback::UNKNOWN_TEXT)),
        Action::Move => travel(state, utterance, rng, correlation_id, clock),
        Action::AskAboutQuest => ask_about_quest(state, rng, correlation_id, clock),
        Action::AcceptQuest => accept_offer(state, correlation_id, clock),
        Action::DeclineQuest => decline_offer(state, correlation_id, clock),
        Action::QuestComplete => complete_focused_quest(state, correlation_id, clock),
        Action::SkillCheck { skill } => skill_check(state, *skill, rng),
        Action::TriggerEncounter { enemy_hint } => {
            let report = arbiter::start_encounter(
                state,
                enemy_hint.as_deref(),
                rng,
                correlation_id,
                clock,
            )?;
            let mut resolution = Resolution::default();
            match (enemy_hint, report.spawned()) {
                (None, Some(enemy)) => {
                    resolution.say(&templates::generate_random_encounter(
                        &state.data()?.location.name,
                        enemy.name,
                        enemy.description,
                    ));
                    resolution
                        .events
                        .extend(report.effects.iter().map(TurnEvent::from));
                }
                _ => resolution.absorb(&report),
            }
            Ok(resolution)
        }
        Action::PerformAttack
        | Action::CastSpell
        | Action::SneakAttack
        | Action::Dodge
        | Action::Hide
        | Action::UseItem { .. }
        | Action::EnemyTurn => {
            let report = match action {
                Action::PerformAttack => {
                    arbiter::player_attack(state, rng, correlation_id, clock)?
                }
                Action::CastSpell => arbiter::cast_spell(state, rng, correlation_id, clock)?,
                Action::SneakAttack => arbiter::sneak_attack(state, rng, correlation_id, clock)?,
                Action::Dodge => arbiter::dodge(state, rng, correlation_id, clock)?,
                Action::Hide => arbiter::hide(state, rng, correlation_id, clock)?,
                Action::UseItem { item_hint } => {
                    arbiter::use_item(state, item_hint.as_deref(), rng, correlation_id, clock)?
                }
                _ => arbiter::enemy_turn(state, rng, correlation_id, clock)?,
            };
            combat_follow_up(state, &report, rng, correlation_id, clock, config)
        }
    }
}

/// Absorbs a combat report, grants victory experience and loot, then lets
/// the enemy act if it is now their turn and enemy turns run automatically.
fn combat_follow_up(
    state: &mut GameState,
    report: &CombatReport,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
    config: &TurnConfig,
) -> Result<Resolution, DomainError> {
    let mut resolution = Resolution::default();
    resolution.absorb(report);

    if let Some((CombatOutcome::Victory, xp_value)) = report.outcome() {
        let progress = state.grant_experience(xp_value, correlation_id, clock)?;
        resolution.reward(&progress);
        let loot = InventoryItem::health_potion(1);
        let name = loot.name.clone();
        let quantity = state.acquire_item(loot, correlation_id, clock)?;
        resolution.say(&format!("Among the remains you find a {name}."));
        resolution.events.push(TurnEvent::ItemAcquired { name, quantity });
        return Ok(resolution);
    }

    let combat = &state.data()?.combat;
    if config.auto_enemy_turn && combat.in_combat && combat.current_turn == 1 {
        let reply = arbiter::enemy_turn(state, rng, correlation_id, clock)?;
        resolution.absorb(&reply);
    }
    Ok(resolution)
}

fn travel(
    state: &mut GameState,
    utterance: &str,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<Resolution, DomainError> {
    let data = state.data()?;
    if data.combat.in_combat {
        return Err(DomainError::InvalidCombatAction(
            "You cannot leave while an enemy stands before you.".into(),
        ));
    }
    let destination = atlas::destination(&data.location, utterance, rng)
        .ok_or_else(|| DomainError::Validation("There is nowhere to go from here.".into()))?;

    let mut resolution = Resolution::narrate(fallback::arrive(&destination));
    resolution.events.push(TurnEvent::LocationChanged {
        name: destination.name.clone(),
    });
    state.move_to(destination, correlation_id, clock)?;
    Ok(resolution)
}

fn ask_about_quest(
    state: &mut GameState,
    rng: &mut dyn DeterministicRng,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<Resolution, DomainError> {
    let data = state.data()?;
    if let Some(waiting) = data.quests.pending.last() {
        return Ok(Resolution::narrate(quest_board::describe_offer(waiting)));
    }
    let Some(quest) = quest_board::offer(
        &data.quests,
        &data.session.scenario_title,
        rng,
        clock.now(),
    ) else {
        return Ok(Resolution::narrate(
            "No one has any work for you right now. Check back later.",
        ));
    };

    let mut resolution = Resolution::narrate(quest_board::describe_offer(&quest));
    resolution.events.push(TurnEvent::QuestUpdated {
        quest_id: quest.id,
        title: quest.title.clone(),
        status: QuestUpdate::Proposed,
    });
    state.propose_quest(quest, correlation_id, clock)?;
    Ok(resolution)
}

fn latest_offer(state: &GameState) -> Result<Uuid, DomainError> {
    state
        .data()?
        .quests
        .pending
        .last()
        .map(|q| q.id)
        .ok_or_else(|| DomainError::QuestState("No one has offered you a quest.".into()))
}

fn accept_offer(
    state: &mut GameState,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<Resolution, DomainError> {
    let quest = state.accept_quest(latest_offer(state)?, correlation_id, clock)?;
    let mut resolution = Resolution::narrate(format!(
        "You accept \"{}\". {} nods gravely and wishes you luck.",
        quest.title, quest.quest_giver
    ));
    resolution.events.push(TurnEvent::QuestUpdated {
        quest_id: quest.id,
        title: quest.title,
        status: QuestUpdate::Accepted,
    });
    Ok(resolution)
}

fn decline_offer(
    state: &mut GameState,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<Resolution, DomainError> {
    let quest_id = latest_offer(state)?;
    let title = state
        .data()?
        .quests
        .pending
        .iter()
        .find(|q| q.id == quest_id)
        .map(|q| q.title.clone())
        .unwrap_or_default();
    state.decline_quest(quest_id, correlation_id, clock)?;

    let mut resolution =
        Resolution::narrate(format!("You turn down \"{title}\". Perhaps another time."));
    resolution.events.push(TurnEvent::QuestUpdated {
        quest_id,
        title,
        status: QuestUpdate::Declined,
    });
    Ok(resolution)
}

fn complete_focused_quest(
    state: &mut GameState,
    correlation_id: Uuid,
    clock: &dyn Clock,
) -> Result<Resolution, DomainError> {
    let quest_id = state
        .focused_quest()?
        .map(|q| q.id)
        .ok_or_else(|| DomainError::QuestState("You have no active quest to report.".into()))?;
    let reward = state.complete_quest(quest_id, correlation_id, clock)?;

    let mut resolution = Resolution::narrate(format!(
        "You report back to {}: \"{}\" is complete!",
        reward.quest.quest_giver, reward.quest.title
    ));
    resolution.events.push(TurnEvent::QuestUpdated {
        quest_id,
        title: reward.quest.title.clone(),
        status: QuestUpdate::Completed,
    });
    resolution.reward(&reward.progress);
    if let Some(gold) = reward.gold {
        let balance = state.data()?.character.gold;
        resolution.events.push(TurnEvent::GoldChanged {
            delta: i64::from(gold),
            balance,
        });
        resolution.say(&format!("You receive {gold} gold."));
    }
    Ok(resolution)
}

fn skill_check(
    state: &GameState,
    skill: Skill,
    rng: &mut dyn DeterministicRng,
) -> Result<Resolution, DomainError> {
    let outcome = DiceExpression::D20.roll(rng)?;
    let bonus = state.data()?.skill_bonus(skill.name());
    let mut resolution = Resolution::narrate(fallback::skill_check(
        skill.name(),
        outcome.total,
        bonus,
        SKILL_CHECK_DC,
    ));
    resolution
        .events
        .push(TurnEvent::dice(&format!("{} check", skill.name()), &outcome));
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use questforge_core::aggregate::AggregateRoot;
    use questforge_narrative::domain::fallback::EXPLORATION_DESCRIPTION;
    use questforge_rules::domain::intent::{Mode, classify};
    use questforge_test_support::{FixedClock, MockRng, SequenceRng};
    use questforge_world_state::domain::model::{Character, GameData, QuestStatus, SessionInfo};

    use super::*;

    fn new_state() -> GameState {
        let clock = FixedClock::standard();
        let id = Uuid::new_v4();
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id,
                started_at: clock.0,
                scenario_title: "The Broken Shield".to_owned(),
            },
        );
        let mut state = GameState::start(id, data, Uuid::new_v4(), &clock);
        state.mark_committed();
        state
    }

    fn run(
        state: &mut GameState,
        text: &str,
        rng: &mut dyn DeterministicRng,
        config: &TurnConfig,
    ) -> Result<Resolution, DomainError> {
        let mode = Mode::from_in_combat(state.data().unwrap().combat.in_combat);
        let action = classify(text, mode);
        resolve(
            state,
            &action,
            text,
            rng,
            Uuid::new_v4(),
            &FixedClock::standard(),
            config,
        )
    }

    fn manual() -> TurnConfig {
        TurnConfig {
            auto_enemy_turn: false,
            ..TurnConfig::default()
        }
    }

    #[test]
    fn test_look_records_nothing_and_rolls_nothing() {
        let mut state = new_state();
        let mut rng = SequenceRng::new(vec![]);

        let resolution = run(&mut state, "I look around", &mut rng, &manual()).unwrap();

        assert!(resolution.narrative.contains(EXPLORATION_DESCRIPTION));
        assert!(resolution.events.is_empty());
        assert!(state.uncommitted_events().is_empty());
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_cast_spell_hit_rolls_d20_then_d6() {
        let mut state = new_state();
        run(&mut state, "a wild orc", &mut MockRng, &manual()).unwrap();
        let mut rng = SequenceRng::new(vec![15, 6]);

        let resolution = run(&mut state, "I cast a spell", &mut rng, &manual()).unwrap();

        let dice: Vec<&TurnEvent> = resolution
            .events
            .iter()
            .filter(|e| matches!(e, TurnEvent::DiceRolled { .. }))
            .collect();
        assert_eq!(dice.len(), 2);
        assert!(resolution.narrative.contains("hit"));
        assert_eq!(state.data().unwrap().combat.enemy().unwrap().hp, 9);
    }

    #[test]
    fn test_cast_spell_miss_rolls_only_d20() {
        let mut state = new_state();
        run(&mut state, "orc", &mut MockRng, &manual()).unwrap();
        let mut rng = SequenceRng::new(vec![14]);

        let resolution = run(&mut state, "I cast a spell", &mut rng, &manual()).unwrap();

        assert!(resolution.narrative.contains("miss"));
        assert_eq!(rng.consumed(), 1);
        assert_eq!(state.data().unwrap().combat.enemy().unwrap().hp, 15);
    }

    #[test]
    fn test_auto_enemy_turn_follows_player_action() {
        let mut state = new_state();
        run(&mut state, "worg", &mut MockRng, &manual()).unwrap();
        let mut rng = SequenceRng::new(vec![3, 12, 2]);

        let resolution =
            run(&mut state, "I attack", &mut rng, &TurnConfig::default()).unwrap();

        let combat = &state.data().unwrap().combat;
        assert_eq!((combat.current_turn, combat.round), (0, 2));
        assert_eq!(state.data().unwrap().character.hit_points.current, 10);
        assert!(resolution.events.contains(&TurnEvent::DamageDealt {
            target: arbiter::Target::Player,
            amount: 2,
            remaining_hp: 10,
        }));
    }

    #[test]
    fn test_victory_grants_enemy_experience() {
        let mut state = new_state();
        run(&mut state, "goblin", &mut MockRng, &manual()).unwrap();
        let mut rng = SequenceRng::new(vec![20, 8]);

        let resolution = run(&mut state, "I attack", &mut rng, &TurnConfig::default()).unwrap();

        assert!(resolution.events.contains(&TurnEvent::ExperienceGained {
            amount: 50,
            total: 50
        }));
        assert_eq!(state.data().unwrap().character.experience.current, 50);
        assert!(!state.data().unwrap().combat.in_combat);
    }

    #[test]
    fn test_victory_loot_lands_in_inventory() {
        let mut state = new_state();
        run(&mut state, "goblin", &mut MockRng, &manual()).unwrap();

        let resolution =
            run(&mut state, "I attack", &mut SequenceRng::new(vec![20, 8]), &manual()).unwrap();

        assert!(resolution.events.contains(&TurnEvent::ItemAcquired {
            name: "Health Potion".to_owned(),
            quantity: 3,
        }));
        assert!(resolution.narrative.ends_with("Among the remains you find a Health Potion."));
        let potions = state
            .data()
            .unwrap()
            .inventory
            .iter()
            .find(|i| i.name == "Health Potion")
            .map(|i| i.quantity);
        assert_eq!(potions, Some(3));
    }

    #[test]
    fn test_move_in_combat_is_rejected() {
        let mut state = new_state();
        run(&mut state, "troll", &mut MockRng, &manual()).unwrap();

        let result = run(&mut state, "I go to the town square", &mut MockRng, &manual());

        assert!(matches!(result, Err(DomainError::InvalidCombatAction(_))));
    }

    #[test]
    fn test_move_changes_location() {
        let mut state = new_state();

        let resolution =
            run(&mut state, "I walk to the town square", &mut MockRng, &manual()).unwrap();

        assert_eq!(state.data().unwrap().location.name, "Town Square");
        assert_eq!(
            resolution.events,
            vec![TurnEvent::LocationChanged {
                name: "Town Square".to_owned()
            }]
        );
    }

    #[test]
    fn test_quest_offer_accept_and_complete() {
        let mut state = new_state();
        let config = manual();

        let offer = run(&mut state, "Any work for me?", &mut MockRng, &config).unwrap();
        let accepted = run(&mut state, "I accept", &mut MockRng, &config).unwrap();
        let done = run(&mut state, "Quest complete!", &mut MockRng, &config).unwrap();

        assert!(offer.narrative.contains("The Broken Shield"));
        assert!(matches!(
            accepted.events[0],
            TurnEvent::QuestUpdated {
                status: QuestUpdate::Accepted,
                ..
            }
        ));
        let data = state.data().unwrap();
        let main = data.quests.main_quest.as_ref().unwrap();
        assert_eq!(main.status, QuestStatus::Completed);
        assert_eq!(data.character.experience.current, 300);
        assert_eq!(data.character.level, 2);
        assert!(done.events.contains(&TurnEvent::LevelReached { level: 2 }));
        assert!(done.events.contains(&TurnEvent::GoldChanged {
            delta: 100,
            balance: 115
        }));
    }

    #[test]
    fn test_completing_without_active_quest_is_quest_state_error() {
        let mut state = new_state();

        let result = run(&mut state, "quest complete", &mut MockRng, &manual());

        assert!(matches!(result, Err(DomainError::QuestState(_))));
    }

    #[test]
    fn test_skill_check_adds_proficiency() {
        let mut state = new_state();
        let mut rng = SequenceRng::new(vec![10]);

        let resolution = run(&mut state, "I climb the wall", &mut rng, &manual()).unwrap();

        assert_eq!(
            resolution.narrative,
            "Athletics check: 10 +4 = 14 against DC 12. Success!"
        );
    }

    #[test]
    fn test_rejected_resolution_carries_reason_event() {
        let resolution = Resolution::rejected("It is the enemy's turn.");

        assert_eq!(resolution.narrative, "It is the enemy's turn.");
        assert_eq!(
            resolution.events,
            vec![TurnEvent::ActionRejected {
                reason: "It is the enemy's turn.".to_owned()
            }]
        );
    }
}
