//! Quest ledger transitions.
//!
//! Proposals wait in `pending` until accepted or declined. Accepted quests
//! go into the slot matching their type: main quest, current mission (daily)
//! or the side-quest list. Completed and failed quests are terminal.

use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use uuid::Uuid;

use super::aggregates::GameState;
use super::events::{
    GameEventKind, QuestAccepted, QuestCompleted, QuestDeclined, QuestFailed, QuestProposed,
};
use super::model::{GameData, Quest, QuestStatus, QuestType};
use super::progression::Progress;

/// Result of completing a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestReward {
    /// The completed quest.
    pub quest: Quest,
    /// Experience progress from the reward.
    pub progress: Progress,
    /// Gold granted, if any.
    pub gold: Option<u32>,
}

impl GameState {
    /// Offers `quest` to the player. Returns its id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a quest with the same id exists
    /// or the title is empty.
    pub fn propose_quest(
        &mut self,
        quest: Quest,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Uuid, DomainError> {
        if quest.title.trim().is_empty() {
            return Err(DomainError::Validation("quest title must not be empty".into()));
        }
        if self.data()?.quests.contains(quest.id) {
            return Err(DomainError::Validation(format!(
                "quest {} already exists",
                quest.id
            )));
        }
        let id = quest.id;
        self.record(
            GameEventKind::QuestProposed(QuestProposed {
                quest: Quest {
                    status: QuestStatus::Active,
                    completed_at: None,
                    ..quest
                },
            }),
            correlation_id,
            clock,
        );
        Ok(id)
    }

    /// Accepts a pending quest into the slot matching its type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuestState` if the quest is not pending or its
    /// main/mission slot already holds an active quest.
    pub fn accept_quest(
        &mut self,
        quest_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Quest, DomainError> {
        let quests = &self.data()?.quests;
        let quest = quests
            .pending
            .iter()
            .find(|q| q.id == quest_id)
            .cloned()
            .ok_or_else(|| {
                DomainError::QuestState(format!("quest {quest_id} is not awaiting a decision"))
            })?;
        let occupant = match quest.quest_type {
            QuestType::Main => quests.main_quest.as_ref(),
            QuestType::Daily => quests.current_mission.as_ref(),
            QuestType::Side => None,
        };
        if let Some(active) = occupant.filter(|q| q.status == QuestStatus::Active) {
            return Err(DomainError::QuestState(format!(
                "'{}' is still underway",
                active.title
            )));
        }
        self.record(
            GameEventKind::QuestAccepted(QuestAccepted { quest_id }),
            correlation_id,
            clock,
        );
        Ok(quest)
    }

    /// Discards a pending proposal.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuestState` if the quest is not pending.
    pub fn decline_quest(
        &mut self,
        quest_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if !self.data()?.quests.pending.iter().any(|q| q.id == quest_id) {
            return Err(DomainError::QuestState(format!(
                "quest {quest_id} is not awaiting a decision"
            )));
        }
        self.record(
            GameEventKind::QuestDeclined(QuestDeclined { quest_id }),
            correlation_id,
            clock,
        );
        Ok(())
    }

    /// Completes an active quest and pays out its rewards exactly once.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuestState` if the quest is not accepted or
    /// already completed or failed, and `DomainError::Validation` if the gold
    /// reward would overflow the purse. Nothing is recorded on error.
    pub fn complete_quest(
        &mut self,
        quest_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<QuestReward, DomainError> {
        let quest = self.active_quest(quest_id)?;
        let gold = quest.gold_reward.filter(|&g| g > 0);
        if let Some(reward) = gold {
            let purse = self.data()?.character.gold;
            if purse.checked_add(reward).is_none() {
                return Err(DomainError::Validation(format!(
                    "a reward of {reward} gold does not fit in a purse of {purse}"
                )));
            }
        }
        self.record(
            GameEventKind::QuestCompleted(QuestCompleted {
                quest_id,
                completed_at: clock.now(),
            }),
            correlation_id,
            clock,
        );
        let progress = self.grant_experience(quest.xp_reward, correlation_id, clock)?;
        if let Some(reward) = gold {
            self.adjust_gold(i64::from(reward), correlation_id, clock)?;
        }
        let quest = self
            .data()?
            .quests
            .accepted()
            .find(|q| q.id == quest_id)
            .cloned()
            .unwrap_or(quest);
        Ok(QuestReward {
            gold: quest.gold_reward,
            quest,
            progress,
        })
    }

    /// Marks an active quest as failed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuestState` if the quest is not active.
    pub fn fail_quest(
        &mut self,
        quest_id: Uuid,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Quest, DomainError> {
        let quest = self.active_quest(quest_id)?;
        self.record(
            GameEventKind::QuestFailed(QuestFailed { quest_id }),
            correlation_id,
            clock,
        );
        Ok(Quest {
            status: QuestStatus::Failed,
            ..quest
        })
    }

    fn active_quest(&self, quest_id: Uuid) -> Result<Quest, DomainError> {
        let quest = self
            .data()?
            .quests
            .accepted()
            .find(|q| q.id == quest_id)
            .ok_or_else(|| DomainError::QuestState(format!("quest {quest_id} is not active")))?;
        match quest.status {
            QuestStatus::Active => Ok(quest.clone()),
            QuestStatus::Completed => Err(DomainError::QuestState(format!(
                "'{}' is already completed",
                quest.title
            ))),
            QuestStatus::Failed => Err(DomainError::QuestState(format!(
                "'{}' has already failed",
                quest.title
            ))),
        }
    }

    /// Accepted quests with the given status, main quest first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn quests_with_status(&self, status: QuestStatus) -> Result<Vec<Quest>, DomainError> {
        Ok(self
            .data()?
            .quests
            .accepted()
            .filter(|q| q.status == status)
            .cloned()
            .collect())
    }

    /// The quest a "quest complete" utterance refers to: the current
    /// mission, else the most recent active side quest, else the main quest.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn focused_quest(&self) -> Result<Option<&Quest>, DomainError> {
        let quests = &self.data()?.quests;
        let active = |q: &&Quest| q.status == QuestStatus::Active;
        Ok(quests
            .current_mission
            .as_ref()
            .filter(active)
            .or_else(|| quests.side_quests.iter().rev().find(active))
            .or_else(|| quests.main_quest.as_ref().filter(active)))
    }
}

/// Applies quest events to `data`.
pub(crate) fn apply_quest_event(data: &mut GameData, kind: &GameEventKind) {
    let log = &mut data.quests;
    match kind {
        GameEventKind::QuestProposed(payload) => log.pending.push(payload.quest.clone()),
        GameEventKind::QuestAccepted(payload) => {
            let Some(pos) = log.pending.iter().position(|q| q.id == payload.quest_id) else {
                return;
            };
            let quest = log.pending.remove(pos);
            match quest.quest_type {
                QuestType::Main => log.main_quest = Some(quest),
                QuestType::Daily => log.current_mission = Some(quest),
                QuestType::Side => log.side_quests.push(quest),
            }
        }
        GameEventKind::QuestDeclined(payload) => log.pending.retain(|q| q.id != payload.quest_id),
        GameEventKind::QuestCompleted(payload) => {
            if let Some(quest) = log.accepted_mut(payload.quest_id) {
                quest.status = QuestStatus::Completed;
                quest.completed_at = Some(payload.completed_at);
            }
        }
        GameEventKind::QuestFailed(payload) => {
            if let Some(quest) = log.accepted_mut(payload.quest_id) {
                quest.status = QuestStatus::Failed;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use questforge_core::aggregate::AggregateRoot;
    use questforge_test_support::FixedClock;

    use super::*;
    use crate::domain::aggregates::tests::started_state;

    fn quest(title: &str, quest_type: QuestType, xp: u32, gold: Option<u32>) -> Quest {
        Quest {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: format!("{title} for the village."),
            quest_giver: "Elder Rowan".to_owned(),
            xp_reward: xp,
            gold_reward: gold,
            status: QuestStatus::Active,
            created_at: FixedClock::standard().0,
            completed_at: None,
            objectives: None,
            quest_type,
        }
    }

    fn accepted(state: &mut GameState, q: Quest) -> Uuid {
        let clock = FixedClock::standard();
        let id = state.propose_quest(q, Uuid::new_v4(), &clock).unwrap();
        state.accept_quest(id, Uuid::new_v4(), &clock).unwrap();
        id
    }

    #[test]
    fn test_proposed_quest_is_pending_only() {
        let clock = FixedClock::standard();
        let mut state = started_state();

        let id = state
            .propose_quest(quest("Clear the Cellar", QuestType::Side, 50, None), Uuid::new_v4(), &clock)
            .unwrap();

        let log = &state.data().unwrap().quests;
        assert_eq!(log.pending.len(), 1);
        assert_eq!(log.pending[0].id, id);
        assert_eq!(log.accepted().count(), 0);
    }

    #[test]
    fn test_duplicate_proposal_is_rejected() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let q = quest("Clear the Cellar", QuestType::Side, 50, None);
        state.propose_quest(q.clone(), Uuid::new_v4(), &clock).unwrap();

        let result = state.propose_quest(q, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_accept_places_quest_by_type() {
        let mut state = started_state();

        let main = accepted(&mut state, quest("Slay the Wyrm", QuestType::Main, 500, None));
        let daily = accepted(&mut state, quest("Fetch Water", QuestType::Daily, 10, None));
        let side = accepted(&mut state, quest("Lost Cat", QuestType::Side, 25, Some(5)));

        let log = &state.data().unwrap().quests;
        assert_eq!(log.main_quest.as_ref().unwrap().id, main);
        assert_eq!(log.current_mission.as_ref().unwrap().id, daily);
        assert_eq!(log.side_quests[0].id, side);
        assert!(log.pending.is_empty());
    }

    #[test]
    fn test_occupied_main_slot_rejects_second_main_quest() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        accepted(&mut state, quest("Slay the Wyrm", QuestType::Main, 500, None));
        let second = state
            .propose_quest(quest("Crown the King", QuestType::Main, 500, None), Uuid::new_v4(), &clock)
            .unwrap();

        let result = state.accept_quest(second, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::QuestState(_))));
        assert_eq!(state.data().unwrap().quests.pending.len(), 1);
    }

    #[test]
    fn test_decline_discards_proposal() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = state
            .propose_quest(quest("Lost Cat", QuestType::Side, 25, None), Uuid::new_v4(), &clock)
            .unwrap();

        state.decline_quest(id, Uuid::new_v4(), &clock).unwrap();

        assert!(state.data().unwrap().quests.pending.is_empty());
        assert!(state.accept_quest(id, Uuid::new_v4(), &clock).is_err());
    }

    #[test]
    fn test_complete_grants_rewards_once() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = accepted(&mut state, quest("Lost Cat", QuestType::Side, 25, Some(5)));

        let reward = state.complete_quest(id, Uuid::new_v4(), &clock).unwrap();

        assert_eq!(reward.quest.status, QuestStatus::Completed);
        assert_eq!(reward.quest.completed_at, Some(clock.0));
        assert_eq!(reward.progress.total, 25);
        assert_eq!(reward.gold, Some(5));
        let character = &state.data().unwrap().character;
        assert_eq!(character.experience.current, 25);
        assert_eq!(character.gold, 20);
    }

    #[test]
    fn test_completing_twice_is_a_quest_state_error_without_mutation() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = accepted(&mut state, quest("Lost Cat", QuestType::Side, 25, Some(5)));
        state.complete_quest(id, Uuid::new_v4(), &clock).unwrap();
        let before = state.data().unwrap().clone();
        let events_before = state.uncommitted_events().len();

        let result = state.complete_quest(id, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::QuestState(_))));
        assert_eq!(state.data().unwrap(), &before);
        assert_eq!(state.uncommitted_events().len(), events_before);
    }

    #[test]
    fn test_gold_overflow_refuses_completion_without_recording() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = accepted(&mut state, quest("Dragon Hoard", QuestType::Side, 25, Some(u32::MAX)));
        let before = state.data().unwrap().clone();
        let events_before = state.uncommitted_events().len();

        let result = state.complete_quest(id, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(state.data().unwrap(), &before);
        assert_eq!(state.uncommitted_events().len(), events_before);
        assert!(state.active_quest(id).is_ok());
    }

    #[test]
    fn test_fail_is_terminal() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = accepted(&mut state, quest("Escort", QuestType::Side, 40, None));

        state.fail_quest(id, Uuid::new_v4(), &clock).unwrap();

        assert!(matches!(
            state.complete_quest(id, Uuid::new_v4(), &clock),
            Err(DomainError::QuestState(_))
        ));
        assert_eq!(state.quests_with_status(QuestStatus::Failed).unwrap().len(), 1);
        assert!(state.quests_with_status(QuestStatus::Active).unwrap().is_empty());
    }

    #[test]
    fn test_completing_pending_quest_is_rejected() {
        let clock = FixedClock::standard();
        let mut state = started_state();
        let id = state
            .propose_quest(quest("Lost Cat", QuestType::Side, 25, None), Uuid::new_v4(), &clock)
            .unwrap();

        assert!(matches!(
            state.complete_quest(id, Uuid::new_v4(), &clock),
            Err(DomainError::QuestState(_))
        ));
    }

    #[test]
    fn test_focused_quest_prefers_mission_then_latest_side_then_main() {
        let mut state = started_state();
        let main = accepted(&mut state, quest("Slay the Wyrm", QuestType::Main, 500, None));
        assert_eq!(state.focused_quest().unwrap().unwrap().id, main);

        accepted(&mut state, quest("Lost Cat", QuestType::Side, 25, None));
        let latest = accepted(&mut state, quest("Herbs", QuestType::Side, 25, None));
        assert_eq!(state.focused_quest().unwrap().unwrap().id, latest);

        let daily = accepted(&mut state, quest("Fetch Water", QuestType::Daily, 10, None));
        assert_eq!(state.focused_quest().unwrap().unwrap().id, daily);
    }
}
