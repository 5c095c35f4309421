//! Query handlers for the World State context.
//!
//! This module contains query handlers that reconstitute aggregates
//! from stored events and return read-only view DTOs.

use questforge_core::aggregate::AggregateRoot;
use questforge_core::error::DomainError;
use questforge_core::repository::EventRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::application::command_handlers::load_game_state;
use crate::domain::model::{GameData, Quest, QuestStatus};

/// Read-only view of a game session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The full game data.
    pub state: GameData,
    /// Current version (event count).
    pub version: i64,
}

/// Read-only view of a session's quest log filtered by status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestListView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Requested status, or `None` for every accepted quest.
    pub status: Option<QuestStatus>,
    /// Matching quests, main quest first.
    pub quests: Vec<Quest>,
    /// Proposals still awaiting a decision.
    pub pending: Vec<Quest>,
}

/// Retrieves a game session by its id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_game_state(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<GameStateView, DomainError> {
    let state = load_game_state(session_id, repo).await?;
    Ok(GameStateView {
        session_id,
        version: state.version(),
        state: state.data()?.clone(),
    })
}

/// Lists accepted quests, optionally filtered by status.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
pub async fn list_quests(
    session_id: Uuid,
    status: Option<QuestStatus>,
    repo: &dyn EventRepository,
) -> Result<QuestListView, DomainError> {
    let state = load_game_state(session_id, repo).await?;
    let quests = match status {
        Some(status) => state.quests_with_status(status)?,
        None => state.data()?.quests.accepted().cloned().collect(),
    };
    Ok(QuestListView {
        session_id,
        status,
        quests,
        pending: state.data()?.quests.pending.clone(),
    })
}

#[cfg(test)]
mod tests {
    use questforge_core::aggregate::AggregateRoot;
    use questforge_core::error::DomainError;
    use questforge_core::repository::StoredEvent;
    use questforge_test_support::{EmptyEventRepository, FixedClock, RecordingEventRepository};
    use uuid::Uuid;

    use super::*;
    use crate::domain::aggregates::GameState;
    use crate::domain::model::{Character, QuestType, SessionInfo};

    fn history_with_quests(session_id: Uuid) -> Vec<StoredEvent> {
        let clock = FixedClock::standard();
        let data = GameData::new(
            Character::default(),
            SessionInfo {
                id: session_id,
                started_at: clock.0,
                scenario_title: "The Lost Heir".to_owned(),
            },
        );
        let mut state = GameState::start(session_id, data, Uuid::new_v4(), &clock);
        let quest = |title: &str, quest_type| Quest {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            description: String::new(),
            quest_giver: "Elder Rowan".to_owned(),
            xp_reward: 10,
            gold_reward: None,
            status: QuestStatus::Active,
            created_at: clock.0,
            completed_at: None,
            objectives: None,
            quest_type,
        };
        let main = quest("Slay the Wyrm", QuestType::Main);
        let side = quest("Lost Cat", QuestType::Side);
        let offer = quest("Herbs", QuestType::Side);
        for q in [main.clone(), side.clone(), offer] {
            state.propose_quest(q, Uuid::new_v4(), &clock).unwrap();
        }
        state.accept_quest(main.id, Uuid::new_v4(), &clock).unwrap();
        state.accept_quest(side.id, Uuid::new_v4(), &clock).unwrap();
        state.complete_quest(side.id, Uuid::new_v4(), &clock).unwrap();
        state
            .uncommitted_events()
            .iter()
            .map(StoredEvent::from_event)
            .collect()
    }

    #[tokio::test]
    async fn test_get_game_state_returns_view() {
        // Arrange
        let session_id = Uuid::new_v4();
        let history = history_with_quests(session_id);
        let expected_version = i64::try_from(history.len()).unwrap();
        let repo = RecordingEventRepository::new(history);

        // Act
        let view = get_game_state(session_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.session_id, session_id);
        assert_eq!(view.version, expected_version);
        assert_eq!(view.state.session.scenario_title, "The Lost Heir");
        assert_eq!(view.state.character.experience.current, 10);
    }

    #[tokio::test]
    async fn test_get_game_state_returns_not_found_when_no_events() {
        // Arrange
        let session_id = Uuid::new_v4();

        // Act
        let result = get_game_state(session_id, &EmptyEventRepository).await;

        // Assert
        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, session_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_quests_partitions_by_status() {
        let session_id = Uuid::new_v4();
        let repo = RecordingEventRepository::new(history_with_quests(session_id));

        let active = list_quests(session_id, Some(QuestStatus::Active), &repo).await.unwrap();
        let completed = list_quests(session_id, Some(QuestStatus::Completed), &repo)
            .await
            .unwrap();
        let all = list_quests(session_id, None, &repo).await.unwrap();

        assert_eq!(active.quests.len(), 1);
        assert_eq!(active.quests[0].title, "Slay the Wyrm");
        assert_eq!(completed.quests.len(), 1);
        assert_eq!(completed.quests[0].title, "Lost Cat");
        assert_eq!(all.quests.len(), 2);
        assert_eq!(all.pending.len(), 1);
        assert_eq!(all.pending[0].title, "Herbs");
    }
}
