//! Routes for a session's quest ledger.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use questforge_core::error::DomainError;
use questforge_world_state::application::command_handlers::{
    handle_propose_quest, handle_resolve_quest,
};
use questforge_world_state::application::query_handlers::{QuestListView, list_quests};
use questforge_world_state::domain::commands::{ProposeQuest, QuestDecision, ResolveQuest};
use questforge_world_state::domain::model::{QuestStatus, QuestType};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string for GET /{session_id}/quests.
#[derive(Debug, Deserialize)]
pub struct QuestFilter {
    /// Only quests with this status; every accepted quest when absent.
    pub status: Option<QuestStatus>,
}

/// Request body for POST /{session_id}/quests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeQuestRequest {
    pub title: String,
    pub description: String,
    pub quest_giver: String,
    pub xp_reward: u32,
    #[serde(default)]
    pub gold_reward: Option<u32>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
}

/// Response body for POST /{session_id}/quests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeQuestResponse {
    pub quest_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// Response body returned after a quest transition.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

fn parse_decision(raw: &str) -> Result<QuestDecision, DomainError> {
    match raw {
        "accept" => Ok(QuestDecision::Accept),
        "decline" => Ok(QuestDecision::Decline),
        "complete" => Ok(QuestDecision::Complete),
        "fail" => Ok(QuestDecision::Fail),
        other => Err(DomainError::Validation(format!(
            "unknown quest decision {other:?}; expected accept, decline, complete or fail"
        ))),
    }
}

/// GET /{session_id}/quests
#[instrument(skip(state, filter), fields(session_id = %session_id))]
async fn get_quests(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(filter): Query<QuestFilter>,
) -> Result<Json<QuestListView>, ApiError> {
    let view = list_quests(session_id, filter.status, &*state.event_repository).await?;
    Ok(Json(view))
}

/// POST /{session_id}/quests
#[instrument(skip(state, request), fields(session_id = %session_id))]
async fn propose_quest(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ProposeQuestRequest>,
) -> Result<Json<ProposeQuestResponse>, ApiError> {
    let command = ProposeQuest {
        correlation_id: Uuid::new_v4(),
        session_id,
        title: request.title,
        description: request.description,
        quest_giver: request.quest_giver,
        xp_reward: request.xp_reward,
        gold_reward: request.gold_reward,
        objectives: request.objectives,
        quest_type: request.quest_type,
    };

    info!(correlation_id = %command.correlation_id, "handling propose_quest command");

    let _session = state.locks.acquire(session_id).await;
    let (quest_id, stored_events) =
        handle_propose_quest(&command, state.clock.as_ref(), &*state.event_repository).await?;

    let event_ids = stored_events.iter().map(|e| e.event_id).collect();

    Ok(Json(ProposeQuestResponse {
        quest_id,
        event_ids,
    }))
}

/// POST /{session_id}/quests/{quest_id}/{decision}
#[instrument(skip(state), fields(session_id = %session_id, quest_id = %quest_id))]
async fn resolve_quest(
    State(state): State<AppState>,
    Path((session_id, quest_id, decision)): Path<(Uuid, Uuid, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = ResolveQuest {
        correlation_id: Uuid::new_v4(),
        session_id,
        quest_id,
        decision: parse_decision(&decision)?,
    };

    info!(correlation_id = %command.correlation_id, %decision, "handling resolve_quest command");

    let _session = state.locks.acquire(session_id).await;
    let stored_events =
        handle_resolve_quest(&command, state.clock.as_ref(), &*state.event_repository).await?;

    let event_ids = stored_events.iter().map(|e| e.event_id).collect();

    Ok(Json(CommandResponse { event_ids }))
}

/// Returns the router for quest routes, relative to the sessions prefix.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{session_id}/quests", get(get_quests).post(propose_quest))
        .route("/{session_id}/quests/{quest_id}/{decision}", post(resolve_quest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision_accepts_known_verbs() {
        assert_eq!(parse_decision("accept").unwrap(), QuestDecision::Accept);
        assert_eq!(parse_decision("fail").unwrap(), QuestDecision::Fail);
    }

    #[test]
    fn test_parse_decision_rejects_unknown_verb() {
        assert!(matches!(
            parse_decision("abandon"),
            Err(DomainError::Validation(_))
        ));
    }
}
