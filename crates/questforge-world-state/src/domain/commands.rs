//! Commands for the World State context.

use questforge_core::command::Command;
use uuid::Uuid;

use super::model::QuestType;

/// Command to offer a new quest to the player.
#[derive(Debug, Clone)]
pub struct ProposeQuest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// Quest title.
    pub title: String,
    /// Quest description.
    pub description: String,
    /// Who offers the quest.
    pub quest_giver: String,
    /// Experience granted on completion.
    pub xp_reward: u32,
    /// Gold granted on completion.
    pub gold_reward: Option<u32>,
    /// Optional objective list.
    pub objectives: Option<Vec<String>>,
    /// Which slot the quest occupies once accepted.
    pub quest_type: QuestType,
}

impl Command for ProposeQuest {
    fn command_type(&self) -> &'static str {
        "world_state.propose_quest"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// What to do with an existing quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestDecision {
    /// Accept a pending proposal.
    Accept,
    /// Decline a pending proposal.
    Decline,
    /// Complete an active quest.
    Complete,
    /// Fail an active quest.
    Fail,
}

/// Command to move an existing quest through its lifecycle.
#[derive(Debug, Clone)]
pub struct ResolveQuest {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// The quest identifier.
    pub quest_id: Uuid,
    /// The transition to perform.
    pub decision: QuestDecision,
}

impl Command for ResolveQuest {
    fn command_type(&self) -> &'static str {
        match self.decision {
            QuestDecision::Accept => "world_state.accept_quest",
            QuestDecision::Decline => "world_state.decline_quest",
            QuestDecision::Complete => "world_state.complete_quest",
            QuestDecision::Fail => "world_state.fail_quest",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
