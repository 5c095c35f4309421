//! Commands for the Session context.

use questforge_core::command::Command;
use questforge_world_state::domain::model::Character;
use uuid::Uuid;

use super::turn::{ChatMessage, TurnRequest};

/// Command to start a new adventure session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player character; the default adventurer when absent.
    pub character: Option<Character>,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "session.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to process one player turn.
#[derive(Debug, Clone)]
pub struct ProcessTurn {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session identifier.
    pub session_id: Uuid,
    /// The turn input.
    pub request: TurnRequest,
}

impl Command for ProcessTurn {
    fn command_type(&self) -> &'static str {
        "session.process_turn"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to advance the character-creation dialogue.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The conversation so far.
    pub messages: Vec<ChatMessage>,
}

impl Command for CreateCharacter {
    fn command_type(&self) -> &'static str {
        "session.create_character"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
