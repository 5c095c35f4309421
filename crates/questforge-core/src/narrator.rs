//! Generative narration port.
//!
//! The engine is complete without a narrator: every turn already carries a
//! rule-based narrative. A narrator may only rewrite that text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// What the narrator is asked to embellish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationRequest {
    /// Name of the classified action (e.g. `"perform_attack"`).
    pub action: String,
    /// The deterministic narrative produced by the rules.
    pub base_narrative: String,
    /// Name of the player character.
    pub character_name: String,
    /// Name of the current location.
    pub location: String,
    /// The most recent conversation lines, oldest first.
    pub recent_messages: Vec<String>,
}

/// An external text-generation service.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Returns the raw service output for `request`.
    ///
    /// The output is either plain prose or a JSON object with a `message`
    /// field; callers tolerate both.
    async fn narrate(&self, request: &NarrationRequest) -> Result<String, DomainError>;
}
