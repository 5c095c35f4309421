//! Questforge — Session bounded context.
//!
//! Turns one player utterance into a resolved, persisted turn: classify the
//! intent, route it to the combat arbiter, the quest ledger or plain
//! narration, append the recorded events and answer with a structured
//! response. Also starts sessions and runs the character-creation dialogue.

pub mod application;
pub mod domain;
