//! Questforge — Narrative bounded context.
//!
//! Everything the engine says that is not a rules outcome: procedural
//! scenarios and opening messages, the quest board, the location atlas,
//! rule-based fallback narration, and the optional generative narrator
//! wrapped in a timeout.

pub mod application;
pub mod domain;
