//! Questforge — World State bounded context.
//!
//! Owns the canonical game state of a session: the character sheet,
//! inventory, party, location, combat progress and the quest ledger.

pub mod application;
pub mod domain;
