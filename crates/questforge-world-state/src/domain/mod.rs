//! Domain layer for the World State context.

pub mod aggregates;
pub mod commands;
pub mod events;
pub mod model;
pub mod progression;
pub mod quest_ledger;
