//! Domain layer for the Rules & Resolution context.

pub mod commands;
pub mod creation;
pub mod dice;
pub mod intent;
