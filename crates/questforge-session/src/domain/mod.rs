//! Domain layer for the Session context.

pub mod commands;
pub mod config;
pub mod tags;
pub mod turn;
