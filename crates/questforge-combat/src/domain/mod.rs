//! Domain layer for the Combat context.

pub mod arbiter;
pub mod bestiary;
