//! Route modules organized by bounded context.

pub mod character_creation;
pub mod health;
pub mod quests;
pub mod rules;
pub mod sessions;
