//! Domain layer for the Narrative context.

pub mod atlas;
pub mod fallback;
pub mod quest_board;
pub mod scenario;
pub mod templates;
