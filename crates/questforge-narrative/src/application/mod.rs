//! Application layer for the Narrative context.

pub mod narration;
