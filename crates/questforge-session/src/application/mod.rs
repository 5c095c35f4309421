//! Application layer for the Session context.

pub mod character_creation;
pub mod command_handlers;
pub mod dispatch;
pub mod locks;
