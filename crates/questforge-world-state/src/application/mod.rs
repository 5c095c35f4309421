//! Application layer for the World State context.

pub mod command_handlers;
pub mod query_handlers;
