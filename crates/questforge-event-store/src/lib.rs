//! Questforge event store.
//!
//! Sessions are single-process and short-lived, so streams live in memory.
//! Swapping in a durable store only requires another `EventRepository`.

pub mod in_memory_event_repository;
