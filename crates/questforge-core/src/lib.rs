//! Questforge Core — shared domain abstractions.
//!
//! Every bounded context of the adventure engine depends on the traits and
//! types defined here: aggregates, events, commands, the injectable clock
//! and random source, the persistence and narration ports, and the error
//! taxonomy.
//! It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod narrator;
pub mod repository;
pub mod rng;
