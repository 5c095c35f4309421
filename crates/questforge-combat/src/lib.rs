//! Questforge — Combat bounded context.
//!
//! Spawns encounters from the bestiary and arbitrates the turn-by-turn
//! exchange between the player and a single enemy.

pub mod domain;
