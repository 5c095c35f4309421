//! Questforge — Rules & Resolution bounded context.
//!
//! Responsible for interpreting player intent, rolling dice and pulling
//! structured character details out of free-form creation dialogue.

pub mod application;
pub mod domain;
