//! Shared test doubles for the Questforge adventure engine.

mod clock;
mod narrator;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use narrator::{FailingNarrator, ScriptedNarrator, SlowNarrator};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
pub use rng::{MockRng, SequenceRng};
