//! Experience and leveling.

use questforge_core::clock::Clock;
use questforge_core::error::DomainError;
use uuid::Uuid;

use super::aggregates::GameState;
use super::events::{ExperienceGained, GameEventKind, LevelReached};
use super::model::{AbilityScores, GameData};

/// Total experience required to reach each level, starting at level 1.
pub const XP_THRESHOLDS: [u32; 20] = [
    0, 300, 900, 2_700, 6_500, 14_000, 23_000, 34_000, 48_000, 64_000, 85_000, 100_000, 120_000,
    140_000, 165_000, 195_000, 225_000, 265_000, 305_000, 355_000,
];

/// Highest attainable level.
pub const MAX_LEVEL: u32 = 20;

/// What a grant of experience changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Experience granted.
    pub gained: u32,
    /// Total experience afterwards.
    pub total: u32,
    /// Every level reached by this grant, in order.
    pub levels_reached: Vec<u32>,
}

/// Experience needed to reach the level after `level`; the cap repeats the
/// last threshold.
#[must_use]
pub fn next_threshold(level: u32) -> u32 {
    let index = usize::try_from(level.min(MAX_LEVEL - 1)).unwrap_or(0);
    XP_THRESHOLDS[index]
}

/// Average hit-die roll per level for a class.
fn hit_die_average(class: &str) -> u32 {
    match class {
        "Barbarian" => 7,
        "Fighter" | "Paladin" | "Ranger" => 6,
        "Sorcerer" | "Wizard" => 4,
        _ => 5,
    }
}

impl GameState {
    /// Grants experience, raising the level once per crossed threshold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AggregateNotFound` if the session never started.
    pub fn grant_experience(
        &mut self,
        amount: u32,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Progress, DomainError> {
        let character = &self.data()?.character;
        let total = character.experience.current.saturating_add(amount);
        let mut level = character.level;
        let mut max_hp = character.hit_points.max;
        let per_level = hit_die_average(&character.class)
            .saturating_add_signed(AbilityScores::modifier(character.ability_scores.constitution))
            .max(1);

        self.record(
            GameEventKind::ExperienceGained(ExperienceGained { amount, total }),
            correlation_id,
            clock,
        );

        let mut levels_reached = Vec::new();
        while level < MAX_LEVEL && total >= next_threshold(level) {
            level += 1;
            max_hp = max_hp.saturating_add(per_level);
            self.record(
                GameEventKind::LevelReached(LevelReached {
                    level,
                    needed: next_threshold(level),
                    max_hp,
                }),
                correlation_id,
                clock,
            );
            levels_reached.push(level);
        }

        Ok(Progress {
            gained: amount,
            total,
            levels_reached,
        })
    }
}

/// Applies experience and level events to `data`.
pub(crate) fn apply_progression(data: &mut GameData, kind: &GameEventKind) {
    let character = &mut data.character;
    match kind {
        GameEventKind::ExperienceGained(payload) => {
            character.experience.current = payload.total;
        }
        GameEventKind::LevelReached(payload) => {
            let gained_hp = payload.max_hp.saturating_sub(character.hit_points.max);
            character.level = payload.level;
            character.experience.needed = payload.needed;
            character.hit_points.max = payload.max_hp;
            character.hit_points.current =
                character.hit_points.current.saturating_add(gained_hp).min(payload.max_hp);
        }
        _ => {}
    }
}
