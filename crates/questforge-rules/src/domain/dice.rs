//! Dice engine.
//!
//! Supports the `<count>d<sides>[(+|-)<modifier>]` notation only. Count and
//! sides must both be written out, so `"d20"` is rejected in favour of
//! `"1d20"`. Every roll is drawn from an injected [`DeterministicRng`].

use std::fmt;
use std::str::FromStr;

use questforge_core::error::DomainError;
use questforge_core::rng::DeterministicRng;
use serde::{Deserialize, Serialize};

/// A parsed dice expression such as `2d6+3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceExpression {
    /// Number of dice rolled.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
    /// Flat modifier added to the sum of the dice.
    pub modifier: i32,
}

/// The result of evaluating a [`DiceExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// The expression that was rolled.
    pub expression: DiceExpression,
    /// Individual die results, in roll order.
    pub rolls: Vec<u32>,
    /// The modifier applied.
    pub modifier: i32,
    /// `sum(rolls) + modifier`.
    pub total: i32,
}

impl DiceOutcome {
    /// The total clamped to zero, as used for damage and healing.
    #[must_use]
    pub fn amount(&self) -> u32 {
        u32::try_from(self.total).unwrap_or(0)
    }
}

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 100;
/// Most faces a single die may have.
pub const MAX_SIDES: u32 = 1_000;

impl DiceExpression {
    /// A single twenty-sided die.
    pub const D20: Self = Self::new(1, 20, 0);

    /// Creates an expression without validating it.
    #[must_use]
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parses dice notation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` when `notation` does not match
    /// `<count>d<sides>[(+|-)<modifier>]`, or when count/sides is zero or
    /// above [`MAX_DICE`]/[`MAX_SIDES`].
    pub fn parse(notation: &str) -> Result<Self, DomainError> {
        let normalized = notation.trim().to_lowercase();
        let invalid = |reason: &str| DomainError::Parse(format!("{reason} in '{}'", notation.trim()));

        let (count_str, rest) = normalized
            .split_once('d')
            .ok_or_else(|| invalid("missing 'd' separator"))?;

        let count = parse_positive(count_str).ok_or_else(|| invalid("invalid dice count"))?;
        if count > MAX_DICE {
            return Err(invalid(&format!("more than {MAX_DICE} dice")));
        }

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let (sides_str, signed) = rest.split_at(pos);
                let magnitude = &signed[1..];
                if magnitude.is_empty() || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid("invalid modifier"));
                }
                let value: i32 = magnitude
                    .parse()
                    .map_err(|_| invalid("modifier out of range"))?;
                let modifier = if signed.starts_with('-') { -value } else { value };
                (sides_str, modifier)
            }
            None => (rest, 0),
        };

        let sides = parse_positive(sides_str).ok_or_else(|| invalid("invalid die size"))?;
        if sides > MAX_SIDES {
            return Err(invalid(&format!("dice above d{MAX_SIDES}")));
        }

        Ok(Self::new(count, sides, modifier))
    }

    /// Rolls the expression.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` if the expression has zero dice or
    /// zero-sided dice (only possible when built with [`Self::new`]).
    pub fn roll(&self, rng: &mut dyn DeterministicRng) -> Result<DiceOutcome, DomainError> {
        let rolls = roll_dice(rng, self.count, self.sides)?;
        let sum: i64 = rolls.iter().map(|&r| i64::from(r)).sum();
        let total = i32::try_from(sum + i64::from(self.modifier))
            .map_err(|_| DomainError::Parse(format!("total of {self} overflows")))?;
        Ok(DiceOutcome {
            expression: *self,
            rolls,
            modifier: self.modifier,
            total,
        })
    }
}

fn parse_positive(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}

impl FromStr for DiceExpression {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Rolls a single die, uniformly in `[1, sides]`.
///
/// # Errors
///
/// Returns `DomainError::Parse` if `sides` is zero.
pub fn roll_die(rng: &mut dyn DeterministicRng, sides: u32) -> Result<u32, DomainError> {
    if sides == 0 {
        return Err(DomainError::Parse("a die needs at least one side".to_owned()));
    }
    Ok(rng.next_u32_range(1, sides))
}

/// Rolls `count` independent dice of `sides` faces.
///
/// # Errors
///
/// Returns `DomainError::Parse` if `count` or `sides` is zero, or `count`
/// exceeds [`MAX_DICE`].
pub fn roll_dice(
    rng: &mut dyn DeterministicRng,
    count: u32,
    sides: u32,
) -> Result<Vec<u32>, DomainError> {
    if count == 0 {
        return Err(DomainError::Parse("at least one die must be rolled".to_owned()));
    }
    if count > MAX_DICE {
        return Err(DomainError::Parse(format!(
            "cannot roll {count} dice at once (limit {MAX_DICE})"
        )));
    }
    (0..count).map(|_| roll_die(rng, sides)).collect()
}

/// Parses and rolls `notation` in one step.
///
/// # Errors
///
/// Returns `DomainError::Parse` for malformed notation.
pub fn evaluate_expression(
    notation: &str,
    rng: &mut dyn DeterministicRng,
) -> Result<DiceOutcome, DomainError> {
    DiceExpression::parse(notation)?.roll(rng)
}
