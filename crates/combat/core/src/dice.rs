//! Dice notation parsing and rolling.
//!
//! Abilities describe their randomized values as `<count>d<sides>` (for
//! example `1d10`). The flat modifier is stored separately on the
//! [`DamageSpec`](crate::action::DamageSpec), so an expression here never
//! carries a `+N` suffix.
//!
//! Malformed notation is a configuration bug: parsing fails loudly instead of
//! silently producing zero.

use core::fmt;
use core::str::FromStr;

use crate::env::RngOracle;
use crate::error::{CombatError, ErrorSeverity};

/// Errors produced when parsing dice notation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,

    #[error("dice expression '{0}' is missing the 'd' separator")]
    MissingSeparator(String),

    #[error("dice expression '{expr}' has an invalid dice count")]
    InvalidCount { expr: String },

    #[error("dice expression '{expr}' has an invalid side count")]
    InvalidSides { expr: String },
}

impl CombatError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "DICE_EMPTY",
            Self::MissingSeparator(_) => "DICE_MISSING_SEPARATOR",
            Self::InvalidCount { .. } => "DICE_INVALID_COUNT",
            Self::InvalidSides { .. } => "DICE_INVALID_SIDES",
        }
    }
}

/// A parsed `<count>d<sides>` expression.
///
/// Both parts are at least 1; `1d1` is legal and always rolls 1, which the
/// built-in content uses for fixed-value abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiceExpr {
    count: u32,
    sides: u32,
}

impl DiceExpr {
    /// Upper bound on dice per expression, guarding against absurd content.
    pub const MAX_COUNT: u32 = 100;

    /// Upper bound on sides per die. Keeps every total inside `u32`.
    pub const MAX_SIDES: u32 = 1000;

    pub const D20: DiceExpr = DiceExpr { count: 1, sides: 20 };

    /// Creates an expression from already-validated parts.
    pub fn new(count: u32, sides: u32) -> Option<Self> {
        ((1..=Self::MAX_COUNT).contains(&count) && (1..=Self::MAX_SIDES).contains(&sides))
            .then_some(Self { count, sides })
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn sides(&self) -> u32 {
        self.sides
    }

    /// Inclusive range of totals this expression can produce.
    pub const fn bounds(&self) -> (u32, u32) {
        (self.count, self.count.saturating_mul(self.sides))
    }

    /// Sums `count` independent draws over `[1, sides]`.
    ///
    /// `next_seed` supplies a fresh seed for every die so each draw is an
    /// independent event in the session's roll sequence.
    pub fn roll(&self, rng: &(impl RngOracle + ?Sized), mut next_seed: impl FnMut() -> u64) -> u32 {
        (0..self.count)
            .map(|_| rng.roll_die(next_seed(), self.sides).min(self.sides))
            .fold(0u32, u32::saturating_add)
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let expr = input.trim();
        if expr.is_empty() {
            return Err(DiceError::Empty);
        }

        let (count, sides) = expr
            .split_once(['d', 'D'])
            .ok_or_else(|| DiceError::MissingSeparator(expr.to_string()))?;

        let count = parse_part(count, Self::MAX_COUNT).ok_or_else(|| DiceError::InvalidCount {
            expr: expr.to_string(),
        })?;
        let sides = parse_part(sides, Self::MAX_SIDES).ok_or_else(|| DiceError::InvalidSides {
            expr: expr.to_string(),
        })?;

        Ok(Self { count, sides })
    }
}

/// Parses a bare run of ASCII digits into `1..=max`. Signs are rejected.
fn parse_part(part: &str, max: u32) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok().filter(|value| (1..=max).contains(value))
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}
