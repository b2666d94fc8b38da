//! Action resolution errors.

use crate::dice::DiceError;
use crate::error::{CombatError, ErrorSeverity};

/// Errors raised while resolving an ability.
///
/// Resolution is atomic: when any of these is returned, the session has not
/// been touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolveError {
    /// The ability carries dice notation that does not parse.
    #[error("ability '{ability}' has malformed dice: {source}")]
    Dice {
        ability: String,
        #[source]
        source: DiceError,
    },

    /// The boss being fought has nothing to pick from.
    #[error("boss '{boss}' has no abilities")]
    NoBossAbilities { boss: String },
}

impl ResolveError {
    pub fn dice(ability: impl Into<String>, source: DiceError) -> Self {
        Self::Dice {
            ability: ability.into(),
            source,
        }
    }
}

impl CombatError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Dice { .. } => "RESOLVE_MALFORMED_DICE",
            Self::NoBossAbilities { .. } => "RESOLVE_NO_BOSS_ABILITIES",
        }
    }
}
