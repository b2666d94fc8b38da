//! Error types for session construction.

use crate::dice::DiceError;
use crate::error::{CombatError, ErrorSeverity};

/// Errors surfaced while starting a combat session.
///
/// All of these indicate broken configuration: no session is created.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionError {
    #[error("unknown boss '{boss_id}'")]
    UnknownBoss { boss_id: String },

    #[error("boss '{boss_id}' has no abilities configured")]
    NoBossAbilities { boss_id: String },

    #[error("ability '{ability}' for boss '{boss_id}' has malformed dice: {source}")]
    MalformedDice {
        boss_id: String,
        ability: String,
        #[source]
        source: DiceError,
    },
}

impl SessionError {
    pub fn unknown_boss(boss_id: impl Into<String>) -> Self {
        Self::UnknownBoss {
            boss_id: boss_id.into(),
        }
    }
}

impl CombatError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownBoss { .. } => "SESSION_UNKNOWN_BOSS",
            Self::NoBossAbilities { .. } => "SESSION_NO_BOSS_ABILITIES",
            Self::MalformedDice { .. } => "SESSION_MALFORMED_DICE",
        }
    }
}
