//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the combat engine, and action
//! providers so clients can bubble them up with consistent context.
use combat_core::{CombatError, ErrorSeverity, ResolveError, SessionError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a boss catalog before building")]
    MissingCatalog,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("ability '{ability_id}' is not available against {boss_id}")]
    UnknownAbility { boss_id: String, ability_id: String },

    #[error("no player abilities are available against {boss_id}")]
    NoPlayerAbilities { boss_id: String },

    #[error("action provider has no more actions")]
    ProviderExhausted,

    #[error("action provider input closed")]
    ProviderInputClosed,

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session event channel closed")]
    EventChannelClosed,
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Session(err) => err.severity(),
            Self::Resolve(err) => err.severity(),
            Self::UnknownAbility { .. } | Self::ProviderExhausted | Self::ProviderInputClosed => {
                ErrorSeverity::Recoverable
            }
            Self::MissingCatalog | Self::NoPlayerAbilities { .. } => ErrorSeverity::Fatal,
            Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::EventChannelClosed => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCatalog => "RUNTIME_MISSING_CATALOG",
            Self::Session(err) => err.error_code(),
            Self::Resolve(err) => err.error_code(),
            Self::UnknownAbility { .. } => "RUNTIME_UNKNOWN_ABILITY",
            Self::NoPlayerAbilities { .. } => "RUNTIME_NO_PLAYER_ABILITIES",
            Self::ProviderExhausted => "RUNTIME_PROVIDER_EXHAUSTED",
            Self::ProviderInputClosed => "RUNTIME_PROVIDER_INPUT_CLOSED",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::EventChannelClosed => "RUNTIME_EVENT_CHANNEL_CLOSED",
        }
    }
}
