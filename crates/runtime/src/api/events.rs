//! Events broadcast by a running session.
//!
//! Subscribers receive events emitted after they subscribed; the state at
//! subscription time is available through [`crate::SessionHandle::snapshot`].
use combat_core::{ActionOutcome, CombatLogEntry, Phase, SessionSummary, Side};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The session moved between phases.
    PhaseChanged { from: Phase, to: Phase, round: u32 },

    /// An ability was resolved for `actor`.
    ActionResolved { actor: Side, outcome: ActionOutcome },

    /// A new combat log entry was appended.
    LogAppended(CombatLogEntry),

    /// The post-action animation window closed; input is accepted again.
    AnimationCleared,

    /// The session was ended and its worker stopped.
    SessionEnded(SessionSummary),

    /// The worker stopped after an unrecoverable failure.
    Aborted { code: String, message: String },
}

impl CombatEvent {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            CombatEvent::SessionEnded(_) | CombatEvent::Aborted { .. }
        )
    }
}
