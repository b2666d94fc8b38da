//! Deterministic turn-based boss combat rules.
//!
//! `combat-core` defines the canonical combat rules (initiative, ability
//! resolution, status effects, victory and defeat) as pure, synchronous APIs.
//! All session mutation flows through [`engine::CombatEngine`]; randomness,
//! wall-clock time, and the boss catalog are injected through the oracles in
//! [`env`].
pub mod action;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use action::{
    ActionKind, ActionOutcome, CombatAction, DamageKind, DamageSpec, EffectBundle, ResolveError,
};
pub use config::{CombatConfig, PlayerTemplate};
pub use dice::{DiceError, DiceExpr};
pub use engine::{CombatEngine, IgnoreReason, SessionError, SessionSummary, Transition};
pub use env::{
    BossDefinition, CatalogOracle, ClockOracle, CombatEnv, Env, FixedClock, PcgRng, RngOracle,
};
#[cfg(feature = "std")]
pub use env::SystemClock;
pub use error::{CombatError, ErrorSeverity};
pub use state::{
    CombatLog, CombatLogEntry, CombatSession, CombatStats, Combatant, EffectId, EffectModifier,
    EffectTemplate, Immunities, ImmunityKind, LogCategory, LogEntryId, Phase, Side, StatusEffect,
    StatusEffects,
};
