//! Ability definitions and their resolution.
//!
//! - `types`: static ability data ([`CombatAction`], [`DamageSpec`], [`EffectBundle`])
//! - `resolve`: applies one ability to a session
//! - `error`: resolution failures
pub mod error;
pub mod resolve;
pub mod types;

pub use error::ResolveError;
pub use resolve::{ActionOutcome, reduce_damage, resolve_action};
pub use types::{ActionKind, CombatAction, DamageKind, DamageSpec, EffectBundle};
