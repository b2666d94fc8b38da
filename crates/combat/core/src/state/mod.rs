//! Authoritative combat session state.
//!
//! This module owns the data structures that describe combatants, status
//! effects, the combat log, and the session aggregate. Callers read the
//! session through accessors and mutate it exclusively through
//! [`crate::engine::CombatEngine`].
mod combatant;
mod log;
mod status;

pub use combatant::{CombatStats, Combatant};
pub use log::{CombatLog, CombatLogEntry, LogCategory, LogEntryId};
pub use status::{
    EffectId, EffectModifier, EffectTemplate, Immunities, ImmunityKind, StatusEffect,
    StatusEffects,
};

use crate::env::{BossDefinition, RollContext, compute_seed};

/// Discrete lifecycle state of a session.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Phase {
    Initiative,
    PlayerTurn,
    BossTurn,
    Victory,
    Defeat,
}

impl Phase {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// Which combatant a turn, roll, or action belongs to.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Boss,
}

impl Side {
    pub const fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Boss,
            Side::Boss => Side::Player,
        }
    }

    const fn roll_actor(&self) -> u32 {
        match self {
            Side::Player => 0,
            Side::Boss => 1,
        }
    }
}

/// Seed, roll counter, and id allocators that make a session reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollState {
    /// Chosen at session creation and never modified.
    pub seed: u64,
    /// Number of random draws performed so far.
    pub nonce: u64,
    next_effect_id: u32,
}

impl RollState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            nonce: 0,
            next_effect_id: 1,
        }
    }

    /// Seed for the next random draw; advances the nonce.
    pub fn next_seed(&mut self, side: Side, context: RollContext) -> u64 {
        let seed = compute_seed(self.seed, self.nonce, side.roll_actor(), context);
        self.nonce += 1;
        seed
    }

    pub fn allocate_effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect_id);
        self.next_effect_id += 1;
        id
    }
}

/// Aggregate root of one combat encounter.
///
/// Owned exclusively by the caller for its whole lifetime; discarding it ends
/// the encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    pub(crate) phase: Phase,
    pub(crate) current_turn: Side,
    /// Starts at 1; increments each time control returns to the player after
    /// a boss turn.
    pub(crate) round: u32,
    pub(crate) player: Combatant,
    pub(crate) boss: Combatant,
    pub(crate) log: CombatLog,
    /// UI debounce: set after a resolved action, cleared by the caller.
    pub(crate) animating: bool,
    pub(crate) encounter: BossDefinition,
    pub(crate) rolls: RollState,
}

impl CombatSession {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn boss(&self) -> &Combatant {
        &self.boss
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Boss => &self.boss,
        }
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn boss_id(&self) -> &str {
        &self.encounter.id
    }

    /// Static definition of the boss being fought.
    pub fn encounter(&self) -> &BossDefinition {
        &self.encounter
    }

    pub fn seed(&self) -> u64 {
        self.rolls.seed
    }

    pub fn rolls(&self) -> &RollState {
        &self.rolls
    }

    /// Returns `(actor, opponent)` as mutable borrows.
    pub(crate) fn sides_mut(&mut self, actor: Side) -> (&mut Combatant, &mut Combatant) {
        match actor {
            Side::Player => (&mut self.player, &mut self.boss),
            Side::Boss => (&mut self.boss, &mut self.player),
        }
    }
}
