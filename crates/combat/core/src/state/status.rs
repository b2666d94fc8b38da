//! Status effect system for combatants.
//!
//! Status effects are timed modifiers attached to a combatant. Each effect
//! carries a list of tagged [`EffectModifier`]s that the engine looks up by
//! kind, so new modifier types do not grow a flat field list.
//!
//! # Turn-based Duration
//!
//! Durations count boss-turn ends. At the end of every boss turn each effect
//! on both sides loses one turn and effects at zero are pruned, so an effect
//! applied with duration 1 survives exactly until the next boss turn ends.
//!
//! Reapplying an effect appends a new instance; the same name may be active
//! several times at once.

use bitflags::bitflags;
use core::fmt;

/// Unique identifier of a status effect instance within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u32);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Effects the bosses inflict that a combatant can be made immune to.
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
pub enum ImmunityKind {
    Mirage,
    Eclipse,
    Blind,
    Rollback,
    Drift,
    Merge,
}

bitflags! {
    /// Set of immunities granted by a combatant's active effects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Immunities: u8 {
        const MIRAGE   = 1 << 0;
        const ECLIPSE  = 1 << 1;
        const BLIND    = 1 << 2;
        const ROLLBACK = 1 << 3;
        const DRIFT    = 1 << 4;
        const MERGE    = 1 << 5;
    }
}

impl From<ImmunityKind> for Immunities {
    fn from(kind: ImmunityKind) -> Self {
        match kind {
            ImmunityKind::Mirage => Immunities::MIRAGE,
            ImmunityKind::Eclipse => Immunities::ECLIPSE,
            ImmunityKind::Blind => Immunities::BLIND,
            ImmunityKind::Rollback => Immunities::ROLLBACK,
            ImmunityKind::Drift => Immunities::DRIFT,
            ImmunityKind::Merge => Immunities::MERGE,
        }
    }
}

/// A single capability granted by a status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectModifier {
    /// Fraction of incoming attack damage removed (0.5 halves it). Negative
    /// fractions amplify damage; zero is inert.
    DamageReduction(f64),
    /// Flat defense bonus.
    DefenseBonus(i32),
    /// Blocks the carrier's own heal abilities.
    PreventRegeneration,
    /// Fraction of accuracy lost.
    AccuracyReduction(f64),
    /// Flat accuracy bonus.
    AccuracyBonus(i32),
    /// Fraction of the next hit reflected back.
    Reflection(f64),
    Immunity(ImmunityKind),
    /// Prevents configuration drift.
    PreventDrift,
    /// Cancels Fog of Logs.
    CancelsFog,
}

/// Configuration-side description of a status effect, without an id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTemplate {
    pub name: String,
    pub description: String,
    /// Turns the effect lasts.
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<EffectModifier>,
}

impl EffectTemplate {
    pub fn new(name: impl Into<String>, description: impl Into<String>, duration: u32) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            duration,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: EffectModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Creates a live effect instance carrying `id`.
    pub fn instantiate(&self, id: EffectId) -> StatusEffect {
        StatusEffect {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            duration: self.duration,
            modifiers: self.modifiers.clone(),
        }
    }
}

/// An active status effect instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: EffectId,
    pub name: String,
    pub description: String,
    /// Remaining turns.
    pub duration: u32,
    pub modifiers: Vec<EffectModifier>,
}

impl StatusEffect {
    pub fn damage_reduction(&self) -> Option<f64> {
        self.modifiers.iter().find_map(|modifier| match modifier {
            EffectModifier::DamageReduction(fraction) if *fraction != 0.0 => Some(*fraction),
            _ => None,
        })
    }

    pub fn prevents_regeneration(&self) -> bool {
        self.modifiers
            .iter()
            .any(|modifier| matches!(modifier, EffectModifier::PreventRegeneration))
    }

    pub fn immunities(&self) -> Immunities {
        self.modifiers
            .iter()
            .filter_map(|modifier| match modifier {
                EffectModifier::Immunity(kind) => Some(Immunities::from(*kind)),
                _ => None,
            })
            .fold(Immunities::empty(), |acc, flag| acc | flag)
    }

    fn defense_bonus(&self) -> i32 {
        self.modifiers
            .iter()
            .map(|modifier| match modifier {
                EffectModifier::DefenseBonus(bonus) => *bonus,
                _ => 0,
            })
            .sum()
    }
}

/// Ordered list of active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends an effect. Existing effects with the same name are kept.
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, id: EffectId) -> Option<&StatusEffect> {
        self.effects.iter().find(|effect| effect.id == id)
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.effects.iter().any(|effect| effect.name == name)
    }

    /// The first effect carrying a damage reduction, with its fraction.
    ///
    /// Reductions never stack: only the earliest-applied one counts.
    pub fn first_damage_reduction(&self) -> Option<(&StatusEffect, f64)> {
        self.effects
            .iter()
            .find_map(|effect| effect.damage_reduction().map(|fraction| (effect, fraction)))
    }

    /// The first effect blocking regeneration, if any.
    pub fn regeneration_blocker(&self) -> Option<&StatusEffect> {
        self.effects
            .iter()
            .find(|effect| effect.prevents_regeneration())
    }

    pub fn immunities(&self) -> Immunities {
        self.effects
            .iter()
            .fold(Immunities::empty(), |acc, effect| acc | effect.immunities())
    }

    pub fn defense_bonus(&self) -> i32 {
        self.effects.iter().map(StatusEffect::defense_bonus).sum()
    }

    /// Decrements every duration by one turn and removes effects that reach
    /// zero. Returns the removed effects in application order.
    pub fn tick(&mut self) -> Vec<StatusEffect> {
        for effect in &mut self.effects {
            effect.duration = effect.duration.saturating_sub(1);
        }
        let (expired, active): (Vec<_>, Vec<_>) = self
            .effects
            .drain(..)
            .partition(|effect| effect.duration == 0);
        self.effects = active;
        expired
    }
}
