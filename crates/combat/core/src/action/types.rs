//! Static ability definitions.
//!
//! Abilities are read-only configuration: the engine never mutates them. Both
//! the player's per-encounter ability sets and the boss ability lists use the
//! same [`CombatAction`] shape.

use crate::dice::{DiceError, DiceExpr};
use crate::state::EffectTemplate;

/// Broad category of an ability, deciding how it resolves.
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
pub enum ActionKind {
    /// Deals damage to the opponent; defender damage reduction applies.
    Attack,
    /// Restores the actor's HP.
    Heal,
    /// Applies a status effect.
    Buff,
    /// Applies a status effect and may deal unreduced damage.
    Special,
}

/// Flavor of a damage or healing roll.
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
pub enum DamageKind {
    Physical,
    Radiant,
    Healing,
}

/// A randomized value: dice notation plus a flat modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageSpec {
    /// Dice notation such as `1d10`.
    pub dice: String,
    pub modifier: i32,
    pub kind: DamageKind,
}

impl DamageSpec {
    pub fn new(dice: impl Into<String>, modifier: i32, kind: DamageKind) -> Self {
        Self {
            dice: dice.into(),
            modifier,
            kind,
        }
    }

    /// Parses the dice notation.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError`] when the configured notation is malformed.
    pub fn expr(&self) -> Result<DiceExpr, DiceError> {
        self.dice.parse()
    }

    /// Combines a dice total with the flat modifier, flooring at zero.
    pub fn total(&self, rolled: u32) -> u32 {
        (i64::from(rolled) + i64::from(self.modifier)).clamp(0, i64::from(u32::MAX)) as u32
    }
}

/// Secondary effects carried by an ability.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EffectBundle {
    /// Status effect instantiated when the ability resolves.
    pub status_effect: Option<EffectTemplate>,
    /// Apply `status_effect` to the actor (`true`) or the opponent (`false`).
    pub self_target: bool,
    /// Healing rolled for the actor in addition to an attack's damage.
    pub healing: Option<DamageSpec>,
}

/// A static, configuration-defined ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatAction {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Quoted into the combat log after the mechanical entries.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavor_text: String,
    pub kind: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<DamageSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Option<EffectBundle>,
    /// Informational only; abilities have no cooldown tracking.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<u32>,
}

impl CombatAction {
    /// Creates an ability with no damage, effects, or flavor text.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            flavor_text: String::new(),
            kind,
            damage: None,
            effects: None,
            cooldown: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_flavor(mut self, flavor_text: impl Into<String>) -> Self {
        self.flavor_text = flavor_text.into();
        self
    }

    pub fn with_damage(mut self, damage: DamageSpec) -> Self {
        self.damage = Some(damage);
        self
    }

    /// Attaches a status effect template targeting the actor or the opponent.
    pub fn with_status(mut self, template: EffectTemplate, self_target: bool) -> Self {
        let effects = self.effects.get_or_insert_with(EffectBundle::default);
        effects.status_effect = Some(template);
        effects.self_target = self_target;
        self
    }

    /// Attaches secondary healing for the actor.
    pub fn with_healing(mut self, healing: DamageSpec) -> Self {
        let effects = self.effects.get_or_insert_with(EffectBundle::default);
        effects.healing = Some(healing);
        effects.self_target = true;
        self
    }

    pub fn status_template(&self) -> Option<&EffectTemplate> {
        self.effects.as_ref()?.status_effect.as_ref()
    }

    pub fn secondary_healing(&self) -> Option<&DamageSpec> {
        self.effects.as_ref()?.healing.as_ref()
    }

    pub fn targets_self(&self) -> bool {
        self.effects.as_ref().is_some_and(|effects| effects.self_target)
    }

    /// Validates every dice expression referenced by this ability.
    ///
    /// # Errors
    ///
    /// Returns the first [`DiceError`] encountered.
    pub fn validate_dice(&self) -> Result<(), DiceError> {
        if let Some(damage) = &self.damage {
            damage.expr()?;
        }
        if let Some(healing) = self.secondary_healing() {
            healing.expr()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_floors_negative_modifiers_at_zero() {
        let spec = DamageSpec::new("1d4", -10, DamageKind::Physical);
        assert_eq!(spec.total(3), 0);
        assert_eq!(DamageSpec::new("1d10", 15, DamageKind::Radiant).total(10), 25);
    }

    #[test]
    fn total_saturates_instead_of_wrapping() {
        let spec = DamageSpec::new("1d6", i32::MAX, DamageKind::Physical);
        assert_eq!(spec.total(u32::MAX), u32::MAX);
    }

    #[test]
    fn validate_dice_rejects_oversized_sides() {
        let action = CombatAction::new("doom", "Doom", ActionKind::Attack).with_damage(
            DamageSpec::new("2d4294967295", 0, DamageKind::Physical),
        );
        assert!(action.validate_dice().is_err());
    }

    #[test]
    fn validate_dice_reports_secondary_healing() {
        let action = CombatAction::new("restore", "Restore", ActionKind::Attack)
            .with_damage(DamageSpec::new("1d5", 10, DamageKind::Radiant))
            .with_healing(DamageSpec::new("one-d-four", 8, DamageKind::Healing));
        assert!(action.validate_dice().is_err());
        assert!(action.targets_self());
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("ATTACK".parse::<ActionKind>().unwrap(), ActionKind::Attack);
        assert_eq!(ActionKind::Heal.to_string(), "heal");
        assert_eq!("radiant".parse::<DamageKind>().unwrap(), DamageKind::Radiant);
    }
}
