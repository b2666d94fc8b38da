//! Combatant state: identity, stats, and active effects.

use super::status::StatusEffects;

/// Mutable combat stats of one side.
///
/// `hp` is private so that every mutation goes through the clamping helpers
/// on [`Combatant`]; `0 <= hp <= max_hp` holds at all times.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    hp: u32,
    pub max_hp: u32,
    pub defense: u32,
    /// Total of the last initiative roll (die + bonus), 0 before initiative.
    pub initiative: i32,
}

impl CombatStats {
    /// Creates stats at full health.
    pub const fn at_max(max_hp: u32, defense: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            defense,
            initiative: 0,
        }
    }

    pub const fn hp(&self) -> u32 {
        self.hp
    }
}

/// Either side of a combat session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub stats: CombatStats,
    pub status_effects: StatusEffects,
    pub is_player: bool,
}

impl Combatant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        stats: CombatStats,
        is_player: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stats,
            status_effects: StatusEffects::empty(),
            is_player,
        }
    }

    pub const fn hp(&self) -> u32 {
        self.stats.hp
    }

    pub const fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub const fn is_defeated(&self) -> bool {
        self.stats.hp == 0
    }

    /// Defense including bonuses from active effects.
    pub fn effective_defense(&self) -> i32 {
        self.stats.defense as i32 + self.status_effects.defense_bonus()
    }

    /// Reduces HP by `amount`, clamped at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.stats.hp);
        self.stats.hp -= lost;
        lost
    }

    /// Restores up to `amount` HP, capped at max HP. Returns the HP actually
    /// restored (`min(amount, max_hp - hp)`).
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.stats.max_hp.saturating_sub(self.stats.hp));
        self.stats.hp += restored;
        restored
    }

    /// Sets HP directly, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: u32) {
        self.stats.hp = hp.min(self.stats.max_hp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paladin() -> Combatant {
        Combatant::new("paladin", "Paladin", CombatStats::at_max(100, 15), true)
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut combatant = paladin();
        assert_eq!(combatant.take_damage(30), 30);
        assert_eq!(combatant.hp(), 70);
        assert_eq!(combatant.take_damage(500), 70);
        assert_eq!(combatant.hp(), 0);
        assert!(combatant.is_defeated());
    }

    #[test]
    fn heal_reports_amount_actually_applied() {
        let mut combatant = paladin();
        combatant.set_hp(97);
        assert_eq!(combatant.heal(20), 3);
        assert_eq!(combatant.hp(), 100);
        assert_eq!(combatant.heal(5), 0);
    }

    #[test]
    fn set_hp_clamps_to_max() {
        let mut combatant = paladin();
        combatant.set_hp(250);
        assert_eq!(combatant.hp(), combatant.max_hp());
    }
}
