//! Boss definitions and the catalog oracle.
//!
//! Encounters are data: each boss is described by a [`BossDefinition`], and
//! every encounter also carries the ability set offered to the player for
//! that fight. Catalogs are supplied by `combat-content` (built-in RON data or
//! files on disk) and never change while a session is running.

use crate::action::CombatAction;

/// Static description of a boss encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossDefinition {
    pub id: String,
    pub name: String,
    /// Starting and maximum HP.
    pub max_hp: u32,
    /// Defense stat; `None` falls back to `CombatConfig::boss_defense`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub defense: Option<u32>,
    /// Abilities the boss picks from uniformly at random each turn.
    pub abilities: Vec<CombatAction>,
    /// Narration shown once the boss falls.
    pub victory_text: String,
    /// Reward token granted for the victory.
    pub sigil_reward: String,
}

impl BossDefinition {
    pub fn ability(&self, id: &str) -> Option<&CombatAction> {
        self.abilities.iter().find(|ability| ability.id == id)
    }
}

/// Oracle providing boss definitions and per-encounter player abilities.
pub trait CatalogOracle: Send + Sync {
    /// Returns the boss registered under `boss_id`.
    fn boss(&self, boss_id: &str) -> Option<&BossDefinition>;

    /// Returns the abilities offered to the player when fighting `boss_id`.
    ///
    /// Ability sets differ per boss. An empty slice means the encounter has
    /// no player abilities configured.
    fn player_abilities(&self, boss_id: &str) -> &[CombatAction];

    /// Ids of every registered boss, in presentation order.
    fn boss_ids(&self) -> Vec<String>;

    /// Looks up a single player ability for an encounter.
    fn player_ability(&self, boss_id: &str, ability_id: &str) -> Option<&CombatAction> {
        self.player_abilities(boss_id)
            .iter()
            .find(|ability| ability.id == ability_id)
    }
}
