use crate::dice::DiceExpr;

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Template for the player-controlled combatant.
    pub player: PlayerTemplate,
    /// Sides of the initiative die.
    pub initiative_die: u32,
    /// Flat bonus added to the player's initiative roll.
    pub player_initiative_bonus: i32,
    /// Flat bonus added to the boss's initiative roll.
    pub boss_initiative_bonus: i32,
    /// Defense used for bosses that do not declare one.
    pub boss_defense: u32,
}

/// Stats of the player-controlled combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlayerTemplate {
    pub id: String,
    pub name: String,
    pub max_hp: u32,
    pub defense: u32,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_INITIATIVE_DIE: u32 = 20;
    pub const DEFAULT_PLAYER_INITIATIVE_BONUS: i32 = 2;
    pub const DEFAULT_BOSS_INITIATIVE_BONUS: i32 = 1;
    pub const DEFAULT_BOSS_DEFENSE: u32 = 12;

    pub fn new() -> Self {
        Self {
            player: PlayerTemplate::default(),
            initiative_die: Self::DEFAULT_INITIATIVE_DIE,
            player_initiative_bonus: Self::DEFAULT_PLAYER_INITIATIVE_BONUS,
            boss_initiative_bonus: Self::DEFAULT_BOSS_INITIATIVE_BONUS,
            boss_defense: Self::DEFAULT_BOSS_DEFENSE,
        }
    }

    pub fn with_player(player: PlayerTemplate) -> Self {
        Self {
            player,
            ..Self::new()
        }
    }

    /// The initiative die as a dice expression (`1d<initiative_die>`).
    pub fn initiative_dice(&self) -> DiceExpr {
        DiceExpr::new(1, self.initiative_die).unwrap_or(DiceExpr::D20)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerTemplate {
    pub const DEFAULT_ID: &'static str = "paladin";
    pub const DEFAULT_NAME: &'static str = "Paladin";
    pub const DEFAULT_MAX_HP: u32 = 100;
    pub const DEFAULT_DEFENSE: u32 = 15;
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            name: Self::DEFAULT_NAME.to_string(),
            max_hp: Self::DEFAULT_MAX_HP,
            defense: Self::DEFAULT_DEFENSE,
        }
    }
}
