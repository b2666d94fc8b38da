//! Combat configuration loader.

use std::path::Path;

use combat_core::{CombatConfig, DiceExpr};

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing CombatConfig
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config from TOML text. Omitted keys keep their defaults.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if DiceExpr::new(1, config.initiative_die).is_none() {
            anyhow::bail!(
                "initiative_die must be between 1 and {}",
                DiceExpr::MAX_SIDES
            );
        }
        if config.player.max_hp == 0 {
            anyhow::bail!("player max_hp must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CombatConfig::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let config = ConfigLoader::parse(
            r#"
            boss_initiative_bonus = 4

            [player]
            max_hp = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.boss_initiative_bonus, 4);
        assert_eq!(config.player.max_hp, 120);
        assert_eq!(config.player.name, "Paladin");
        assert_eq!(config.initiative_die, 20);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "player_initiative_bonus = 5").unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.player_initiative_bonus, 5);
    }

    #[test]
    fn rejects_zero_sided_initiative_die() {
        assert!(ConfigLoader::parse("initiative_die = 0").is_err());
    }

    #[test]
    fn rejects_oversized_initiative_die() {
        assert!(ConfigLoader::parse("initiative_die = 4294967295").is_err());
        assert_eq!(
            ConfigLoader::parse("initiative_die = 1000").unwrap().initiative_die,
            1000
        );
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let bundled = include_str!("../../data/combat.toml");
        assert_eq!(ConfigLoader::parse(bundled).unwrap(), CombatConfig::default());
    }
}
