//! Boss catalog oracle backed by loaded content.

use std::collections::BTreeMap;

use combat_core::{BossDefinition, CatalogOracle, CombatAction};

/// Bosses plus the player ability set offered against each of them.
///
/// Bosses keep the order they were declared in, which is also the campaign
/// order presented by clients.
#[derive(Clone, Debug, Default)]
pub struct ContentCatalog {
    bosses: Vec<BossDefinition>,
    ability_sets: BTreeMap<String, Vec<CombatAction>>,
    fallback: Option<String>,
}

impl ContentCatalog {
    /// Builds a catalog from already-validated parts.
    pub fn new(
        bosses: Vec<BossDefinition>,
        ability_sets: BTreeMap<String, Vec<CombatAction>>,
        fallback: Option<String>,
    ) -> Self {
        for boss_id in ability_sets.keys() {
            if !bosses.iter().any(|boss| &boss.id == boss_id) {
                tracing::warn!(boss = %boss_id, "ability set references unknown boss");
            }
        }
        Self {
            bosses,
            ability_sets,
            fallback,
        }
    }

    pub fn bosses(&self) -> &[BossDefinition] {
        &self.bosses
    }

    pub fn len(&self) -> usize {
        self.bosses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bosses.is_empty()
    }
}

#[cfg(feature = "loaders")]
mod loading {
    use std::path::Path;

    use super::ContentCatalog;
    use crate::loaders::{AbilityLoader, AbilitySets, BossLoader, LoadResult};

    const BUILTIN_BOSSES: &str = include_str!("../data/bosses.ron");
    const BUILTIN_ABILITIES: &str = include_str!("../data/abilities.ron");

    impl ContentCatalog {
        /// The five built-in realms and their paladin ability sets.
        pub fn builtin() -> LoadResult<Self> {
            let bosses = BossLoader::parse(BUILTIN_BOSSES)?;
            let abilities = AbilityLoader::parse(BUILTIN_ABILITIES)?;
            Ok(Self::from_parts(bosses, abilities))
        }

        /// Loads a catalog from a content directory.
        ///
        /// # Directory Structure
        ///
        /// ```text
        /// data_dir/
        /// ├── bosses.ron
        /// └── abilities.ron
        /// ```
        pub fn load(data_dir: &Path) -> LoadResult<Self> {
            let bosses = BossLoader::load(&data_dir.join("bosses.ron"))?;
            let abilities = AbilityLoader::load(&data_dir.join("abilities.ron"))?;
            Ok(Self::from_parts(bosses, abilities))
        }

        fn from_parts(
            bosses: Vec<combat_core::BossDefinition>,
            abilities: AbilitySets,
        ) -> Self {
            Self::new(bosses, abilities.sets, abilities.fallback)
        }
    }
}

impl CatalogOracle for ContentCatalog {
    fn boss(&self, boss_id: &str) -> Option<&BossDefinition> {
        self.bosses.iter().find(|boss| boss.id == boss_id)
    }

    fn player_abilities(&self, boss_id: &str) -> &[CombatAction] {
        self.ability_sets
            .get(boss_id)
            .or_else(|| {
                self.fallback
                    .as_ref()
                    .and_then(|fallback| self.ability_sets.get(fallback))
            })
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn boss_ids(&self) -> Vec<String> {
        self.bosses.iter().map(|boss| boss.id.clone()).collect()
    }
}

#[cfg(all(test, feature = "loaders"))]
mod tests {
    use super::*;
    use combat_core::testing::QueuedRolls;
    use combat_core::{
        ActionKind, CombatConfig, CombatEngine, EffectModifier, Env, FixedClock, Phase,
    };
    use std::fs;

    const REALMS: [&str; 5] = [
        "docker-tiamat",
        "proxy-valheim",
        "shadowcloud",
        "silent-watcher",
        "terraform-lich",
    ];

    #[test]
    fn builtin_catalog_has_five_realms_in_order() {
        let catalog = ContentCatalog::builtin().unwrap();
        assert_eq!(catalog.boss_ids(), REALMS);
        for realm in REALMS {
            assert_eq!(catalog.player_abilities(realm).len(), 4, "{realm}");
        }
    }

    #[test]
    fn builtin_stats_match_realm_lore() {
        let catalog = ContentCatalog::builtin().unwrap();
        let tiamat = catalog.boss("docker-tiamat").unwrap();
        assert_eq!(tiamat.max_hp, 45);
        assert_eq!(tiamat.sigil_reward, "Sigil of Build");
        assert_eq!(catalog.boss("terraform-lich").unwrap().max_hp, 55);

        let smite = catalog
            .player_ability("docker-tiamat", "judgment-strike")
            .unwrap();
        let damage = smite.damage.as_ref().unwrap();
        assert_eq!((damage.dice.as_str(), damage.modifier), ("1d10", 15));

        let shield = catalog
            .player_ability("docker-tiamat", "divine-shield")
            .unwrap();
        assert_eq!(shield.kind, ActionKind::Buff);
        let template = shield.status_template().unwrap();
        assert!(template.modifiers.contains(&EffectModifier::PreventRegeneration));
        assert!(shield.targets_self());

        let mirage = catalog
            .boss("proxy-valheim")
            .unwrap()
            .ability("proxy-mirage")
            .unwrap();
        assert!(!mirage.targets_self());
    }

    #[test]
    fn unknown_encounter_uses_fallback_abilities() {
        let catalog = ContentCatalog::builtin().unwrap();
        let fallback = catalog.player_abilities("some-new-realm");
        assert_eq!(fallback[0].id, "judgment-strike");
        assert!(catalog.boss("some-new-realm").is_none());
    }

    #[test]
    fn builtin_encounter_starts_a_session() {
        let catalog = ContentCatalog::builtin().unwrap();
        let rng = QueuedRolls::new([20, 1, 10]);
        let clock = FixedClock(0);
        let config = CombatConfig::default();
        let env = Env::new(&catalog, &rng, &clock, &config).into_combat_env();

        let mut session = CombatEngine::start_session(env, "docker-tiamat", 9).unwrap();
        let smite = catalog
            .player_ability("docker-tiamat", "judgment-strike")
            .unwrap()
            .clone();
        let mut engine = CombatEngine::new(&mut session);
        engine.resolve_initiative(env);
        engine.submit_player_action(env, &smite).unwrap();

        assert_eq!(session.boss().hp(), 20);
        assert_eq!(session.phase(), Phase::BossTurn);
    }

    #[test]
    fn loads_catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bosses.ron"),
            include_str!("../data/bosses.ron"),
        )
        .unwrap();
        fs::write(
            dir.path().join("abilities.ron"),
            r#"(sets: { "shadowcloud": [] })"#,
        )
        .unwrap();

        let catalog = ContentCatalog::load(dir.path()).unwrap();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.player_abilities("shadowcloud").is_empty());
        assert!(catalog.player_abilities("docker-tiamat").is_empty());
    }

    #[test]
    fn missing_files_report_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentCatalog::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("bosses.ron"), "{err}");
    }
}
