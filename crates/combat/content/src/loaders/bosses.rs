//! Boss catalog loader.

use std::collections::HashSet;
use std::path::Path;

use combat_core::BossDefinition;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Boss catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossCatalogFile {
    pub bosses: Vec<BossDefinition>,
}

/// Loader for boss definitions from RON files.
pub struct BossLoader;

impl BossLoader {
    /// Load boss definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<BossDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid boss catalog {}: {}", path.display(), e))
    }

    /// Parse and validate boss definitions from RON text.
    ///
    /// Rejects duplicate ids, bosses without abilities, and malformed dice so
    /// that broken content never reaches a session.
    pub fn parse(content: &str) -> LoadResult<Vec<BossDefinition>> {
        let catalog: BossCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse boss catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for boss in &catalog.bosses {
            if !seen.insert(boss.id.as_str()) {
                anyhow::bail!("Duplicate boss id '{}'", boss.id);
            }
            if boss.abilities.is_empty() {
                anyhow::bail!("Boss '{}' has no abilities", boss.id);
            }
            if boss.max_hp == 0 {
                anyhow::bail!("Boss '{}' has zero max HP", boss.id);
            }
            for ability in &boss.abilities {
                ability.validate_dice().map_err(|e| {
                    anyhow::anyhow!("Boss '{}' ability '{}': {}", boss.id, ability.id, e)
                })?;
            }
        }

        tracing::debug!(count = catalog.bosses.len(), "loaded boss catalog");
        Ok(catalog.bosses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREMLIN: &str = r#"(
        id: "gremlin",
        name: "Build Gremlin",
        max_hp: 20,
        defense: Some(9),
        victory_text: "The build is green.",
        sigil_reward: "Sigil of CI",
        abilities: [
            (
                id: "flake",
                name: "Flaky Test",
                description: "Fails sometimes.",
                kind: Attack,
                damage: Some((dice: "2d4", modifier: 1, kind: Physical)),
            ),
        ],
    )"#;

    fn catalog(bosses: &[&str]) -> String {
        format!("(bosses: [{}])", bosses.join(", "))
    }

    #[test]
    fn parses_minimal_boss() {
        let bosses = BossLoader::parse(&catalog(&[GREMLIN])).unwrap();
        assert_eq!(bosses.len(), 1);
        let boss = &bosses[0];
        assert_eq!(boss.defense, Some(9));
        assert_eq!(boss.abilities[0].flavor_text, "");
        assert!(boss.ability("flake").is_some());
    }

    #[test]
    fn rejects_malformed_dice() {
        let broken = GREMLIN.replace("2d4", "2x4");
        let err = BossLoader::parse(&catalog(&[&broken])).unwrap_err();
        assert!(err.to_string().contains("flake"), "{err}");
    }

    #[test]
    fn rejects_oversized_dice() {
        let huge = GREMLIN.replace("2d4", "2d4294967295");
        let err = BossLoader::parse(&catalog(&[&huge])).unwrap_err();
        assert!(err.to_string().contains("flake"), "{err}");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = BossLoader::parse(&catalog(&[GREMLIN, GREMLIN])).unwrap_err();
        assert!(err.to_string().contains("Duplicate"), "{err}");
    }
}
