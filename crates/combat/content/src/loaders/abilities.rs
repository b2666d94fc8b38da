//! Player ability set loader.

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::CombatAction;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Player ability sets keyed by boss id, as stored in RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilitySets {
    /// Set offered in encounters that have none of their own.
    #[serde(default)]
    pub fallback: Option<String>,
    pub sets: BTreeMap<String, Vec<CombatAction>>,
}

impl AbilitySets {
    /// Abilities for `boss_id`, falling back to the `fallback` set.
    pub fn for_boss(&self, boss_id: &str) -> &[CombatAction] {
        self.sets
            .get(boss_id)
            .or_else(|| self.fallback.as_ref().and_then(|id| self.sets.get(id)))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Loader for player ability sets from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability sets from a RON file.
    pub fn load(path: &Path) -> LoadResult<AbilitySets> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid ability sets {}: {}", path.display(), e))
    }

    /// Parse and validate ability sets from RON text.
    pub fn parse(content: &str) -> LoadResult<AbilitySets> {
        let sets: AbilitySets = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability sets RON: {}", e))?;

        if let Some(fallback) = &sets.fallback {
            if !sets.sets.contains_key(fallback) {
                anyhow::bail!("Fallback ability set '{}' is not defined", fallback);
            }
        }
        for (boss_id, abilities) in &sets.sets {
            for ability in abilities {
                ability.validate_dice().map_err(|e| {
                    anyhow::anyhow!("Ability set '{}' ability '{}': {}", boss_id, ability.id, e)
                })?;
            }
        }

        tracing::debug!(sets = sets.sets.len(), "loaded player ability sets");
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETS: &str = r#"(
        fallback: Some("gremlin"),
        sets: {
            "gremlin": [
                (
                    id: "patch",
                    name: "Hotfix",
                    description: "Quick repair.",
                    kind: Heal,
                    damage: Some((dice: "1d4", modifier: 2, kind: Healing)),
                    effects: Some((self_target: true)),
                ),
            ],
        },
    )"#;

    #[test]
    fn unknown_boss_uses_fallback_set() {
        let sets = AbilityLoader::parse(SETS).unwrap();
        assert_eq!(sets.for_boss("gremlin").len(), 1);
        assert_eq!(sets.for_boss("someone-else")[0].id, "patch");
    }

    #[test]
    fn missing_fallback_set_is_rejected() {
        let broken = SETS.replace(r#"Some("gremlin")"#, r#"Some("nobody")"#);
        assert!(AbilityLoader::parse(&broken).is_err());
    }

    #[test]
    fn no_fallback_means_no_abilities() {
        let sets = AbilitySets::default();
        assert!(sets.for_boss("gremlin").is_empty());
    }
}
