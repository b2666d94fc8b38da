//! Glue code tying content, configuration, and the runtime together.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use combat_content::{ConfigLoader, ContentCatalog};
use combat_core::{BossDefinition, CombatConfig};
use combat_runtime::{CombatRuntime, RuntimeConfig};

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct AppOptions {
    /// Directory holding `bosses.ron` and `abilities.ron` (defaults to the
    /// built-in realms)
    #[arg(long, env = "REALM_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Combat rules file (`combat.toml`)
    #[arg(long, env = "REALM_COMBAT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Skip the pauses between turns
    #[arg(long, global = true)]
    pub instant: bool,
}

/// Loaded content plus a runtime ready to start sessions.
pub struct App {
    catalog: Arc<ContentCatalog>,
    runtime: CombatRuntime,
}

impl App {
    pub fn load(options: &AppOptions) -> Result<Self> {
        let catalog = match &options.data_dir {
            Some(dir) => ContentCatalog::load(dir)
                .with_context(|| format!("loading content from {}", dir.display()))?,
            None => ContentCatalog::builtin().context("loading built-in realms")?,
        };
        let combat_config = match &options.config {
            Some(path) => ConfigLoader::load(path)?,
            None => CombatConfig::default(),
        };
        let runtime_config = if options.instant {
            RuntimeConfig::instant()
        } else {
            RuntimeConfig::from_env()
        };
        tracing::debug!(realms = catalog.len(), ?runtime_config, "content loaded");

        let catalog = Arc::new(catalog);
        let runtime = CombatRuntime::builder()
            .catalog(catalog.clone())
            .combat_config(combat_config)
            .config(runtime_config)
            .build()?;
        Ok(Self { catalog, runtime })
    }

    pub fn runtime(&self) -> &CombatRuntime {
        &self.runtime
    }

    /// Bosses in campaign order.
    pub fn bosses(&self) -> &[BossDefinition] {
        self.catalog.bosses()
    }

    pub fn boss(&self, boss_id: &str) -> Option<&BossDefinition> {
        self.bosses().iter().find(|boss| boss.id == boss_id)
    }

    pub fn player_name(&self) -> &str {
        &self.runtime.combat_config().player.name
    }
}
