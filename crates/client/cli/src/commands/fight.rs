use anyhow::{Result, bail};
use clap::Parser;

use super::{InputSource, run_battle};
use crate::app::App;
use crate::presentation::OutputMode;

/// Fight a single boss
#[derive(Parser, Debug)]
pub struct Fight {
    /// Boss id (see `realm list`)
    pub boss: String,

    /// Battle seed; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where player choices come from
    #[arg(long, value_enum, default_value_t = InputSource::Auto)]
    pub input: InputSource,

    /// Emit events and the summary as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Fight {
    pub async fn execute(self, app: &App) -> Result<()> {
        let Some(boss) = app.boss(&self.boss) else {
            bail!("unknown boss '{}' (try `realm list`)", self.boss);
        };
        let seed = self.seed.unwrap_or_else(rand::random);
        let mode = if self.json {
            OutputMode::Json
        } else {
            println!("⚔ {} vs {} ⚔  (seed {seed})", app.player_name(), boss.name);
            OutputMode::Text
        };

        let summary = run_battle(app, &self.boss, seed, self.input, mode).await?;
        tracing::info!(boss = %summary.boss_id, phase = %summary.phase, seed, "battle finished");
        Ok(())
    }
}
