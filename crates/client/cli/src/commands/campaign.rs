use anyhow::Result;
use clap::Parser;

use super::{InputSource, run_battle};
use crate::app::App;
use crate::context::GameContext;
use crate::presentation::OutputMode;

/// Fight every realm in order until the campaign is won or lost
#[derive(Parser, Debug)]
pub struct Campaign {
    /// Base seed; each battle offsets it by its realm index
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where player choices come from
    #[arg(long, value_enum, default_value_t = InputSource::Auto)]
    pub input: InputSource,
}

impl Campaign {
    pub async fn execute(self, app: &App) -> Result<()> {
        let base_seed = self.seed.unwrap_or_else(rand::random);
        let mut context = GameContext::new(app.player_name());
        let bosses = app.bosses();
        let total = bosses.len();

        for boss in context.remaining(bosses) {
            let index = bosses.iter().position(|other| other.id == boss.id).unwrap_or_default();
            println!("\n=== Realm {}/{}: {} ===", index + 1, total, boss.name);

            let seed = base_seed.wrapping_add(index as u64);
            let summary = run_battle(app, &boss.id, seed, self.input, OutputMode::Text).await?;
            if !context.record(&summary) {
                println!(
                    "\n{} falls in {}. Sigils earned: {}/{}",
                    context.character,
                    boss.name,
                    context.sigils().len(),
                    total
                );
                return Ok(());
            }
        }

        println!(
            "\nAll {} realms restored. Sigils: {}",
            total,
            context.sigils().join(", ")
        );
        Ok(())
    }
}
