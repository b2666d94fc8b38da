use anyhow::Result;
use clap::Parser;

use crate::app::App;

/// List the realms and their bosses
#[derive(Parser, Debug)]
pub struct List {}

impl List {
    pub fn execute(self, app: &App) -> Result<()> {
        for (index, boss) in app.bosses().iter().enumerate() {
            println!(
                "{}. {:<16} {} ({} HP) - {}",
                index + 1,
                boss.id,
                boss.name,
                boss.max_hp,
                boss.sigil_reward
            );
        }
        Ok(())
    }
}
