//! Subcommands of the `realm` binary.

mod campaign;
mod fight;
mod list;

pub use campaign::Campaign;
pub use fight::Fight;
pub use list::List;

use anyhow::Result;
use clap::ValueEnum;
use combat_core::SessionSummary;
use combat_runtime::{ActionProvider, RandomProvider};

use crate::app::App;
use crate::input::StdinProvider;
use crate::presentation::{self, OutputMode};

/// Where player choices come from.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputSource {
    /// Random abilities, seeded from the battle seed
    #[default]
    Auto,
    /// Read choices from standard input
    Stdin,
}

impl InputSource {
    fn provider(self, seed: u64) -> Box<dyn ActionProvider> {
        match self {
            InputSource::Auto => Box::new(RandomProvider::from_seed(seed)),
            InputSource::Stdin => Box::new(StdinProvider::new()),
        }
    }
}

/// Runs one battle to completion, streaming its log.
async fn run_battle(
    app: &App,
    boss_id: &str,
    seed: u64,
    input: InputSource,
    mode: OutputMode,
) -> Result<SessionSummary> {
    let handle = app.runtime().start_session(boss_id, seed)?;
    tracing::info!(boss = boss_id, seed, ?input, "battle started");

    let opening = handle.snapshot().await?;
    presentation::print_entries(opening.log().entries(), mode)?;

    let printer = tokio::spawn(presentation::print_events(handle.subscribe(), mode));
    let provider = input.provider(seed);
    let outcome = handle.run_to_completion(provider.as_ref()).await;
    if outcome.is_err() && handle.end().await.is_err() {
        // Worker already gone; nothing will close the event stream.
        printer.abort();
    }
    match printer.await {
        Ok(printed) => printed?,
        Err(err) if err.is_cancelled() => {}
        Err(err) => return Err(err.into()),
    }

    let summary = outcome?;
    presentation::print_summary(&summary, mode)?;
    Ok(summary)
}
