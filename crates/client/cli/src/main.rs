//! Realm combat client binary.
//!
//! Composition root: loads content and configuration, builds the combat
//! runtime, and dispatches to a subcommand.
//!
//! # Examples
//!
//! ```bash
//! realm list
//! realm fight docker-tiamat --seed 7
//! realm fight shadowcloud --input stdin
//! realm campaign --seed 42 --instant
//! ```

mod app;
mod commands;
mod context;
mod input;
mod presentation;

use anyhow::Result;
use clap::Parser;

use app::{App, AppOptions};
use commands::{Campaign, Fight, List};

/// Turn-based boss battles across the five realms
#[derive(Parser)]
#[command(name = "realm")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: AppOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List the realms and their bosses
    List(List),

    /// Fight a single boss
    Fight(Fight),

    /// Fight every realm in order
    Campaign(Campaign),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::load(&cli.options)?;

    match cli.command {
        Command::List(cmd) => cmd.execute(&app),
        Command::Fight(cmd) => cmd.execute(&app).await,
        Command::Campaign(cmd) => cmd.execute(&app).await,
    }
}
