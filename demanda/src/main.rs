// demanda/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug demanda run ... for the details
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { project_dir, input } => commands::run::execute(project_dir, input).await,
        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
        Commands::Inspect { input, limit } => commands::inspect::execute(input, limit).await,
        Commands::Dashboard {
            input,
            period,
            team,
            debug,
        } => commands::dashboard::execute(input, period, team, debug).await,
    }
}
