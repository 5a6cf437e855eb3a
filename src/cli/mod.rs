pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "quest-api")]
#[command(about = "Quest tracking REST API backed by an embedded document store")]
#[command(version)]
pub struct Cli {
    /// Defaults to `serve` with configured settings
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Insert the quests of a seed file into the data file and exit")]
    Seed(commands::seed::SeedArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::Seed(args)) => commands::seed::handle(args).await,
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
    }
}
