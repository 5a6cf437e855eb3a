use clap::Parser;
use quest_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up QUEST_DATA_FILE, QUEST_API_PORT, etc.
    let _ = dotenvy::dotenv();

    let config = quest_api::config::config();
    config.logging.init();
    tracing::debug!("Starting in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = quest_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
