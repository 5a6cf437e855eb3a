use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::config;
use crate::database::{Datastore, QuestRepository};

#[derive(Args, Debug)]
pub struct SeedArgs {
    #[arg(long, help = "Seed file, a JSON array of quests (defaults to QUEST_SEED_FILE)")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Data file path (overrides QUEST_DATA_FILE)")]
    pub data: Option<PathBuf>,
}

pub async fn handle(args: SeedArgs) -> anyhow::Result<()> {
    let config = config::config();
    let file = args.file.unwrap_or_else(|| config.store.seed_file.clone());
    let data = args.data.unwrap_or_else(|| config.store.data_file.clone());

    let store = Datastore::open(&data)
        .await
        .with_context(|| format!("failed to open data file {}", data.display()))?;
    let repository = QuestRepository::new(Arc::new(store));

    let inserted = repository
        .seed_from_file(&file)
        .await
        .with_context(|| format!("failed to seed from {}", file.display()))?;

    println!("✓ Inserted {} quests from {} into {}", inserted.len(), file.display(), data.display());
    Ok(())
}
