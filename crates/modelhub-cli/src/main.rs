use anyhow::Result;
use clap::{Parser, Subcommand};
use modelhub_core::ScrapeStatus;
use modelhub_storage::Store;
use modelhub_sync::{seed::seed_reference_data, SyncConfig};

#[derive(Debug, Parser)]
#[command(name = "modelhub-cli")]
#[command(about = "AI model comparison hub ingestion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the schema and seed the reference catalog.
    Init,
    /// Fetch every enabled source and reconcile into the store.
    Sync,
    /// Import news digest files from the digest directory.
    ImportDigests,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Init => {
            let config = SyncConfig::from_env();
            let store = Store::open(&config.database_url).await?;
            store.init_schema().await?;
            let created = seed_reference_data(&store).await?;
            println!("init complete: db={} models_seeded={}", config.database_url, created);
        }
        Commands::Sync => {
            let summary = modelhub_sync::run_sync_once_from_env().await?;
            for outcome in &summary.outcomes {
                match outcome.status {
                    ScrapeStatus::Success => {
                        println!("  {}: {} records", outcome.source, outcome.records_changed);
                    }
                    ScrapeStatus::Error => {
                        println!(
                            "  {}: failed ({})",
                            outcome.source,
                            outcome.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                }
            }
            println!(
                "sync complete: run_id={} sources={} failed={} total_records={}",
                summary.run_id,
                summary.outcomes.len(),
                summary.failed_sources(),
                summary.total_records
            );
        }
        Commands::ImportDigests => {
            let config = SyncConfig::from_env();
            let store = Store::open(&config.database_url).await?;
            store.init_schema().await?;
            let summary =
                modelhub_digest::import::import_digest_dir(&store, &config.digest_dir).await?;
            println!(
                "import complete: files={} failed={} items={}",
                summary.files_imported, summary.files_failed, summary.items_written
            );
        }
    }

    Ok(())
}
