//! Run orchestration: walks the registered sources in order, reconciles
//! each batch, and leaves a scrape-log trail behind.
//!
//! Sources are isolated from each other: one source failing to fetch or
//! normalize is recorded and the run moves on to the next source.

pub mod reconcile;
pub mod seed;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use modelhub_core::{ScrapeLogEntry, ScrapeStatus};
use modelhub_sources::{default_sources, source_for_id, ModelSource};
use modelhub_storage::db::append_scrape_log;
use modelhub_storage::{FetchConfig, HttpFetcher, Store, BOT_USER_AGENT};
use serde::Deserialize;
use tokio::fs;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Operator-maintained source roster, read from `sources.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRegistry {
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub source_id: String,
    pub display_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub database_url: String,
    pub sources_path: PathBuf,
    pub digest_dir: PathBuf,
    pub user_agent: String,
    pub http_timeout_secs: u64,
}

impl SyncConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("MODELHUB_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:modelhub.db".to_string()),
            sources_path: std::env::var("MODELHUB_SOURCES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("sources.yaml")),
            digest_dir: std::env::var("MODELHUB_DIGEST_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("digests")),
            user_agent: std::env::var("MODELHUB_USER_AGENT")
                .unwrap_or_else(|_| BOT_USER_AGENT.to_string()),
            http_timeout_secs: std::env::var("MODELHUB_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }
}

pub async fn load_source_registry(path: &std::path::Path) -> Result<SourceRegistry> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Per-source result within one run, mirroring its scrape-log row.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source: String,
    pub status: ScrapeStatus,
    pub records_changed: i64,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Records applied by sources that succeeded. Failed sources contribute
    /// nothing here.
    pub total_records: i64,
    pub outcomes: Vec<SourceOutcome>,
}

impl RunSummary {
    pub fn failed_sources(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == ScrapeStatus::Error)
            .count()
    }
}

pub struct Orchestrator {
    store: Store,
    http: HttpFetcher,
}

impl Orchestrator {
    pub fn new(store: Store, http: HttpFetcher) -> Self {
        Self { store, http }
    }

    pub fn from_config(store: Store, config: &SyncConfig) -> Result<Self> {
        let http = HttpFetcher::new(FetchConfig {
            timeout: Duration::from_secs(config.http_timeout_secs),
            user_agent: config.user_agent.clone(),
        })?;
        Ok(Self::new(store, http))
    }

    /// Run every enabled source from the registry. Ids with no registered
    /// implementation are recorded as errors in the trail.
    pub async fn run_registry(&self, registry: &SourceRegistry) -> Result<RunSummary> {
        let mut sources = Vec::new();
        let mut unknown = Vec::new();
        for config in registry.sources.iter().filter(|s| s.enabled) {
            match source_for_id(&config.source_id) {
                Some(source) => sources.push(source),
                None => unknown.push(config.source_id.clone()),
            }
        }
        self.run_inner(sources, unknown).await
    }

    /// Run the built-in source roster in its canonical order.
    pub async fn run_default(&self) -> Result<RunSummary> {
        self.run_inner(default_sources(), Vec::new()).await
    }

    pub async fn run(&self, sources: Vec<Box<dyn ModelSource>>) -> Result<RunSummary> {
        self.run_inner(sources, Vec::new()).await
    }

    async fn run_inner(
        &self,
        sources: Vec<Box<dyn ModelSource>>,
        unknown_ids: Vec<String>,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, sources = sources.len(), "sync run started");

        let mut outcomes = Vec::with_capacity(sources.len() + unknown_ids.len());
        let mut total_records = 0i64;

        for source_id in unknown_ids {
            let now = Utc::now();
            warn!(source = %source_id, "no source registered for id");
            let entry = ScrapeLogEntry {
                run_id,
                source: source_id.clone(),
                status: ScrapeStatus::Error,
                records_changed: 0,
                error: Some("no source registered for id".to_string()),
                started_at: now,
                finished_at: now,
            };
            append_scrape_log(self.store.pool(), &entry)
                .await
                .context("recording scrape log")?;
            outcomes.push(SourceOutcome {
                source: source_id,
                status: ScrapeStatus::Error,
                records_changed: 0,
                error: entry.error,
            });
        }

        for source in &sources {
            let source_id = source.source_id().to_string();
            let source_started = Utc::now();
            let result = self.sync_source(source.as_ref()).await;
            let source_finished = Utc::now();

            let outcome = match result {
                Ok(records) => {
                    info!(source = %source_id, records, "source reconciled");
                    total_records += records;
                    SourceOutcome {
                        source: source_id,
                        status: ScrapeStatus::Success,
                        records_changed: records,
                        error: None,
                    }
                }
                Err(err) => {
                    error!(source = %source_id, error = %err, "source failed");
                    SourceOutcome {
                        source: source_id,
                        status: ScrapeStatus::Error,
                        records_changed: 0,
                        error: Some(format!("{err:#}")),
                    }
                }
            };

            let entry = ScrapeLogEntry {
                run_id,
                source: outcome.source.clone(),
                status: outcome.status,
                records_changed: outcome.records_changed,
                error: outcome.error.clone(),
                started_at: source_started,
                finished_at: source_finished,
            };
            append_scrape_log(self.store.pool(), &entry)
                .await
                .context("recording scrape log")?;
            outcomes.push(outcome);
        }

        let finished_at = Utc::now();
        info!(
            %run_id,
            total_records,
            failed = outcomes.iter().filter(|o| o.status == ScrapeStatus::Error).count(),
            "sync run finished"
        );
        Ok(RunSummary {
            run_id,
            started_at,
            finished_at,
            total_records,
            outcomes,
        })
    }

    async fn sync_source(&self, source: &dyn ModelSource) -> Result<i64> {
        let raw = source.fetch_raw(&self.http).await.context("fetch")?;
        let batch = source.normalize(&raw).context("normalize")?;
        let models = reconcile::apply_models(&self.store, &batch.models)
            .await
            .context("applying models")?;
        let scores = reconcile::apply_scores(&self.store, &batch.scores)
            .await
            .context("applying scores")?;
        Ok((models + scores) as i64)
    }
}

/// Convenience entry point wired to the environment, as used by the CLI.
pub async fn run_sync_once_from_env() -> Result<RunSummary> {
    let config = SyncConfig::from_env();
    let store = Store::open(&config.database_url).await?;
    store.init_schema().await?;
    let orchestrator = Orchestrator::from_config(store, &config)?;
    if config.sources_path.exists() {
        let registry = load_source_registry(&config.sources_path).await?;
        orchestrator.run_registry(&registry).await
    } else {
        orchestrator.run_default().await
    }
}
