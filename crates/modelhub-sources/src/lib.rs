//! Source normalizer contracts + one variant per external pricing/score source.

pub mod aggregator;
pub mod catalog;
pub mod leaderboard;
pub mod manual;

use async_trait::async_trait;
use modelhub_core::{NormalizedModel, NormalizedScore};
use modelhub_storage::{FetchError, HttpFetcher};
use thiserror::Error;

pub const CRATE_NAME: &str = "modelhub-sources";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("malformed payload from {source_id}: {reason}")]
    Normalization {
        source_id: &'static str,
        reason: String,
    },
}

/// Raw material handed from `fetch_raw` to `normalize`.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Json(serde_json::Value),
    /// The live endpoint was unreachable or unusable; normalize from the
    /// source's built-in curated table.
    Curated,
}

/// Normalized output of one source run.
#[derive(Debug, Clone, Default)]
pub struct SourceBatch {
    pub models: Vec<NormalizedModel>,
    pub scores: Vec<NormalizedScore>,
}

impl SourceBatch {
    pub fn from_models(models: Vec<NormalizedModel>) -> Self {
        Self {
            models,
            scores: Vec::new(),
        }
    }

    pub fn from_scores(scores: Vec<NormalizedScore>) -> Self {
        Self {
            models: Vec::new(),
            scores,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.scores.is_empty()
    }
}

/// Uniform capability set every source variant implements.
///
/// `fetch_raw` owns the network; `normalize` is pure so it can be tested
/// against fixture payloads without I/O.
#[async_trait]
pub trait ModelSource: Send + Sync {
    fn source_id(&self) -> &'static str;

    async fn fetch_raw(&self, http: &HttpFetcher) -> Result<RawPayload, SourceError>;

    fn normalize(&self, raw: &RawPayload) -> Result<SourceBatch, SourceError>;
}

/// The ordered list the orchestrator walks on a full run.
pub fn default_sources() -> Vec<Box<dyn ModelSource>> {
    vec![
        Box::new(aggregator::aggregator_source()),
        Box::new(manual::openai_source()),
        Box::new(manual::anthropic_source()),
        Box::new(manual::mistral_source()),
        Box::new(leaderboard::arena_source()),
    ]
}

pub fn source_for_id(source_id: &str) -> Option<Box<dyn ModelSource>> {
    match source_id {
        aggregator::SOURCE_ID => Some(Box::new(aggregator::aggregator_source())),
        manual::OPENAI_SOURCE_ID => Some(Box::new(manual::openai_source())),
        manual::ANTHROPIC_SOURCE_ID => Some(Box::new(manual::anthropic_source())),
        manual::MISTRAL_SOURCE_ID => Some(Box::new(manual::mistral_source())),
        leaderboard::SOURCE_ID => Some(Box::new(leaderboard::arena_source())),
        _ => None,
    }
}
