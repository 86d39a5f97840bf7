//! Benchmark-leaderboard normalizer for an ELO-style crowd ranking.
//!
//! Attempts a best-effort API probe first; when the probe is inaccessible
//! or its shape is unrecognisable, the curated score table is used instead.

use async_trait::async_trait;
use chrono::NaiveDate;
use modelhub_core::NormalizedScore;
use modelhub_storage::HttpFetcher;
use tracing::warn;

use crate::{ModelSource, RawPayload, SourceBatch, SourceError};

pub const SOURCE_ID: &str = "arena-elo";
pub const BENCHMARK_ID: &str = "arena-elo";

const LEADERBOARD_URL: &str = "https://lmarena.ai/api/v1/leaderboard";

/// Leaderboard display names mapped onto internal model ids. Rows the map
/// does not cover are ignored.
static ARENA_MODEL_IDS: &[(&str, &str)] = &[
    ("gpt-4o", "gpt-4o"),
    ("gpt-4o-mini", "gpt-4o-mini"),
    ("gpt-4.1", "gpt-4.1"),
    ("claude-sonnet-4", "claude-sonnet-4"),
    ("claude-opus-4", "claude-opus-4"),
    ("gemini-2.5-pro", "gemini-2.5-pro"),
    ("gemini-2.5-flash", "gemini-2.5-flash"),
    ("mistral-large", "mistral-large"),
];

struct CuratedScore {
    model_id: &'static str,
    score: f64,
}

/// Snapshot of the public leaderboard, refreshed by hand alongside releases.
static CURATED_ELO: &[CuratedScore] = &[
    CuratedScore { model_id: "gemini-2.5-pro", score: 1451.0 },
    CuratedScore { model_id: "claude-opus-4", score: 1420.0 },
    CuratedScore { model_id: "gpt-4.1", score: 1411.0 },
    CuratedScore { model_id: "claude-sonnet-4", score: 1384.0 },
    CuratedScore { model_id: "gemini-2.5-flash", score: 1375.0 },
    CuratedScore { model_id: "gpt-4o", score: 1336.0 },
    CuratedScore { model_id: "mistral-large", score: 1294.0 },
    CuratedScore { model_id: "gpt-4o-mini", score: 1273.0 },
];

const CURATED_AS_OF: (i32, u32, u32) = (2026, 8, 12);

fn curated_as_of() -> NaiveDate {
    let (y, m, d) = CURATED_AS_OF;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[derive(Debug, Clone, Copy)]
pub struct ArenaSource;

pub fn arena_source() -> ArenaSource {
    ArenaSource
}

fn score_record(model_id: &str, score: f64, measured_at: Option<NaiveDate>) -> NormalizedScore {
    NormalizedScore {
        model_id: model_id.to_string(),
        benchmark_id: BENCHMARK_ID.to_string(),
        score,
        source: SOURCE_ID.to_string(),
        source_url: Some(LEADERBOARD_URL.to_string()),
        measured_at,
    }
}

/// Parse the probe payload as `{"leaderboard": [{"model": ..., "rating": ...}]}`.
/// Returns None when the shape is not usable.
fn scores_from_probe(value: &serde_json::Value) -> Option<Vec<NormalizedScore>> {
    let rows = value.get("leaderboard")?.as_array()?;
    let mut out = Vec::new();
    for row in rows {
        let Some(display) = row.get("model").and_then(|v| v.as_str()) else {
            continue;
        };
        let Some(rating) = row.get("rating").and_then(|v| v.as_f64()) else {
            continue;
        };
        if let Some((_, model_id)) = ARENA_MODEL_IDS.iter().find(|(name, _)| *name == display) {
            out.push(score_record(model_id, rating, None));
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn curated_scores() -> Vec<NormalizedScore> {
    CURATED_ELO
        .iter()
        .map(|row| score_record(row.model_id, row.score, Some(curated_as_of())))
        .collect()
}

#[async_trait]
impl ModelSource for ArenaSource {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_raw(&self, http: &HttpFetcher) -> Result<RawPayload, SourceError> {
        match http.get_json(LEADERBOARD_URL).await {
            Ok(value) => Ok(RawPayload::Json(value)),
            Err(err) => {
                warn!(source = SOURCE_ID, %err, "leaderboard probe failed; using curated scores");
                Ok(RawPayload::Curated)
            }
        }
    }

    fn normalize(&self, raw: &RawPayload) -> Result<SourceBatch, SourceError> {
        let scores = match raw {
            RawPayload::Json(value) => match scores_from_probe(value) {
                Some(scores) => scores,
                None => {
                    warn!(source = SOURCE_ID, "probe payload unstructured; using curated scores");
                    curated_scores()
                }
            },
            RawPayload::Curated => curated_scores(),
        };
        Ok(SourceBatch::from_scores(scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn curated_fallback_covers_the_whole_table() {
        let batch = arena_source().normalize(&RawPayload::Curated).unwrap();
        assert_eq!(batch.scores.len(), CURATED_ELO.len());
        assert!(batch.scores.iter().all(|s| s.benchmark_id == BENCHMARK_ID));
        assert!(batch.scores.iter().all(|s| s.measured_at == Some(curated_as_of())));
    }

    #[test]
    fn structured_probe_wins_over_curated_table() {
        let batch = arena_source()
            .normalize(&RawPayload::Json(json!({
                "leaderboard": [
                    {"model": "gpt-4o", "rating": 1340.5},
                    {"model": "unmapped-model", "rating": 1500.0}
                ]
            })))
            .unwrap();
        assert_eq!(batch.scores.len(), 1);
        assert_eq!(batch.scores[0].model_id, "gpt-4o");
        assert_eq!(batch.scores[0].score, 1340.5);
        assert_eq!(batch.scores[0].measured_at, None);
    }

    #[test]
    fn unstructured_probe_falls_back_to_curated_table() {
        let batch = arena_source()
            .normalize(&RawPayload::Json(json!({"error": "maintenance"})))
            .unwrap();
        assert_eq!(batch.scores.len(), CURATED_ELO.len());
    }
}
