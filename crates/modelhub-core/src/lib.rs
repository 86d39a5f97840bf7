//! Core domain model and handoff contracts for modelhub.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CRATE_NAME: &str = "modelhub-core";

/// Maximum slug length used for derived identifiers (news item ids).
pub const MAX_SLUG_LEN: usize = 80;

/// An AI vendor/lab. Seeded reference data; scrapers never touch these rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub color: String,
    pub website: Option<String>,
    pub status_url: Option<String>,
    pub docs_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Llm,
    Image,
    Video,
    Speech,
    Voice,
    Music,
}

impl ModelCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelCategory::Llm => "llm",
            ModelCategory::Image => "image",
            ModelCategory::Video => "video",
            ModelCategory::Speech => "speech",
            ModelCategory::Voice => "voice",
            ModelCategory::Music => "music",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "llm" => Some(ModelCategory::Llm),
            "image" => Some(ModelCategory::Image),
            "video" => Some(ModelCategory::Video),
            "speech" => Some(ModelCategory::Speech),
            "voice" => Some(ModelCategory::Voice),
            "music" => Some(ModelCategory::Music),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Active,
    Retired,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Active => "active",
            ModelStatus::Retired => "retired",
        }
    }
}

/// A priced AI capability belonging to exactly one provider.
///
/// Pricing fields are the only fields routinely mutated after seeding, and
/// only by the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub provider_id: String,
    pub category: ModelCategory,
    pub status: ModelStatus,
    pub input_price: f64,
    pub output_price: f64,
    pub context_window: Option<i64>,
    pub max_output_tokens: Option<i64>,
    pub throughput: Option<f64>,
    pub quality_score: Option<f64>,
    pub release_date: Option<NaiveDate>,
    pub open_source: bool,
    pub modalities: Vec<String>,
    pub available: bool,
    pub notes: Option<String>,
    pub pricing_source: String,
    pub pricing_updated_at: DateTime<Utc>,
}

/// Append-only price snapshot; the audit trail behind the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub id: i64,
    pub model_id: String,
    pub input_price: f64,
    pub output_price: f64,
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

/// A named evaluation. Static reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub id: String,
    pub name: String,
    pub category: String,
    pub scale_min: f64,
    pub scale_max: f64,
    pub higher_is_better: bool,
    pub weight: f64,
}

/// One current score per (model, benchmark); re-ingestion overwrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkScore {
    pub model_id: String,
    pub benchmark_id: String,
    pub score: f64,
    pub source: String,
    pub source_url: Option<String>,
    pub measured_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    Success,
    Error,
}

impl ScrapeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrapeStatus::Success => "success",
            ScrapeStatus::Error => "error",
        }
    }
}

/// Write-once record of one per-source reconciliation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeLogEntry {
    pub run_id: Uuid,
    pub source: String,
    pub status: ScrapeStatus,
    pub records_changed: i64,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Top,
    News,
    Video,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Top => "top",
            NewsCategory::News => "news",
            NewsCategory::Video => "video",
        }
    }
}

/// A deduplicated article extracted from a dated digest file.
///
/// Identity is `{file-date}-{slugified-title}`, which makes re-importing the
/// same digest a replace, not an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub summary: Option<String>,
    pub published: NaiveDate,
    pub category: NewsCategory,
}

/// Normalized pricing record handed from a source normalizer to the
/// reconciliation engine.
///
/// Carries the full field set needed for a first insert; on conflict only
/// the pricing fields are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedModel {
    pub id: String,
    pub name: String,
    pub provider_id: String,
    pub category: ModelCategory,
    pub input_price: f64,
    pub output_price: f64,
    pub context_window: Option<i64>,
    pub max_output_tokens: Option<i64>,
    pub modalities: Vec<String>,
    pub source: String,
}

/// Normalized benchmark score record. Scores for model ids not present in
/// the store are dropped by policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedScore {
    pub model_id: String,
    pub benchmark_id: String,
    pub score: f64,
    pub source: String,
    pub source_url: Option<String>,
    pub measured_at: Option<NaiveDate>,
}

/// Lowercase, collapse non-alphanumeric runs to single hyphens, trim, and
/// truncate to [`MAX_SLUG_LEN`] characters.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    let trimmed = slug.trim_matches('-');
    trimmed.chars().take(MAX_SLUG_LEN).collect::<String>()
        .trim_matches('-')
        .to_string()
}

/// Join a modality tag set for storage. Tags are kept in insertion order.
pub fn join_modalities(tags: &[String]) -> String {
    tags.join(",")
}

pub fn split_modalities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
