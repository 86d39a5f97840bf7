//! Seed reference catalog: providers, models, and benchmarks inserted at
//! init time. Versioned static data; scrapers only ever touch the pricing
//! fields of these rows afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use modelhub_core::{Benchmark, Model, ModelCategory, ModelStatus, Provider};

struct SeedProvider {
    id: &'static str,
    name: &'static str,
    color: &'static str,
    website: &'static str,
}

static SEED_PROVIDERS: &[SeedProvider] = &[
    SeedProvider { id: "openai", name: "OpenAI", color: "#10a37f", website: "https://openai.com" },
    SeedProvider { id: "anthropic", name: "Anthropic", color: "#d97757", website: "https://anthropic.com" },
    SeedProvider { id: "google", name: "Google DeepMind", color: "#4285f4", website: "https://deepmind.google" },
    SeedProvider { id: "mistral", name: "Mistral AI", color: "#fa500f", website: "https://mistral.ai" },
];

struct SeedModel {
    id: &'static str,
    name: &'static str,
    provider_id: &'static str,
    category: ModelCategory,
    input_price: f64,
    output_price: f64,
    context_window: Option<i64>,
    max_output_tokens: Option<i64>,
    quality_score: Option<f64>,
    release_date: Option<(i32, u32, u32)>,
    open_source: bool,
    modalities: &'static [&'static str],
}

static SEED_MODELS: &[SeedModel] = &[
    SeedModel {
        id: "gpt-4o",
        name: "GPT-4o",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 2.50,
        output_price: 10.00,
        context_window: Some(128_000),
        max_output_tokens: Some(16_384),
        quality_score: Some(77.0),
        release_date: Some((2024, 5, 13)),
        open_source: false,
        modalities: &["text", "vision", "audio"],
    },
    SeedModel {
        id: "gpt-4o-mini",
        name: "GPT-4o mini",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 0.15,
        output_price: 0.60,
        context_window: Some(128_000),
        max_output_tokens: Some(16_384),
        quality_score: Some(71.0),
        release_date: Some((2024, 7, 18)),
        open_source: false,
        modalities: &["text", "vision"],
    },
    SeedModel {
        id: "gpt-4.1",
        name: "GPT-4.1",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 2.00,
        output_price: 8.00,
        context_window: Some(1_047_576),
        max_output_tokens: Some(32_768),
        quality_score: Some(82.0),
        release_date: Some((2025, 4, 14)),
        open_source: false,
        modalities: &["text", "vision"],
    },
    SeedModel {
        id: "dall-e-3",
        name: "DALL-E 3",
        provider_id: "openai",
        category: ModelCategory::Image,
        input_price: 40.00,
        output_price: 0.00,
        context_window: None,
        max_output_tokens: None,
        quality_score: Some(68.0),
        release_date: Some((2023, 10, 3)),
        open_source: false,
        modalities: &["text"],
    },
    SeedModel {
        id: "claude-sonnet-4",
        name: "Claude Sonnet 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 3.00,
        output_price: 15.00,
        context_window: Some(200_000),
        max_output_tokens: Some(64_000),
        quality_score: Some(83.0),
        release_date: Some((2025, 5, 22)),
        open_source: false,
        modalities: &["text", "vision"],
    },
    SeedModel {
        id: "claude-opus-4",
        name: "Claude Opus 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 15.00,
        output_price: 75.00,
        context_window: Some(200_000),
        max_output_tokens: Some(32_000),
        quality_score: Some(86.0),
        release_date: Some((2025, 5, 22)),
        open_source: false,
        modalities: &["text", "vision"],
    },
    SeedModel {
        id: "claude-haiku-3.5",
        name: "Claude Haiku 3.5",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 0.80,
        output_price: 4.00,
        context_window: Some(200_000),
        max_output_tokens: Some(8_192),
        quality_score: Some(69.0),
        release_date: Some((2024, 11, 4)),
        open_source: false,
        modalities: &["text", "vision"],
    },
    SeedModel {
        id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        provider_id: "google",
        category: ModelCategory::Llm,
        input_price: 1.25,
        output_price: 10.00,
        context_window: Some(1_048_576),
        max_output_tokens: Some(65_536),
        quality_score: Some(85.0),
        release_date: Some((2025, 3, 25)),
        open_source: false,
        modalities: &["text", "vision", "audio"],
    },
    SeedModel {
        id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        provider_id: "google",
        category: ModelCategory::Llm,
        input_price: 0.30,
        output_price: 2.50,
        context_window: Some(1_048_576),
        max_output_tokens: Some(65_536),
        quality_score: Some(78.0),
        release_date: Some((2025, 5, 20)),
        open_source: false,
        modalities: &["text", "vision", "audio"],
    },
    SeedModel {
        id: "mistral-large",
        name: "Mistral Large",
        provider_id: "mistral",
        category: ModelCategory::Llm,
        input_price: 2.00,
        output_price: 6.00,
        context_window: Some(128_000),
        max_output_tokens: None,
        quality_score: Some(75.0),
        release_date: Some((2024, 11, 18)),
        open_source: false,
        modalities: &["text"],
    },
    SeedModel {
        id: "mistral-small",
        name: "Mistral Small",
        provider_id: "mistral",
        category: ModelCategory::Llm,
        input_price: 0.20,
        output_price: 0.60,
        context_window: Some(128_000),
        max_output_tokens: None,
        quality_score: Some(66.0),
        release_date: Some((2025, 1, 30)),
        open_source: true,
        modalities: &["text"],
    },
];

struct SeedBenchmark {
    id: &'static str,
    name: &'static str,
    category: &'static str,
    scale_min: f64,
    scale_max: f64,
    higher_is_better: bool,
    weight: f64,
}

static SEED_BENCHMARKS: &[SeedBenchmark] = &[
    SeedBenchmark {
        id: "arena-elo",
        name: "Arena Elo",
        category: "crowd",
        scale_min: 0.0,
        scale_max: 2000.0,
        higher_is_better: true,
        weight: 1.0,
    },
    SeedBenchmark {
        id: "mmlu-pro",
        name: "MMLU-Pro",
        category: "knowledge",
        scale_min: 0.0,
        scale_max: 100.0,
        higher_is_better: true,
        weight: 0.8,
    },
];

pub fn seed_providers() -> Vec<Provider> {
    SEED_PROVIDERS
        .iter()
        .map(|p| Provider {
            id: p.id.to_string(),
            name: p.name.to_string(),
            color: p.color.to_string(),
            website: Some(p.website.to_string()),
            status_url: None,
            docs_url: None,
            description: None,
        })
        .collect()
}

pub fn seed_models(now: DateTime<Utc>) -> Vec<Model> {
    SEED_MODELS
        .iter()
        .map(|m| Model {
            id: m.id.to_string(),
            name: m.name.to_string(),
            provider_id: m.provider_id.to_string(),
            category: m.category,
            status: ModelStatus::Active,
            input_price: m.input_price,
            output_price: m.output_price,
            context_window: m.context_window,
            max_output_tokens: m.max_output_tokens,
            throughput: None,
            quality_score: m.quality_score,
            release_date: m
                .release_date
                .and_then(|(y, mo, d)| NaiveDate::from_ymd_opt(y, mo, d)),
            open_source: m.open_source,
            modalities: m.modalities.iter().map(|s| s.to_string()).collect(),
            available: true,
            notes: None,
            pricing_source: "seed".to_string(),
            pricing_updated_at: now,
        })
        .collect()
}

pub fn seed_benchmarks() -> Vec<Benchmark> {
    SEED_BENCHMARKS
        .iter()
        .map(|b| Benchmark {
            id: b.id.to_string(),
            name: b.name.to_string(),
            category: b.category.to_string(),
            scale_min: b.scale_min,
            scale_max: b.scale_max,
            higher_is_better: b.higher_is_better,
            weight: b.weight,
        })
        .collect()
}
