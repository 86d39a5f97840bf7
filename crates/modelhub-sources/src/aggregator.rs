//! Aggregator-API normalizer.
//!
//! Consumes a bulk JSON listing of models-with-pricing from a third-party
//! price aggregation API. Only allow-listed aggregator ids are mapped onto
//! internal model ids; unknown models are never auto-registered, because
//! quality scores and curated metadata cannot be derived from pricing data.

use async_trait::async_trait;
use modelhub_core::{ModelCategory, NormalizedModel};
use modelhub_storage::HttpFetcher;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{ModelSource, RawPayload, SourceBatch, SourceError};

pub const SOURCE_ID: &str = "openrouter";

const LISTING_URL: &str = "https://openrouter.ai/api/v1/models";

/// Mapping from aggregator model ids to curated internal models. Entries
/// absent from this table are dropped on ingest.
struct AllowedModel {
    aggregator_id: &'static str,
    model_id: &'static str,
    name: &'static str,
    provider_id: &'static str,
    category: ModelCategory,
}

static ALLOWED_MODELS: &[AllowedModel] = &[
    AllowedModel {
        aggregator_id: "openai/gpt-4o",
        model_id: "gpt-4o",
        name: "GPT-4o",
        provider_id: "openai",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "openai/gpt-4o-mini",
        model_id: "gpt-4o-mini",
        name: "GPT-4o mini",
        provider_id: "openai",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "openai/gpt-4.1",
        model_id: "gpt-4.1",
        name: "GPT-4.1",
        provider_id: "openai",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "anthropic/claude-sonnet-4",
        model_id: "claude-sonnet-4",
        name: "Claude Sonnet 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "anthropic/claude-opus-4",
        model_id: "claude-opus-4",
        name: "Claude Opus 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "google/gemini-2.5-flash",
        model_id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        provider_id: "google",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "google/gemini-2.5-pro",
        model_id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        provider_id: "google",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "mistralai/mistral-large",
        model_id: "mistral-large",
        name: "Mistral Large",
        provider_id: "mistral",
        category: ModelCategory::Llm,
    },
    AllowedModel {
        aggregator_id: "mistralai/mistral-small",
        model_id: "mistral-small",
        name: "Mistral Small",
        provider_id: "mistral",
        category: ModelCategory::Llm,
    },
];

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<ListingEntry>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    id: String,
    #[serde(default)]
    context_length: Option<i64>,
    #[serde(default)]
    pricing: Option<ListingPricing>,
    #[serde(default)]
    architecture: Option<ListingArchitecture>,
    #[serde(default)]
    top_provider: Option<TopProvider>,
}

/// The aggregator serialises prices as decimal strings; some mirrors emit
/// bare numbers. Both are accepted, anything else skips the entry.
#[derive(Debug, Deserialize)]
struct ListingPricing {
    #[serde(default)]
    prompt: Option<JsonValue>,
    #[serde(default)]
    completion: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ListingArchitecture {
    #[serde(default)]
    input_modalities: Option<Vec<String>>,
    #[serde(default)]
    modality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopProvider {
    #[serde(default)]
    max_completion_tokens: Option<i64>,
}

/// Convert a per-unit (per-token) price into per-million-unit pricing,
/// rounded to 3 decimal places.
pub fn per_million(per_unit: f64) -> f64 {
    (per_unit * 1_000_000.0 * 1000.0).round() / 1000.0
}

fn parse_price(value: Option<&JsonValue>) -> Option<f64> {
    match value? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Derive the normalized modality tag set.
///
/// Prefers the structured input-modality list; falls back to the legacy
/// composite string (e.g. `"text+image->text"`). Always includes `text`.
pub fn infer_modalities(input_modalities: Option<&[String]>, legacy: Option<&str>) -> Vec<String> {
    let mut tags = vec!["text".to_string()];
    let has = |needle: &str| -> bool {
        if let Some(list) = input_modalities {
            list.iter().any(|m| m.eq_ignore_ascii_case(needle))
        } else if let Some(composite) = legacy {
            let inputs = composite.split("->").next().unwrap_or(composite);
            inputs.to_ascii_lowercase().contains(needle)
        } else {
            false
        }
    };
    if has("image") {
        tags.push("vision".to_string());
    }
    if has("audio") {
        tags.push("audio".to_string());
    }
    tags
}

#[derive(Debug, Clone, Copy)]
pub struct AggregatorSource;

pub fn aggregator_source() -> AggregatorSource {
    AggregatorSource
}

#[async_trait]
impl ModelSource for AggregatorSource {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn fetch_raw(&self, http: &HttpFetcher) -> Result<RawPayload, SourceError> {
        let value = http.get_json(LISTING_URL).await?;
        Ok(RawPayload::Json(value))
    }

    fn normalize(&self, raw: &RawPayload) -> Result<SourceBatch, SourceError> {
        let RawPayload::Json(value) = raw else {
            return Err(SourceError::Normalization {
                source_id: SOURCE_ID,
                reason: "aggregator has no curated fallback".into(),
            });
        };
        let listing: Listing =
            serde_json::from_value(value.clone()).map_err(|err| SourceError::Normalization {
                source_id: SOURCE_ID,
                reason: err.to_string(),
            })?;

        let mut models = Vec::new();
        for entry in &listing.data {
            let Some(allowed) = ALLOWED_MODELS.iter().find(|m| m.aggregator_id == entry.id)
            else {
                continue;
            };
            let Some(pricing) = &entry.pricing else {
                debug!(aggregator_id = %entry.id, "entry without pricing skipped");
                continue;
            };
            let (Some(prompt), Some(completion)) = (
                parse_price(pricing.prompt.as_ref()),
                parse_price(pricing.completion.as_ref()),
            ) else {
                debug!(aggregator_id = %entry.id, "unparseable price fields skipped");
                continue;
            };

            let input_price = per_million(prompt);
            let output_price = per_million(completion);
            // Both-zero pricing marks a free/rate-limited tier artifact.
            if input_price == 0.0 && output_price == 0.0 {
                continue;
            }

            let (input_modalities, legacy) = entry
                .architecture
                .as_ref()
                .map(|a| (a.input_modalities.as_deref(), a.modality.as_deref()))
                .unwrap_or((None, None));

            models.push(NormalizedModel {
                id: allowed.model_id.to_string(),
                name: allowed.name.to_string(),
                provider_id: allowed.provider_id.to_string(),
                category: allowed.category,
                input_price,
                output_price,
                context_window: entry.context_length,
                max_output_tokens: entry
                    .top_provider
                    .as_ref()
                    .and_then(|tp| tp.max_completion_tokens),
                modalities: infer_modalities(input_modalities, legacy),
                source: SOURCE_ID.to_string(),
            });
        }
        Ok(SourceBatch::from_models(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: serde_json::Value) -> Vec<NormalizedModel> {
        aggregator_source()
            .normalize(&RawPayload::Json(value))
            .expect("normalize")
            .models
    }

    #[test]
    fn per_million_converts_and_rounds_to_three_decimals() {
        assert_eq!(per_million(0.0000025), 2.5);
        assert_eq!(per_million(0.00000015), 0.15);
        assert_eq!(per_million(0.0000012344), 1.234);
    }

    #[test]
    fn allow_listed_entry_is_mapped_onto_internal_id() {
        let models = normalize(json!({
            "data": [{
                "id": "openai/gpt-4o",
                "context_length": 128000,
                "pricing": {"prompt": "0.0000025", "completion": "0.00001"},
                "architecture": {"input_modalities": ["text", "image"]},
                "top_provider": {"max_completion_tokens": 16384}
            }]
        }));
        assert_eq!(models.len(), 1);
        let m = &models[0];
        assert_eq!(m.id, "gpt-4o");
        assert_eq!(m.provider_id, "openai");
        assert_eq!(m.input_price, 2.5);
        assert_eq!(m.output_price, 10.0);
        assert_eq!(m.context_window, Some(128000));
        assert_eq!(m.max_output_tokens, Some(16384));
        assert_eq!(m.modalities, vec!["text", "vision"]);
        assert_eq!(m.source, "openrouter");
    }

    #[test]
    fn unknown_aggregator_ids_are_never_auto_registered() {
        let models = normalize(json!({
            "data": [{
                "id": "somelab/brand-new-model",
                "pricing": {"prompt": "0.000001", "completion": "0.000002"}
            }]
        }));
        assert!(models.is_empty());
    }

    #[test]
    fn both_zero_prices_are_filtered_out() {
        let models = normalize(json!({
            "data": [{
                "id": "google/gemini-2.5-flash",
                "pricing": {"prompt": "0", "completion": "0"}
            }]
        }));
        assert!(models.is_empty());
    }

    #[test]
    fn zero_input_with_nonzero_output_is_kept() {
        let models = normalize(json!({
            "data": [{
                "id": "google/gemini-2.5-flash",
                "pricing": {"prompt": "0", "completion": "0.0000006"}
            }]
        }));
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].input_price, 0.0);
        assert_eq!(models[0].output_price, 0.6);
    }

    #[test]
    fn unparseable_price_skips_only_that_entry() {
        let models = normalize(json!({
            "data": [
                {
                    "id": "openai/gpt-4o",
                    "pricing": {"prompt": "n/a", "completion": "0.00001"}
                },
                {
                    "id": "openai/gpt-4o-mini",
                    "pricing": {"prompt": "0.00000015", "completion": "0.0000006"}
                }
            ]
        }));
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "gpt-4o-mini");
    }

    #[test]
    fn numeric_price_fields_are_accepted() {
        let models = normalize(json!({
            "data": [{
                "id": "mistralai/mistral-large",
                "pricing": {"prompt": 0.000002, "completion": 0.000006}
            }]
        }));
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].input_price, 2.0);
        assert_eq!(models[0].output_price, 6.0);
    }

    #[test]
    fn modality_inference_prefers_structured_list() {
        let structured = vec!["text".to_string(), "image".to_string(), "audio".to_string()];
        assert_eq!(
            infer_modalities(Some(&structured), Some("text->text")),
            vec!["text", "vision", "audio"]
        );
    }

    #[test]
    fn modality_inference_falls_back_to_legacy_composite() {
        assert_eq!(
            infer_modalities(None, Some("text+image->text")),
            vec!["text", "vision"]
        );
        assert_eq!(infer_modalities(None, Some("text->text")), vec!["text"]);
        assert_eq!(infer_modalities(None, None), vec!["text"]);
    }

    #[test]
    fn curated_payload_is_a_normalization_error() {
        let err = aggregator_source().normalize(&RawPayload::Curated);
        assert!(err.is_err());
    }
}
