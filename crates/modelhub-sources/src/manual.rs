//! Manual-table normalizers, one per vendor without a machine-readable
//! pricing API.
//!
//! Each variant returns a hard-coded table of currently known prices,
//! validated against the vendor's public pricing page. A best-effort live
//! probe runs first and is used only to confirm model availability; pricing
//! is never extracted from it. A probe failure degrades to the curated
//! table, it never fails the source.

use std::collections::HashSet;

use async_trait::async_trait;
use modelhub_core::{ModelCategory, NormalizedModel};
use modelhub_storage::HttpFetcher;
use tracing::{debug, warn};

use crate::{ModelSource, RawPayload, SourceBatch, SourceError};

pub const OPENAI_SOURCE_ID: &str = "openai-pricing";
pub const ANTHROPIC_SOURCE_ID: &str = "anthropic-pricing";
pub const MISTRAL_SOURCE_ID: &str = "mistral-pricing";

/// One curated pricing row. Prices are USD per million tokens.
pub struct ManualPriceRow {
    pub model_id: &'static str,
    pub name: &'static str,
    pub provider_id: &'static str,
    pub category: ModelCategory,
    pub input_price: f64,
    pub output_price: f64,
    pub context_window: Option<i64>,
    pub max_output_tokens: Option<i64>,
    pub modalities: &'static [&'static str],
    /// Id the vendor's model-listing API reports, when one exists.
    pub probe_id: Option<&'static str>,
}

static OPENAI_ROWS: &[ManualPriceRow] = &[
    ManualPriceRow {
        model_id: "gpt-4o",
        name: "GPT-4o",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 2.50,
        output_price: 10.00,
        context_window: Some(128_000),
        max_output_tokens: Some(16_384),
        modalities: &["text", "vision", "audio"],
        probe_id: Some("gpt-4o"),
    },
    ManualPriceRow {
        model_id: "gpt-4o-mini",
        name: "GPT-4o mini",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 0.15,
        output_price: 0.60,
        context_window: Some(128_000),
        max_output_tokens: Some(16_384),
        modalities: &["text", "vision"],
        probe_id: Some("gpt-4o-mini"),
    },
    ManualPriceRow {
        model_id: "gpt-4.1",
        name: "GPT-4.1",
        provider_id: "openai",
        category: ModelCategory::Llm,
        input_price: 2.00,
        output_price: 8.00,
        context_window: Some(1_047_576),
        max_output_tokens: Some(32_768),
        modalities: &["text", "vision"],
        probe_id: Some("gpt-4.1"),
    },
    ManualPriceRow {
        model_id: "dall-e-3",
        name: "DALL-E 3",
        provider_id: "openai",
        category: ModelCategory::Image,
        input_price: 40.00,
        output_price: 0.00,
        context_window: None,
        max_output_tokens: None,
        modalities: &["text"],
        probe_id: Some("dall-e-3"),
    },
];

static ANTHROPIC_ROWS: &[ManualPriceRow] = &[
    ManualPriceRow {
        model_id: "claude-sonnet-4",
        name: "Claude Sonnet 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 3.00,
        output_price: 15.00,
        context_window: Some(200_000),
        max_output_tokens: Some(64_000),
        modalities: &["text", "vision"],
        probe_id: None,
    },
    ManualPriceRow {
        model_id: "claude-opus-4",
        name: "Claude Opus 4",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 15.00,
        output_price: 75.00,
        context_window: Some(200_000),
        max_output_tokens: Some(32_000),
        modalities: &["text", "vision"],
        probe_id: None,
    },
    ManualPriceRow {
        model_id: "claude-haiku-3.5",
        name: "Claude Haiku 3.5",
        provider_id: "anthropic",
        category: ModelCategory::Llm,
        input_price: 0.80,
        output_price: 4.00,
        context_window: Some(200_000),
        max_output_tokens: Some(8_192),
        modalities: &["text", "vision"],
        probe_id: None,
    },
];

static MISTRAL_ROWS: &[ManualPriceRow] = &[
    ManualPriceRow {
        model_id: "mistral-large",
        name: "Mistral Large",
        provider_id: "mistral",
        category: ModelCategory::Llm,
        input_price: 2.00,
        output_price: 6.00,
        context_window: Some(128_000),
        max_output_tokens: None,
        modalities: &["text"],
        probe_id: Some("mistral-large-latest"),
    },
    ManualPriceRow {
        model_id: "mistral-small",
        name: "Mistral Small",
        provider_id: "mistral",
        category: ModelCategory::Llm,
        input_price: 0.20,
        output_price: 0.60,
        context_window: Some(128_000),
        max_output_tokens: None,
        modalities: &["text"],
        probe_id: Some("mistral-small-latest"),
    },
];

pub struct VendorTableSource {
    source_id: &'static str,
    probe_url: Option<&'static str>,
    rows: &'static [ManualPriceRow],
}

pub fn openai_source() -> VendorTableSource {
    VendorTableSource {
        source_id: OPENAI_SOURCE_ID,
        probe_url: Some("https://api.openai.com/v1/models"),
        rows: OPENAI_ROWS,
    }
}

pub fn anthropic_source() -> VendorTableSource {
    VendorTableSource {
        source_id: ANTHROPIC_SOURCE_ID,
        probe_url: None,
        rows: ANTHROPIC_ROWS,
    }
}

pub fn mistral_source() -> VendorTableSource {
    VendorTableSource {
        source_id: MISTRAL_SOURCE_ID,
        probe_url: Some("https://api.mistral.ai/v1/models"),
        rows: MISTRAL_ROWS,
    }
}

/// Extract the set of model ids a vendor listing probe reports, tolerating
/// the common `{"data": [{"id": ...}]}` shape.
fn probed_ids(value: &serde_json::Value) -> HashSet<&str> {
    value
        .get("data")
        .and_then(|d| d.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("id").and_then(|id| id.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl ModelSource for VendorTableSource {
    fn source_id(&self) -> &'static str {
        self.source_id
    }

    async fn fetch_raw(&self, http: &HttpFetcher) -> Result<RawPayload, SourceError> {
        let Some(url) = self.probe_url else {
            return Ok(RawPayload::Curated);
        };
        match http.get_json(url).await {
            Ok(value) => Ok(RawPayload::Json(value)),
            Err(err) => {
                warn!(source = self.source_id, %err, "availability probe failed; using curated table");
                Ok(RawPayload::Curated)
            }
        }
    }

    fn normalize(&self, raw: &RawPayload) -> Result<SourceBatch, SourceError> {
        if let RawPayload::Json(value) = raw {
            let listed = probed_ids(value);
            if !listed.is_empty() {
                for row in self.rows {
                    if let Some(probe_id) = row.probe_id {
                        if !listed.contains(probe_id) {
                            warn!(
                                source = self.source_id,
                                model_id = row.model_id,
                                "curated model not present in vendor listing"
                            );
                        }
                    }
                }
            } else {
                debug!(source = self.source_id, "probe payload unstructured; table used as-is");
            }
        }

        let models = self
            .rows
            .iter()
            .map(|row| NormalizedModel {
                id: row.model_id.to_string(),
                name: row.name.to_string(),
                provider_id: row.provider_id.to_string(),
                category: row.category,
                input_price: row.input_price,
                output_price: row.output_price,
                context_window: row.context_window,
                max_output_tokens: row.max_output_tokens,
                modalities: row.modalities.iter().map(|m| m.to_string()).collect(),
                source: self.source_id.to_string(),
            })
            .collect();
        Ok(SourceBatch::from_models(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn curated_table_normalizes_without_a_probe() {
        let batch = anthropic_source().normalize(&RawPayload::Curated).unwrap();
        assert_eq!(batch.models.len(), ANTHROPIC_ROWS.len());
        let sonnet = batch
            .models
            .iter()
            .find(|m| m.id == "claude-sonnet-4")
            .expect("sonnet row");
        assert_eq!(sonnet.input_price, 3.00);
        assert_eq!(sonnet.output_price, 15.00);
        assert_eq!(sonnet.source, "anthropic-pricing");
    }

    #[test]
    fn probe_payload_does_not_change_pricing() {
        let probe = json!({
            "data": [
                {"id": "gpt-4o"},
                {"id": "gpt-4o-mini"}
            ]
        });
        let with_probe = openai_source().normalize(&RawPayload::Json(probe)).unwrap();
        let without = openai_source().normalize(&RawPayload::Curated).unwrap();
        assert_eq!(with_probe.models, without.models);
    }

    #[test]
    fn every_table_row_carries_its_vendor_source_label() {
        for (source, label) in [
            (openai_source(), OPENAI_SOURCE_ID),
            (anthropic_source(), ANTHROPIC_SOURCE_ID),
            (mistral_source(), MISTRAL_SOURCE_ID),
        ] {
            let batch = source.normalize(&RawPayload::Curated).unwrap();
            assert!(!batch.models.is_empty());
            assert!(batch.models.iter().all(|m| m.source == label));
        }
    }

    #[test]
    fn probed_ids_tolerates_unstructured_payloads() {
        assert!(probed_ids(&json!({"unexpected": true})).is_empty());
        assert!(probed_ids(&json!([1, 2, 3])).is_empty());
        let payload = json!({"data": [{"id": "a"}, {"id": "b"}, {"noid": 1}]});
        let ids = probed_ids(&payload);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("a"));
    }
}
