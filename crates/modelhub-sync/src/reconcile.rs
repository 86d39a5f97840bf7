//! Reconciliation engine: merges normalized records into the store.
//!
//! Each batch runs inside one transaction so readers never observe a
//! partially applied run.

use chrono::Utc;
use modelhub_core::{NormalizedModel, NormalizedScore};
use modelhub_storage::db::{
    append_price_history, model_ids, upsert_benchmark_score, upsert_model_pricing,
};
use modelhub_storage::{Store, StoreError};
use tracing::debug;

/// Apply normalized pricing records. Per record: upsert the model (pricing
/// fields only on conflict), then append one price-history snapshot whether
/// or not the price actually changed. Returns the number of models touched.
pub async fn apply_models(
    store: &Store,
    records: &[NormalizedModel],
) -> Result<usize, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let now = Utc::now();
    let mut tx = store.begin().await?;
    let mut touched = 0usize;
    for rec in records {
        upsert_model_pricing(&mut *tx, rec, now).await?;
        append_price_history(
            &mut *tx,
            &rec.id,
            rec.input_price,
            rec.output_price,
            &rec.source,
            now,
        )
        .await?;
        touched += 1;
    }
    tx.commit().await?;
    Ok(touched)
}

/// Apply normalized benchmark scores. Scores referencing a model id absent
/// from the store are skipped silently and do not count: the absence of a
/// target model is an expected steady-state condition, not a fault.
pub async fn apply_scores(
    store: &Store,
    records: &[NormalizedScore],
) -> Result<usize, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let mut tx = store.begin().await?;
    let known = model_ids(&mut *tx).await?;
    let mut applied = 0usize;
    for rec in records {
        if !known.contains(&rec.model_id) {
            debug!(model_id = %rec.model_id, benchmark_id = %rec.benchmark_id, "orphan score skipped");
            continue;
        }
        upsert_benchmark_score(&mut *tx, rec).await?;
        applied += 1;
    }
    tx.commit().await?;
    Ok(applied)
}
