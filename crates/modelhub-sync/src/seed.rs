//! Init-time seeding of reference data.

use chrono::Utc;
use modelhub_sources::catalog;
use modelhub_storage::db::{
    append_price_history, insert_benchmark, insert_model_if_absent, insert_provider,
};
use modelhub_storage::{Store, StoreError};
use tracing::info;

/// Insert the curated provider/model/benchmark catalog. Existing rows are
/// left alone; each newly created model gets its initial price-history
/// snapshot with source `"seed"`. Returns the number of models created.
pub async fn seed_reference_data(store: &Store) -> Result<usize, StoreError> {
    let now = Utc::now();
    let mut tx = store.begin().await?;

    for provider in catalog::seed_providers() {
        insert_provider(&mut *tx, &provider).await?;
    }
    for benchmark in catalog::seed_benchmarks() {
        insert_benchmark(&mut *tx, &benchmark).await?;
    }

    let mut created = 0usize;
    for model in catalog::seed_models(now) {
        if insert_model_if_absent(&mut *tx, &model).await? {
            append_price_history(
                &mut *tx,
                &model.id,
                model.input_price,
                model.output_price,
                "seed",
                now,
            )
            .await?;
            created += 1;
        }
    }

    tx.commit().await?;
    info!(models_created = created, "reference catalog seeded");
    Ok(created)
}
