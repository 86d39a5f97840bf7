//! SQLite-backed store for the ingestion pipeline.
//!
//! Single writer process, WAL journal so late readers can overlap a write.
//! Write-path operations take any [`SqliteExecutor`] so the reconciliation
//! engine can run a whole batch inside one transaction.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use modelhub_core::{
    join_modalities, split_modalities, Benchmark, BenchmarkScore, Model, ModelCategory,
    ModelStatus, NewsItem, NormalizedModel, NormalizedScore, PriceHistoryEntry, Provider,
    ScrapeLogEntry, ScrapeStatus,
};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqliteExecutor, SqlitePool, Transaction};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("row decode: {0}")]
    Decode(String),
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS providers (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    color       TEXT NOT NULL DEFAULT '#888888',
    website     TEXT,
    status_url  TEXT,
    docs_url    TEXT,
    description TEXT
);

CREATE TABLE IF NOT EXISTS models (
    id                 TEXT PRIMARY KEY,
    name               TEXT NOT NULL,
    provider_id        TEXT NOT NULL REFERENCES providers(id),
    category           TEXT NOT NULL DEFAULT 'llm',
    status             TEXT NOT NULL DEFAULT 'active',
    input_price        REAL NOT NULL,
    output_price       REAL NOT NULL,
    context_window     INTEGER,
    max_output_tokens  INTEGER,
    throughput         REAL,
    quality_score      REAL,
    release_date       TEXT,
    open_source        INTEGER NOT NULL DEFAULT 0,
    modalities         TEXT NOT NULL DEFAULT 'text',
    available          INTEGER NOT NULL DEFAULT 1,
    notes              TEXT,
    pricing_source     TEXT NOT NULL DEFAULT 'seed',
    pricing_updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS benchmarks (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    category         TEXT NOT NULL,
    scale_min        REAL NOT NULL DEFAULT 0,
    scale_max        REAL NOT NULL DEFAULT 100,
    higher_is_better INTEGER NOT NULL DEFAULT 1,
    weight           REAL NOT NULL DEFAULT 1.0
);

CREATE TABLE IF NOT EXISTS benchmark_scores (
    model_id     TEXT NOT NULL REFERENCES models(id),
    benchmark_id TEXT NOT NULL REFERENCES benchmarks(id),
    score        REAL NOT NULL,
    source       TEXT NOT NULL,
    source_url   TEXT,
    measured_at  TEXT,
    PRIMARY KEY (model_id, benchmark_id)
);

CREATE TABLE IF NOT EXISTS price_history (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    model_id     TEXT NOT NULL REFERENCES models(id),
    input_price  REAL NOT NULL,
    output_price REAL NOT NULL,
    source       TEXT NOT NULL,
    recorded_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_price_history_model ON price_history(model_id);

CREATE TABLE IF NOT EXISTS scrape_log (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id          TEXT NOT NULL,
    source          TEXT NOT NULL,
    status          TEXT NOT NULL,
    records_changed INTEGER NOT NULL DEFAULT 0,
    error           TEXT,
    started_at      TEXT NOT NULL,
    finished_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_scrape_log_started ON scrape_log(started_at);

CREATE TABLE IF NOT EXISTS news_items (
    id         TEXT PRIMARY KEY,
    title      TEXT NOT NULL,
    url        TEXT NOT NULL,
    source     TEXT NOT NULL,
    summary    TEXT,
    published  TEXT NOT NULL,
    category   TEXT NOT NULL DEFAULT 'news'
);
CREATE INDEX IF NOT EXISTS idx_news_published ON news_items(published);
"#;

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `database_url`, e.g.
    /// `sqlite:modelhub.db`.
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        debug!("schema ensured");
        Ok(())
    }

    pub async fn model_exists(&self, id: &str) -> Result<bool, StoreError> {
        model_exists(&self.pool, id).await
    }

    pub async fn model_ids(&self) -> Result<HashSet<String>, StoreError> {
        model_ids(&self.pool).await
    }

    pub async fn get_model(&self, id: &str) -> Result<Option<Model>, StoreError> {
        let row = sqlx::query("SELECT * FROM models WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| model_from_row(&r)).transpose()
    }

    /// Read surface for the downstream renderer: active models in one
    /// category, best quality first.
    pub async fn active_models_in_category(
        &self,
        category: ModelCategory,
    ) -> Result<Vec<Model>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM models
             WHERE category = ?1 AND status = 'active'
             ORDER BY quality_score DESC, id ASC
            "#,
        )
        .bind(category.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(model_from_row).collect()
    }

    pub async fn price_history_for_model(
        &self,
        model_id: &str,
    ) -> Result<Vec<PriceHistoryEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, model_id, input_price, output_price, source, recorded_at
              FROM price_history
             WHERE model_id = ?1
             ORDER BY id ASC
            "#,
        )
        .bind(model_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| {
                Ok(PriceHistoryEntry {
                    id: row.try_get("id")?,
                    model_id: row.try_get("model_id")?,
                    input_price: row.try_get("input_price")?,
                    output_price: row.try_get("output_price")?,
                    source: row.try_get("source")?,
                    recorded_at: row.try_get("recorded_at")?,
                })
            })
            .collect()
    }

    pub async fn scores_for_benchmark(
        &self,
        benchmark_id: &str,
    ) -> Result<Vec<BenchmarkScore>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT model_id, benchmark_id, score, source, source_url, measured_at
              FROM benchmark_scores
             WHERE benchmark_id = ?1
             ORDER BY score DESC
            "#,
        )
        .bind(benchmark_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| {
                Ok(BenchmarkScore {
                    model_id: row.try_get("model_id")?,
                    benchmark_id: row.try_get("benchmark_id")?,
                    score: row.try_get("score")?,
                    source: row.try_get("source")?,
                    source_url: row.try_get("source_url")?,
                    measured_at: row.try_get("measured_at")?,
                })
            })
            .collect()
    }

    pub async fn latest_scrape_logs(&self, limit: i64) -> Result<Vec<ScrapeLogEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT run_id, source, status, records_changed, error, started_at, finished_at
              FROM scrape_log
             ORDER BY id DESC
             LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(scrape_log_from_row).collect()
    }

    pub async fn news_items_on(&self, date: NaiveDate) -> Result<Vec<NewsItem>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, url, source, summary, published, category
              FROM news_items
             WHERE published = ?1
             ORDER BY id ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(news_item_from_row).collect()
    }
}

/// Upsert one model by id. If the row exists, only the pricing fields move;
/// curated metadata stays untouched.
pub async fn upsert_model_pricing(
    exec: impl SqliteExecutor<'_>,
    rec: &NormalizedModel,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO models (
            id, name, provider_id, category,
            input_price, output_price, context_window, max_output_tokens,
            modalities, pricing_source, pricing_updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(id) DO UPDATE SET
            input_price        = excluded.input_price,
            output_price       = excluded.output_price,
            pricing_source     = excluded.pricing_source,
            pricing_updated_at = excluded.pricing_updated_at
        "#,
    )
    .bind(&rec.id)
    .bind(&rec.name)
    .bind(&rec.provider_id)
    .bind(rec.category.as_str())
    .bind(rec.input_price)
    .bind(rec.output_price)
    .bind(rec.context_window)
    .bind(rec.max_output_tokens)
    .bind(join_modalities(&rec.modalities))
    .bind(&rec.source)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

/// Append one immutable price snapshot. Never updated, never deleted.
pub async fn append_price_history(
    exec: impl SqliteExecutor<'_>,
    model_id: &str,
    input_price: f64,
    output_price: f64,
    source: &str,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO price_history (model_id, input_price, output_price, source, recorded_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(model_id)
    .bind(input_price)
    .bind(output_price)
    .bind(source)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

/// Last-write-wins upsert keyed on (model_id, benchmark_id). No history.
pub async fn upsert_benchmark_score(
    exec: impl SqliteExecutor<'_>,
    score: &NormalizedScore,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO benchmark_scores (model_id, benchmark_id, score, source, source_url, measured_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(model_id, benchmark_id) DO UPDATE SET
            score       = excluded.score,
            source      = excluded.source,
            source_url  = excluded.source_url,
            measured_at = excluded.measured_at
        "#,
    )
    .bind(&score.model_id)
    .bind(&score.benchmark_id)
    .bind(score.score)
    .bind(&score.source)
    .bind(&score.source_url)
    .bind(score.measured_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn model_exists(exec: impl SqliteExecutor<'_>, id: &str) -> Result<bool, StoreError> {
    let row = sqlx::query("SELECT 1 FROM models WHERE id = ?1")
        .bind(id)
        .fetch_optional(exec)
        .await?;
    Ok(row.is_some())
}

pub async fn model_ids(exec: impl SqliteExecutor<'_>) -> Result<HashSet<String>, StoreError> {
    let rows = sqlx::query("SELECT id FROM models").fetch_all(exec).await?;
    let mut out = HashSet::with_capacity(rows.len());
    for row in rows {
        out.insert(row.try_get("id")?);
    }
    Ok(out)
}

pub async fn append_scrape_log(
    exec: impl SqliteExecutor<'_>,
    entry: &ScrapeLogEntry,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO scrape_log (run_id, source, status, records_changed, error, started_at, finished_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(entry.run_id.to_string())
    .bind(&entry.source)
    .bind(entry.status.as_str())
    .bind(entry.records_changed)
    .bind(&entry.error)
    .bind(entry.started_at)
    .bind(entry.finished_at)
    .execute(exec)
    .await?;
    Ok(())
}

/// Replace-by-id write for digest imports; re-importing a file is idempotent.
pub async fn replace_news_item(
    exec: impl SqliteExecutor<'_>,
    item: &NewsItem,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO news_items (id, title, url, source, summary, published, category)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(id) DO UPDATE SET
            title     = excluded.title,
            url       = excluded.url,
            source    = excluded.source,
            summary   = excluded.summary,
            published = excluded.published,
            category  = excluded.category
        "#,
    )
    .bind(&item.id)
    .bind(&item.title)
    .bind(&item.url)
    .bind(&item.source)
    .bind(&item.summary)
    .bind(item.published)
    .bind(item.category.as_str())
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn insert_provider(
    exec: impl SqliteExecutor<'_>,
    provider: &Provider,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO providers (id, name, color, website, status_url, docs_url, description)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(&provider.id)
    .bind(&provider.name)
    .bind(&provider.color)
    .bind(&provider.website)
    .bind(&provider.status_url)
    .bind(&provider.docs_url)
    .bind(&provider.description)
    .execute(exec)
    .await?;
    Ok(())
}

/// Seed-time model insert. Returns true when the row was actually created,
/// so callers know whether to write the initial price-history snapshot.
pub async fn insert_model_if_absent(
    exec: impl SqliteExecutor<'_>,
    model: &Model,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO models (
            id, name, provider_id, category, status,
            input_price, output_price, context_window, max_output_tokens,
            throughput, quality_score, release_date, open_source,
            modalities, available, notes, pricing_source, pricing_updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(&model.id)
    .bind(&model.name)
    .bind(&model.provider_id)
    .bind(model.category.as_str())
    .bind(model.status.as_str())
    .bind(model.input_price)
    .bind(model.output_price)
    .bind(model.context_window)
    .bind(model.max_output_tokens)
    .bind(model.throughput)
    .bind(model.quality_score)
    .bind(model.release_date)
    .bind(model.open_source)
    .bind(join_modalities(&model.modalities))
    .bind(model.available)
    .bind(&model.notes)
    .bind(&model.pricing_source)
    .bind(model.pricing_updated_at)
    .execute(exec)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_benchmark(
    exec: impl SqliteExecutor<'_>,
    benchmark: &Benchmark,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO benchmarks (id, name, category, scale_min, scale_max, higher_is_better, weight)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(id) DO NOTHING
        "#,
    )
    .bind(&benchmark.id)
    .bind(&benchmark.name)
    .bind(&benchmark.category)
    .bind(benchmark.scale_min)
    .bind(benchmark.scale_max)
    .bind(benchmark.higher_is_better)
    .bind(benchmark.weight)
    .execute(exec)
    .await?;
    Ok(())
}

fn model_from_row(row: &SqliteRow) -> Result<Model, StoreError> {
    let category_raw: String = row.try_get("category")?;
    let category = ModelCategory::parse(&category_raw)
        .ok_or_else(|| StoreError::Decode(format!("unknown model category {category_raw:?}")))?;
    let status_raw: String = row.try_get("status")?;
    let status = match status_raw.as_str() {
        "active" => ModelStatus::Active,
        "retired" => ModelStatus::Retired,
        other => return Err(StoreError::Decode(format!("unknown model status {other:?}"))),
    };
    let modalities_raw: String = row.try_get("modalities")?;
    Ok(Model {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        provider_id: row.try_get("provider_id")?,
        category,
        status,
        input_price: row.try_get("input_price")?,
        output_price: row.try_get("output_price")?,
        context_window: row.try_get("context_window")?,
        max_output_tokens: row.try_get("max_output_tokens")?,
        throughput: row.try_get("throughput")?,
        quality_score: row.try_get("quality_score")?,
        release_date: row.try_get("release_date")?,
        open_source: row.try_get("open_source")?,
        modalities: split_modalities(&modalities_raw),
        available: row.try_get("available")?,
        notes: row.try_get("notes")?,
        pricing_source: row.try_get("pricing_source")?,
        pricing_updated_at: row.try_get("pricing_updated_at")?,
    })
}

fn scrape_log_from_row(row: &SqliteRow) -> Result<ScrapeLogEntry, StoreError> {
    let run_id_raw: String = row.try_get("run_id")?;
    let run_id = run_id_raw
        .parse()
        .map_err(|_| StoreError::Decode(format!("bad run id {run_id_raw:?}")))?;
    let status_raw: String = row.try_get("status")?;
    let status = match status_raw.as_str() {
        "success" => ScrapeStatus::Success,
        "error" => ScrapeStatus::Error,
        other => return Err(StoreError::Decode(format!("unknown scrape status {other:?}"))),
    };
    Ok(ScrapeLogEntry {
        run_id,
        source: row.try_get("source")?,
        status,
        records_changed: row.try_get("records_changed")?,
        error: row.try_get("error")?,
        started_at: row.try_get("started_at")?,
        finished_at: row.try_get("finished_at")?,
    })
}

fn news_item_from_row(row: &SqliteRow) -> Result<NewsItem, StoreError> {
    let category_raw: String = row.try_get("category")?;
    let category = match category_raw.as_str() {
        "top" => modelhub_core::NewsCategory::Top,
        "news" => modelhub_core::NewsCategory::News,
        "video" => modelhub_core::NewsCategory::Video,
        other => return Err(StoreError::Decode(format!("unknown news category {other:?}"))),
    };
    Ok(NewsItem {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        url: row.try_get("url")?,
        source: row.try_get("source")?,
        summary: row.try_get("summary")?,
        published: row.try_get("published")?,
        category,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelhub_core::NewsCategory;
    use uuid::Uuid;

    async fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}/store.db", dir.path().display());
        let store = Store::open(&url).await.expect("open store");
        store.init_schema().await.expect("init schema");
        (dir, store)
    }

    fn acme_provider() -> Provider {
        Provider {
            id: "acme".into(),
            name: "Acme Labs".into(),
            color: "#ff6600".into(),
            website: Some("https://acme.example".into()),
            status_url: None,
            docs_url: None,
            description: None,
        }
    }

    fn seed_model(id: &str) -> Model {
        Model {
            id: id.into(),
            name: id.to_ascii_uppercase(),
            provider_id: "acme".into(),
            category: ModelCategory::Llm,
            status: ModelStatus::Active,
            input_price: 1.0,
            output_price: 2.0,
            context_window: Some(128_000),
            max_output_tokens: Some(4_096),
            throughput: Some(90.0),
            quality_score: Some(80.0),
            release_date: None,
            open_source: false,
            modalities: vec!["text".into()],
            available: true,
            notes: None,
            pricing_source: "seed".into(),
            pricing_updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn seed_insert_reports_whether_row_was_created() {
        let (_dir, store) = temp_store().await;
        insert_provider(store.pool(), &acme_provider()).await.unwrap();
        let model = seed_model("m1");
        assert!(insert_model_if_absent(store.pool(), &model).await.unwrap());
        assert!(!insert_model_if_absent(store.pool(), &model).await.unwrap());
        assert!(store.model_exists("m1").await.unwrap());
        assert!(!store.model_exists("nope").await.unwrap());
    }

    #[tokio::test]
    async fn pricing_upsert_preserves_curated_fields() {
        let (_dir, store) = temp_store().await;
        insert_provider(store.pool(), &acme_provider()).await.unwrap();
        insert_model_if_absent(store.pool(), &seed_model("m1")).await.unwrap();

        let rec = NormalizedModel {
            id: "m1".into(),
            name: "SHOULD NOT OVERWRITE".into(),
            provider_id: "acme".into(),
            category: ModelCategory::Llm,
            input_price: 1.5,
            output_price: 2.5,
            context_window: Some(1),
            max_output_tokens: Some(1),
            modalities: vec!["text".into()],
            source: "test".into(),
        };
        upsert_model_pricing(store.pool(), &rec, Utc::now()).await.unwrap();

        let model = store.get_model("m1").await.unwrap().expect("model row");
        assert_eq!(model.input_price, 1.5);
        assert_eq!(model.output_price, 2.5);
        assert_eq!(model.pricing_source, "test");
        assert_eq!(model.name, "M1");
        assert_eq!(model.context_window, Some(128_000));
        assert_eq!(model.quality_score, Some(80.0));
    }

    #[tokio::test]
    async fn price_history_is_append_only_and_ordered() {
        let (_dir, store) = temp_store().await;
        insert_provider(store.pool(), &acme_provider()).await.unwrap();
        insert_model_if_absent(store.pool(), &seed_model("m1")).await.unwrap();

        let now = Utc::now();
        append_price_history(store.pool(), "m1", 1.0, 2.0, "seed", now).await.unwrap();
        append_price_history(store.pool(), "m1", 1.5, 2.5, "test", now).await.unwrap();

        let rows = store.price_history_for_model("m1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source, "seed");
        assert_eq!(rows[1].source, "test");
        assert_eq!(rows[1].input_price, 1.5);
    }

    #[tokio::test]
    async fn benchmark_score_upsert_is_last_write_wins() {
        let (_dir, store) = temp_store().await;
        insert_provider(store.pool(), &acme_provider()).await.unwrap();
        insert_model_if_absent(store.pool(), &seed_model("m1")).await.unwrap();
        insert_benchmark(
            store.pool(),
            &Benchmark {
                id: "arena".into(),
                name: "Arena Elo".into(),
                category: "crowd".into(),
                scale_min: 0.0,
                scale_max: 2000.0,
                higher_is_better: true,
                weight: 1.0,
            },
        )
        .await
        .unwrap();

        let mut score = NormalizedScore {
            model_id: "m1".into(),
            benchmark_id: "arena".into(),
            score: 1200.0,
            source: "arena".into(),
            source_url: None,
            measured_at: None,
        };
        upsert_benchmark_score(store.pool(), &score).await.unwrap();
        score.score = 1250.0;
        upsert_benchmark_score(store.pool(), &score).await.unwrap();

        let rows = store.scores_for_benchmark("arena").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].score, 1250.0);
    }

    #[tokio::test]
    async fn active_models_sort_by_quality_descending() {
        let (_dir, store) = temp_store().await;
        insert_provider(store.pool(), &acme_provider()).await.unwrap();
        let mut weak = seed_model("weak");
        weak.quality_score = Some(60.0);
        let mut strong = seed_model("strong");
        strong.quality_score = Some(90.0);
        insert_model_if_absent(store.pool(), &weak).await.unwrap();
        insert_model_if_absent(store.pool(), &strong).await.unwrap();

        let models = store.active_models_in_category(ModelCategory::Llm).await.unwrap();
        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["strong", "weak"]);
        assert!(store
            .active_models_in_category(ModelCategory::Image)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn news_replace_is_idempotent_by_id() {
        let (_dir, store) = temp_store().await;
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut item = NewsItem {
            id: "2026-03-01-hello-world".into(),
            title: "Hello World".into(),
            url: "https://example.com/a".into(),
            source: "Example".into(),
            summary: None,
            published: date,
            category: NewsCategory::News,
        };
        replace_news_item(store.pool(), &item).await.unwrap();
        item.summary = Some("updated".into());
        replace_news_item(store.pool(), &item).await.unwrap();

        let rows = store.news_items_on(date).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn scrape_log_round_trips() {
        let (_dir, store) = temp_store().await;
        let entry = ScrapeLogEntry {
            run_id: Uuid::new_v4(),
            source: "aggregator".into(),
            status: ScrapeStatus::Error,
            records_changed: 0,
            error: Some("http status 503".into()),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        };
        append_scrape_log(store.pool(), &entry).await.unwrap();
        let logs = store.latest_scrape_logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].run_id, entry.run_id);
        assert_eq!(logs[0].status, ScrapeStatus::Error);
        assert_eq!(logs[0].error.as_deref(), Some("http status 503"));
    }
}
