//! Digest directory scan and store import.
//!
//! Files are named `YYYY-MM-DD-digest.md`; anything else in the directory
//! is ignored. One failing file is logged and the scan continues.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use modelhub_storage::db::replace_news_item;
use modelhub_storage::Store;
use regex::Regex;
use tokio::fs;
use tracing::{error, info};

use crate::parse_digest;

fn digest_file_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-digest\.md$").unwrap())
}

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub files_imported: usize,
    pub files_failed: usize,
    pub items_written: usize,
}

/// Date encoded in a digest file name, or `None` for non-digest files.
pub fn file_date(file_name: &str) -> Option<NaiveDate> {
    let caps = digest_file_re().captures(file_name)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}

/// Import one digest file. All of its items are written in one transaction,
/// replacing any rows with the same derived ids.
pub async fn import_digest_file(store: &Store, path: &Path, date: NaiveDate) -> Result<usize> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let items = parse_digest(&text, date);

    let mut tx = store.begin().await?;
    for item in &items {
        replace_news_item(&mut *tx, item).await?;
    }
    tx.commit().await?;

    info!(file = %path.display(), items = items.len(), "digest imported");
    Ok(items.len())
}

/// Scan `dir` for digest files and import each one, oldest first.
pub async fn import_digest_dir(store: &Store, dir: &Path) -> Result<ImportSummary> {
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("reading {}", dir.display()))?;

    let mut digest_files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(date) = file_date(name) {
            digest_files.push((date, entry.path()));
        }
    }
    digest_files.sort();

    let mut summary = ImportSummary::default();
    for (date, path) in digest_files {
        match import_digest_file(store, &path, date).await {
            Ok(count) => {
                summary.files_imported += 1;
                summary.items_written += count;
            }
            Err(err) => {
                error!(file = %path.display(), error = %err, "digest import failed");
                summary.files_failed += 1;
            }
        }
    }
    Ok(summary)
}
