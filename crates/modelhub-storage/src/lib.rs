//! Persistent store (sqlx + SQLite) and HTTP fetch utilities for modelhub.

pub mod db;
pub mod fetch;

pub use db::{Store, StoreError};
pub use fetch::{Accept, FetchConfig, FetchError, HttpFetcher, BOT_USER_AGENT};

pub const CRATE_NAME: &str = "modelhub-storage";
