//! Thin HTTP GET adapter with a fixed bot identity.
//!
//! No retries and no caching live here: a failed fetch is reported to the
//! caller as-is, and the next scheduled run is the retry mechanism.

use std::time::Duration;

use anyhow::Context;
use thiserror::Error;
use tracing::info_span;

/// Fixed descriptive client identity sent with every request.
pub const BOT_USER_AGENT: &str = "modelhub-bot/0.1 (+https://modelhub.dev/about/bot)";

/// Accept negotiation per source kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// `application/json` for API-only sources.
    Json,
    /// `text/html,application/json,*/*` for everything else.
    Any,
}

impl Accept {
    fn header_value(self) -> &'static str {
        match self {
            Accept::Json => "application/json",
            Accept::Any => "text/html,application/json,*/*",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            user_agent: BOT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("unparseable body from {url}: {reason}")]
    InvalidBody { url: String, reason: String },
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .context("building reqwest client")?;
        Ok(Self { client })
    }

    /// GET `url` and return the body text. Any non-2xx status is a failure.
    pub async fn get_text(&self, url: &str, accept: Accept) -> Result<String, FetchError> {
        let span = info_span!("http_fetch", url);
        let _guard = span.enter();

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept.header_value())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: resp.url().to_string(),
            });
        }

        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }

    /// GET `url` with JSON Accept negotiation and parse the body.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let body = self.get_text(url, Accept::Json).await?;
        serde_json::from_str(&body).map_err(|err| FetchError::InvalidBody {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_negotiation_values() {
        assert_eq!(Accept::Json.header_value(), "application/json");
        assert_eq!(Accept::Any.header_value(), "text/html,application/json,*/*");
    }

    #[test]
    fn default_config_carries_bot_identity() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, BOT_USER_AGENT);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
