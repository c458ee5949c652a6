//! Remote quote source
//!
//! The remote side is any HTTP endpoint that answers `GET` with a JSON array
//! of records and accepts a `POST` of a single quote. Records are mapped into
//! quotes as `{text: record.title, category: record.category}`, falling back
//! to a configured placeholder category.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::Quote;

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Error bodies are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 180;

/// A source of remote quotes
pub trait RemoteSource: Send + Sync + 'static {
    /// Fetch the current remote quote set
    fn fetch_quotes(&self) -> impl Future<Output = Result<Vec<Quote>>> + Send;

    /// Send one quote and return the remote's representation of it
    fn post_quote(&self, quote: &Quote) -> impl Future<Output = Result<Value>> + Send;
}

/// A record as served by the remote endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl RemoteRecord {
    /// Map into the local quote shape
    pub fn into_quote(self, default_category: &str) -> Quote {
        let text = self.title.or(self.text).unwrap_or_default();
        let category = self
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| default_category.to_string());
        Quote::new(text, category)
    }
}

/// Map the first `limit` records into quotes
pub fn records_to_quotes(
    records: Vec<RemoteRecord>,
    limit: usize,
    default_category: &str,
) -> Vec<Quote> {
    records
        .into_iter()
        .take(limit)
        .map(|r| r.into_quote(default_category))
        .collect()
}

/// Remote source reached over HTTP
#[derive(Clone)]
pub struct HttpRemote {
    url: String,
    limit: usize,
    default_category: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client for `url`
    pub fn new(url: &str, limit: usize, default_category: &str) -> Result<Self> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Network(format!(
                "sync_url must include http:// or https:// (got '{}')",
                url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url,
            limit,
            default_category: default_category.to_string(),
            client,
        })
    }

    /// Create a client from the sync settings in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.sync_url,
            config.remote_limit,
            &config.server_category,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteSource for HttpRemote {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        debug!("Fetching remote quotes from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Network(api_error(status, &body)));
        }

        let records: Vec<RemoteRecord> =
            serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(records_to_quotes(
            records,
            self.limit,
            &self.default_category,
        ))
    }

    async fn post_quote(&self, quote: &Quote) -> Result<Value> {
        debug!("Posting quote to {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(quote)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Network(api_error(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| Error::Parse(e.to_string()))
    }
}

fn api_error(status: reqwest::StatusCode, body: &str) -> String {
    let trimmed: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}
