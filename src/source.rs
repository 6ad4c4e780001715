//! Quote sources.
//!
//! Defines the `QuoteSource` trait and the HTTP implementation that
//! queries the remote quote API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::types::{Quote, QuoteError};

const USER_AGENT: &str = "quote-poller/0.1.0";

/// Abstraction over anything that yields a batch of quotes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the current batch of quotes.
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, QuoteError>;

    /// Where the quotes come from, for logging.
    fn describe(&self) -> String;
}

/// Quote source backed by `GET <endpoint>`.
pub struct HttpQuoteSource {
    http: Client,
    endpoint: String,
}

impl HttpQuoteSource {
    /// Build a client for `endpoint`. No request timeout is set.
    pub fn new(endpoint: String) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for quote API")?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, QuoteError> {
        debug!(endpoint = %self.endpoint, "Querying quote API");

        let resp = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(QuoteError::Transport)?;

        let status = resp.status();
        if status.as_u16() > 399 {
            return Err(QuoteError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = resp.text().await.map_err(QuoteError::Body)?;
        let quotes: Vec<Quote> = serde_json::from_str(&body)?;

        debug!(count = quotes.len(), "Quotes received");
        Ok(quotes)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
