//! Remote quote source.
//!
//! Fetches a JSON array from the configured endpoint and maps each item's
//! `title` into a candidate quote under a fixed category label.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{AppError, Quote, Result, SyncConfig};

/// A source of remote quote batches.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the current remote batch.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status or a body
    /// that is not a JSON array.
    async fn fetch_batch(&self) -> Result<Vec<Quote>>;
}

/// HTTP(S) JSON endpoint source.
pub struct HttpQuoteSource {
    client: reqwest::Client,
    endpoint: String,
    category: String,
}

impl HttpQuoteSource {
    /// Build a source from sync configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("quote-keeper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::remote)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            category: config.remote_category.clone(),
        })
    }
}

#[async_trait]
impl RemoteSource for HttpQuoteSource {
    async fn fetch_batch(&self) -> Result<Vec<Quote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(AppError::remote)?;

        if !response.status().is_success() {
            return Err(AppError::Remote {
                message: format!(
                    "{} returned status {}",
                    self.endpoint,
                    response.status().as_u16()
                ),
                source: None,
            });
        }

        let body: Value = response.json().await.map_err(AppError::remote)?;
        let batch = map_batch(&body, &self.category)?;

        tracing::debug!(endpoint = %self.endpoint, items = batch.len(), "Fetched remote batch");

        Ok(batch)
    }
}

/// Map a remote JSON document into candidate quotes.
///
/// The remote's own category, if any, is ignored: every candidate gets
/// `category`. Items without a string `title` are skipped.
fn map_batch(body: &Value, category: &str) -> Result<Vec<Quote>> {
    let items = body.as_array().ok_or_else(|| AppError::Remote {
        message: "expected a JSON array".into(),
        source: None,
    })?;

    Ok(items
        .iter()
        .filter_map(|item| item.get("title").and_then(Value::as_str))
        .map(|title| Quote::new(title, category))
        .collect())
}
