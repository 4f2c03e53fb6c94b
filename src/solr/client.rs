//! Search backend client
//!
//! `SearchClient` is the one operation the pager needs from a backend.
//! `SolrClient` implements it over HTTP:
//! - one GET to `{base_url}/{collection}/select` per call
//! - `wt=json` responses parsed into `QueryResponse`
//! - error classification (status, timeout, transport, malformed body)
//!
//! Failures are returned as-is. Retrying is left to the caller.

use super::query::SolrQuery;
use super::response::QueryResponse;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A backend that executes one query and returns one page
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Execute the query and return its page plus the next cursor
    async fn query(&self, query: &SolrQuery) -> Result<QueryResponse>;
}

/// Configuration for the Solr HTTP client
#[derive(Debug, Clone)]
pub struct SolrClientConfig {
    /// Solr base URL, e.g. `http://localhost:8983/solr`
    pub base_url: String,
    /// Core or collection name
    pub collection: String,
    /// Request timeout
    pub timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for SolrClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8983/solr".to_string(),
            collection: "store".to_string(),
            timeout: Duration::from_secs(30),
            default_headers: HashMap::new(),
            user_agent: format!("triple-pager/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SolrClientConfig {
    /// Create a new config builder
    pub fn builder() -> SolrClientConfigBuilder {
        SolrClientConfigBuilder::default()
    }
}

/// Builder for Solr client config
#[derive(Default)]
pub struct SolrClientConfigBuilder {
    config: SolrClientConfig,
}

impl SolrClientConfigBuilder {
    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the collection
    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.config.collection = collection.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> SolrClientConfig {
        self.config
    }
}

/// HTTP client for a single Solr collection
pub struct SolrClient {
    client: Client,
    config: SolrClientConfig,
    select_url: Url,
}

impl SolrClient {
    /// Create a client for the configured collection
    pub fn new(config: SolrClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let select_url = build_select_url(&config.base_url, &config.collection)?;

        Ok(Self {
            client,
            config,
            select_url,
        })
    }

    /// The URL queries are sent to
    pub fn select_url(&self) -> &Url {
        &self.select_url
    }

    /// Get the client configuration
    pub fn config(&self) -> &SolrClientConfig {
        &self.config
    }
}

#[async_trait]
impl SearchClient for SolrClient {
    async fn query(&self, query: &SolrQuery) -> Result<QueryResponse> {
        let mut params: Vec<(&str, &str)> = query
            .params()
            .iter()
            .filter(|(key, _)| key != "wt")
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        params.push(("wt", "json"));

        let mut req = self.client.get(self.select_url.clone()).query(&params);
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        debug!(
            "GET {} cursorMark={}",
            self.select_url,
            query.cursor_mark().unwrap_or("-")
        );

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), error_message(&body)));
        }

        QueryResponse::from_json(&body)
    }
}

impl std::fmt::Debug for SolrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolrClient")
            .field("select_url", &self.select_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build `{base_url}/{collection}/select`
fn build_select_url(base_url: &str, collection: &str) -> Result<Url> {
    let collection = collection.trim_matches('/');
    if collection.is_empty() {
        return Err(Error::invalid_config("collection", "must not be empty"));
    }

    let base = format!("{}/", base_url.trim_end_matches('/'));
    Ok(Url::parse(&base)?.join(&format!("{collection}/select"))?)
}

/// Pull `error.msg` out of a Solr error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/msg").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
