//! Configuration
//!
//! YAML configuration for the `triple-pager` command line tool:
//!
//! ```yaml
//! solr:
//!   base_url: http://localhost:8983/solr
//!   collection: store
//!   timeout_secs: 30
//! rows: 1000
//! sort: id asc
//! fields:
//!   subject: s
//!   predicate: p
//!   object: o
//! ```

use crate::error::{Error, Result};
use crate::paging::TripleFields;
use crate::solr::SolrClientConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Solr connection settings
    pub solr: SolrConfig,

    /// Records per page
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Sort clause; must include the unique key for cursor paging
    #[serde(default = "default_sort")]
    pub sort: String,

    /// Index fields holding the triple positions
    #[serde(default)]
    pub fields: TripleFields,
}

fn default_rows() -> u32 {
    1000
}

fn default_sort() -> String {
    "id asc".to_string()
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            solr: SolrConfig::default(),
            rows: default_rows(),
            sort: default_sort(),
            fields: TripleFields::default(),
        }
    }
}

impl PagerConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<()> {
        if self.solr.base_url.trim().is_empty() {
            return Err(Error::missing_config_field("solr.base_url"));
        }
        url::Url::parse(&self.solr.base_url)
            .map_err(|e| Error::invalid_config("solr.base_url", e.to_string()))?;

        if self.solr.collection.trim().is_empty() {
            return Err(Error::missing_config_field("solr.collection"));
        }
        if self.rows == 0 {
            return Err(Error::invalid_config("rows", "must be greater than 0"));
        }
        if self.sort.trim().is_empty() {
            return Err(Error::invalid_config(
                "sort",
                "cursor paging needs a sort on the unique key",
            ));
        }

        for (name, value) in [
            ("fields.subject", &self.fields.subject),
            ("fields.predicate", &self.fields.predicate),
            ("fields.object", &self.fields.object),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_config_field(name));
            }
        }

        Ok(())
    }

    /// Settings for the HTTP client
    pub fn client_config(&self) -> SolrClientConfig {
        let mut builder = SolrClientConfig::builder()
            .base_url(&self.solr.base_url)
            .collection(&self.solr.collection)
            .timeout(Duration::from_secs(self.solr.timeout_secs));

        if let Some(agent) = &self.solr.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.solr.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

// ============================================================================
// Solr Config
// ============================================================================

/// Solr connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Solr base URL
    pub base_url: String,

    /// Core or collection name
    pub collection: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SolrConfig {
    fn default() -> Self {
        let client = SolrClientConfig::default();
        Self {
            base_url: client.base_url,
            collection: client.collection,
            timeout_secs: default_timeout_secs(),
            headers: HashMap::new(),
            user_agent: None,
        }
    }
}
