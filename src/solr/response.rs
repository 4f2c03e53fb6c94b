//! Select response types

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One raw index document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolrDocument(Map<String, Value>);

impl SolrDocument {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get the value of a field
    ///
    /// Multi-valued fields yield their first value.
    pub fn field_value(&self, name: &str) -> Option<&Value> {
        match self.0.get(name)? {
            Value::Array(values) => values.first(),
            value => Some(value),
        }
    }

    /// Field names present in this document
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for SolrDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// The documents returned by one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Total number of matching documents
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    /// Offset of the first document
    #[serde(default)]
    pub start: u64,
    /// Documents in backend order
    #[serde(default)]
    pub docs: Vec<SolrDocument>,
}

impl Page {
    /// Create a page from documents
    pub fn new(docs: Vec<SolrDocument>) -> Self {
        Self {
            num_found: docs.len() as u64,
            start: 0,
            docs,
        }
    }

    /// Set the total number of matching documents
    #[must_use]
    pub fn with_num_found(mut self, num_found: u64) -> Self {
        self.num_found = num_found;
        self
    }

    /// Number of documents in this page
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if the page holds no documents
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterate over documents
    pub fn iter(&self) -> std::slice::Iter<'_, SolrDocument> {
        self.docs.iter()
    }
}

impl IntoIterator for Page {
    type Item = SolrDocument;
    type IntoIter = std::vec::IntoIter<SolrDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.into_iter()
    }
}

/// Result of one dispatched query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// The page of documents
    #[serde(rename = "response")]
    pub results: Page,
    /// Cursor to send for the following page
    #[serde(rename = "nextCursorMark", default)]
    pub next_cursor_mark: Option<String>,
}

impl QueryResponse {
    /// Create a response
    pub fn new(results: Page, next_cursor_mark: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor_mark: Some(next_cursor_mark.into()),
        }
    }

    /// Parse a `wt=json` select response body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}
