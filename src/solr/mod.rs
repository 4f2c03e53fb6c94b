//! Solr module
//!
//! The search backend boundary: what is sent, what comes back, and who
//! sends it.
//!
//! # Overview
//!
//! - `SolrQuery` - ordered, multi-valued request parameters
//! - `Page`, `SolrDocument`, `QueryResponse` - one select response
//! - `SearchClient` - the single backend operation the pager relies on
//! - `SolrClient` - `SearchClient` over HTTP against `/{collection}/select`

mod client;
mod query;
mod response;

pub use client::{SearchClient, SolrClient, SolrClientConfig, SolrClientConfigBuilder};
pub use query::{SolrQuery, CURSOR_MARK_PARAM, CURSOR_MARK_START};
pub use response::{Page, QueryResponse, SolrDocument};
