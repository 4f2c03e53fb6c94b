#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # triple-pager
//!
//! Lazy, cursor based deep paging over RDF triples stored in Solr.
//!
//! A query is sent with `cursorMark=*`; each response carries the cursor
//! for the following page. Pages are fetched one at a time, only when the
//! previous one has been consumed, and iteration ends when the backend
//! hands back the cursor it was sent.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use triple_pager::consumer::BuildTriples;
//! use triple_pager::paging::DeepPagingIterator;
//! use triple_pager::solr::{SolrClient, SolrClientConfig, SolrQuery};
//!
//! #[tokio::main]
//! async fn main() -> triple_pager::Result<()> {
//!     let client = SolrClient::new(SolrClientConfig::builder().collection("store").build())?;
//!     let query = SolrQuery::new("*:*").with_sort("id asc").with_rows(500);
//!
//!     let mut triples = DeepPagingIterator::new(Arc::new(client), query, Arc::new(BuildTriples));
//!     while triples.has_next().await? {
//!         println!("{}", triples.next_triple()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    DeepPagingIterator                     │
//! │   has_next() / next_triple()   into_stream()   count()    │
//! └───────────────────────────────────────────────────────────┘
//!          │                    │                     │
//! ┌────────┴────────┬───────────┴─────────┬───────────┴───────┐
//! │  SearchClient   │  TripleConverter    │ GraphEventConsumer│
//! ├─────────────────┼─────────────────────┼───────────────────┤
//! │ SolrClient      │ N-Triples terms     │ build or skip     │
//! │ cursorMark      │ (ANY, ANY, ANY)     │ page / triple     │
//! │                 │  fast path          │  hooks            │
//! └─────────────────┴─────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// RDF nodes and triples
pub mod model;

/// N-Triples term parsing
pub mod ntriples;

/// Search backend boundary and Solr HTTP client
pub mod solr;

/// Graph event consumers
pub mod consumer;

/// Cursor based deep paging
pub mod paging;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use consumer::{BuildTriples, GraphEventConsumer, SkipTripleBuild};
pub use model::{Literal, Node, Triple};
pub use paging::{DeepPagingIterator, TripleFields};
pub use solr::{SearchClient, SolrClient, SolrClientConfig, SolrQuery};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
