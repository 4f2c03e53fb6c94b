//! Paging module
//!
//! Cursor based deep paging over a search backend.
//!
//! # Overview
//!
//! The paging module provides:
//! - `DeepPagingIterator` - forward-only, single-use walk over every page
//!   of a `cursorMark` query, yielding one triple per document
//! - `TripleConverter` - document to triple conversion, skipped for
//!   consumers that do not need triples
//! - `TripleFields` - which index fields hold subject, predicate and object
//!
//! Iteration stops when the backend returns the cursor it was sent, not
//! when a page comes back short.

mod converter;
mod iterator;

pub use converter::{TripleConverter, TripleFields};
pub use iterator::DeepPagingIterator;

#[cfg(test)]
mod tests;
