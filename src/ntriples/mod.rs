//! N-Triples term parsing
//!
//! Turns the textual form of a single RDF term, as stored in an index
//! field, into a typed [`Node`](crate::model::Node).
//!
//! Supported syntax:
//! - `<http://example.org/iri>` with `\uXXXX` / `\UXXXXXXXX` escapes
//! - `_:label` blank nodes
//! - `"lexical"`, `"lexical"@lang`, `"lexical"^^<datatype>` literals

mod parser;

pub use parser::{as_node, as_uri, as_uri_or_blank_node};
