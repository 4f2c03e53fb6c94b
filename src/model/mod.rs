//! RDF model module
//!
//! The triples this crate yields and the nodes they are made of.
//!
//! # Overview
//!
//! - `Node` - URI, blank node, literal, or the `ANY` wildcard
//! - `Literal` - lexical form plus language tag or datatype
//! - `Triple` - subject, predicate, object
//!
//! `Display` renders nodes and triples in N-Triples syntax.

mod types;

pub use types::{Literal, Node, Triple};
