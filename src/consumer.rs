//! Graph event consumer
//!
//! The party reading triples decides whether it needs them built at all,
//! and may observe each fetched page and each returned triple.

use crate::model::Triple;
use crate::solr::Page;

/// Consumer of the triples produced by a paging iterator
pub trait GraphEventConsumer: Send + Sync {
    /// Whether records must be turned into full triples
    ///
    /// When this returns `false` the iterator hands out the shared
    /// `(ANY, ANY, ANY)` triple without reading the record.
    fn requires_triple_build(&self) -> bool;

    /// Called once per fetched page, before any of its records is converted
    fn on_page(&self, _page: &Page) {}

    /// Called once per returned triple
    fn after_triple_built(&self, _triple: &Triple) {}
}

/// Consumer that needs every triple built
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildTriples;

impl GraphEventConsumer for BuildTriples {
    fn requires_triple_build(&self) -> bool {
        true
    }
}

/// Consumer that only counts or checks for existence
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipTripleBuild;

impl GraphEventConsumer for SkipTripleBuild {
    fn requires_triple_build(&self) -> bool {
        false
    }
}
