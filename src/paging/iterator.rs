//! Deep paging iterator
//!
//! A finite state machine walking a cursorMark result set one page at a
//! time:
//!
//! ```text
//!  ExecuteQuery ──non-empty page──▶ IteratePage ──page consumed──▶ CheckCompletion
//!       ▲   │                                                        │     │
//!       │   └──empty page──▶ Exhausted ◀──cursor did not advance─────┘     │
//!       └───────────────────cursor advanced────────────────────────────────┘
//! ```
//!
//! Any error moves the machine to `Failed`; it cannot be used afterwards.

use super::converter::{TripleConverter, TripleFields};
use crate::consumer::GraphEventConsumer;
use crate::error::{Error, Result};
use crate::model::Triple;
use crate::solr::{SearchClient, SolrDocument, SolrQuery, CURSOR_MARK_START};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::debug;

/// Iteration state
#[derive(Debug)]
enum State {
    /// A query must be dispatched before anything is known
    ExecuteQuery,
    /// Records of the current page remain to be handed out
    IteratePage(std::vec::IntoIter<SolrDocument>),
    /// The current page is consumed; the cursors decide what comes next
    CheckCompletion,
    /// The backend has nothing more
    Exhausted,
    /// A dispatch or a conversion failed
    Failed,
}

/// Cursor sent with the last query and cursor returned for the next one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CursorPair {
    sent: String,
    next: String,
}

impl CursorPair {
    /// The backend moved the cursor, so there may be more
    fn advanced(&self) -> bool {
        self.sent != self.next
    }
}

/// Lazily pages through a Solr result set, yielding one triple per document
///
/// Usage follows a `has_next` / `next_triple` protocol: `next_triple` may
/// only be called after `has_next` returned `true`.
pub struct DeepPagingIterator {
    client: Arc<dyn SearchClient>,
    query: SolrQuery,
    consumer: Arc<dyn GraphEventConsumer>,
    converter: TripleConverter,
    cursor: CursorPair,
    state: State,
    pages_fetched: usize,
}

impl DeepPagingIterator {
    /// Create an iterator over the results of `query`
    ///
    /// The query's cursor is reset to `*`. Its sort must include the
    /// collection's unique key, as Solr requires for cursors.
    pub fn new(
        client: Arc<dyn SearchClient>,
        mut query: SolrQuery,
        consumer: Arc<dyn GraphEventConsumer>,
    ) -> Self {
        query.set_cursor_mark(CURSOR_MARK_START);
        Self {
            client,
            query,
            consumer,
            converter: TripleConverter::default(),
            cursor: CursorPair {
                sent: CURSOR_MARK_START.to_string(),
                next: String::new(),
            },
            state: State::ExecuteQuery,
            pages_fetched: 0,
        }
    }

    /// Read triples from custom field names
    #[must_use]
    pub fn with_fields(mut self, fields: TripleFields) -> Self {
        self.converter = TripleConverter::new(fields);
        self
    }

    /// The query as it will be sent next
    pub fn query(&self) -> &SolrQuery {
        &self.query
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Check if iteration has finished normally
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    /// Check if there is another triple, fetching pages as needed
    pub async fn has_next(&mut self) -> Result<bool> {
        loop {
            match &self.state {
                State::ExecuteQuery => {
                    return match self.execute_query().await {
                        Ok(true) => Ok(true),
                        Ok(false) => {
                            debug!(
                                "Empty page after {} dispatches, iteration complete",
                                self.pages_fetched
                            );
                            self.state = State::Exhausted;
                            Ok(false)
                        }
                        Err(e) => {
                            self.state = State::Failed;
                            Err(e)
                        }
                    };
                }
                State::IteratePage(documents) => {
                    if !documents.as_slice().is_empty() {
                        return Ok(true);
                    }
                    self.state = State::CheckCompletion;
                }
                State::CheckCompletion => {
                    if self.cursor.advanced() {
                        self.query.set_cursor_mark(self.cursor.next.clone());
                        self.state = State::ExecuteQuery;
                    } else {
                        debug!(
                            "Cursor '{}' did not advance after {} dispatches, iteration complete",
                            self.cursor.next, self.pages_fetched
                        );
                        self.state = State::Exhausted;
                        return Ok(false);
                    }
                }
                State::Exhausted => return Ok(false),
                State::Failed => {
                    return Err(Error::contract("iterator used after a failure"));
                }
            }
        }
    }

    /// Take the next triple
    ///
    /// Must follow a `has_next` call that returned `true`.
    pub fn next_triple(&mut self) -> Result<Arc<Triple>> {
        let document = match &mut self.state {
            State::IteratePage(documents) => documents.next().ok_or_else(|| {
                Error::contract("next_triple called without a pending record")
            })?,
            State::ExecuteQuery | State::CheckCompletion => {
                return Err(Error::contract("next_triple called before has_next"));
            }
            State::Exhausted => return Err(Error::contract("iterator is exhausted")),
            State::Failed => return Err(Error::contract("iterator used after a failure")),
        };

        self.converter
            .convert(&document, self.consumer.as_ref())
            .inspect_err(|_| self.state = State::Failed)
    }

    /// Drain the iterator, returning the number of records
    pub async fn count(mut self) -> Result<u64> {
        let mut count = 0;
        while self.has_next().await? {
            self.next_triple()?;
            count += 1;
        }
        Ok(count)
    }

    /// Turn the iterator into a stream of triples
    ///
    /// The stream ends after the last triple or after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Arc<Triple>>> + Send {
        stream::try_unfold(self, |mut iter| async move {
            if iter.has_next().await? {
                let triple = iter.next_triple()?;
                Ok(Some((triple, iter)))
            } else {
                Ok(None)
            }
        })
    }

    /// Dispatch the current query and make its page current
    ///
    /// Returns whether the page holds any record.
    async fn execute_query(&mut self) -> Result<bool> {
        let sent = self
            .query
            .cursor_mark()
            .unwrap_or(CURSOR_MARK_START)
            .to_string();

        let response = self.client.query(&self.query).await?;
        let next = response.next_cursor_mark.ok_or_else(|| {
            Error::backend(format!(
                "response to cursorMark '{sent}' carries no nextCursorMark"
            ))
        })?;
        let page = response.results;
        self.pages_fetched += 1;

        debug!(
            "Page {}: {} records, cursorMark '{}' -> '{}'",
            self.pages_fetched,
            page.len(),
            sent,
            next
        );

        self.consumer.on_page(&page);

        let has_records = !page.is_empty();
        self.cursor = CursorPair { sent, next };
        self.state = State::IteratePage(page.into_iter());
        Ok(has_records)
    }
}

impl std::fmt::Debug for DeepPagingIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepPagingIterator")
            .field("query", &self.query)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}
