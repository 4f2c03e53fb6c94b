//! Tests for the paging module

use super::*;
use crate::consumer::{BuildTriples, GraphEventConsumer, SkipTripleBuild};
use crate::error::{Error, Result};
use crate::model::{Literal, Node, Triple};
use crate::solr::{Page, QueryResponse, SearchClient, SolrDocument, SolrQuery};
use async_trait::async_trait;
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// Test fixtures
// ============================================================================

/// One scripted backend reply
enum Reply {
    Page(QueryResponse),
    Fail(&'static str),
}

/// Backend replaying scripted pages and recording what it was sent
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    sent_cursors: Mutex<Vec<Option<String>>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            sent_cursors: Mutex::new(Vec::new()),
        })
    }

    fn sent_cursors(&self) -> Vec<Option<String>> {
        self.sent_cursors.lock().unwrap().clone()
    }

    fn dispatches(&self) -> usize {
        self.sent_cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchClient for ScriptedBackend {
    async fn query(&self, query: &SolrQuery) -> Result<QueryResponse> {
        self.sent_cursors
            .lock()
            .unwrap()
            .push(query.cursor_mark().map(String::from));

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Page(response)) => Ok(response),
            Some(Reply::Fail(message)) => Err(Error::backend(message)),
            None => Err(Error::backend("unexpected dispatch")),
        }
    }
}

/// Consumer recording every callback
struct RecordingConsumer {
    build: bool,
    events: Mutex<Vec<String>>,
}

impl RecordingConsumer {
    fn new(build: bool) -> Arc<Self> {
        Arc::new(Self {
            build,
            events: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl GraphEventConsumer for RecordingConsumer {
    fn requires_triple_build(&self) -> bool {
        self.events.lock().unwrap().push("requires".to_string());
        self.build
    }

    fn on_page(&self, page: &Page) {
        self.events
            .lock()
            .unwrap()
            .push(format!("page:{}", page.len()));
    }

    fn after_triple_built(&self, triple: &Triple) {
        let label = if triple.is_any() {
            "built:ANY".to_string()
        } else {
            format!("built:{}", triple.subject)
        };
        self.events.lock().unwrap().push(label);
    }
}

fn doc(name: &str) -> SolrDocument {
    SolrDocument::new()
        .with_field("s", format!("<http://example.org/{name}>"))
        .with_field("p", "<http://purl.org/dc/elements/1.1/title>")
        .with_field("o", format!("\"{name}\"@en"))
}

fn page(docs: Vec<SolrDocument>, next: &str) -> Reply {
    Reply::Page(QueryResponse::new(Page::new(docs), next))
}

/// `[A, B]` then `[C]` then an empty page returning the cursor it was sent
fn three_page_backend() -> Arc<ScriptedBackend> {
    ScriptedBackend::new(vec![
        page(vec![doc("A"), doc("B")], "c2"),
        page(vec![doc("C")], "c3"),
        page(vec![], "c3"),
    ])
}

fn iterator(
    backend: &Arc<ScriptedBackend>,
    consumer: Arc<dyn GraphEventConsumer>,
) -> DeepPagingIterator {
    let client: Arc<dyn SearchClient> = backend.clone();
    DeepPagingIterator::new(client, SolrQuery::new("*:*").with_sort("id asc"), consumer)
}

async fn drain(iter: &mut DeepPagingIterator) -> Result<Vec<Arc<Triple>>> {
    let mut triples = Vec::new();
    while iter.has_next().await? {
        triples.push(iter.next_triple()?);
    }
    Ok(triples)
}

fn subjects(triples: &[Arc<Triple>]) -> Vec<String> {
    triples.iter().map(|t| t.subject.to_string()).collect()
}

// ============================================================================
// Iteration
// ============================================================================

#[tokio::test]
async fn test_walks_all_pages_in_order() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    let triples = drain(&mut iter).await.unwrap();

    assert_eq!(
        subjects(&triples),
        vec![
            "<http://example.org/A>",
            "<http://example.org/B>",
            "<http://example.org/C>"
        ]
    );
    assert_eq!(
        triples[0].object,
        Node::Literal(Literal::lang_tagged("A", "en"))
    );
    assert_eq!(backend.dispatches(), 3);
    assert_eq!(iter.pages_fetched(), 3);
    assert!(iter.is_exhausted());
}

#[tokio::test]
async fn test_exhausted_iterator_stays_exhausted() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));
    drain(&mut iter).await.unwrap();

    assert!(!iter.has_next().await.unwrap());
    assert!(!iter.has_next().await.unwrap());
    assert_eq!(backend.dispatches(), 3);
}

#[tokio::test]
async fn test_cursor_sent_is_previous_next_cursor() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));
    drain(&mut iter).await.unwrap();

    assert_eq!(
        backend.sent_cursors(),
        vec![
            Some("*".to_string()),
            Some("c2".to_string()),
            Some("c3".to_string())
        ]
    );
}

#[tokio::test]
async fn test_query_cursor_starts_at_initial_marker() {
    let backend = three_page_backend();
    let query = SolrQuery::new("*:*").with_sort("id asc");
    let mut query_with_stale_cursor = query.clone();
    query_with_stale_cursor.set_cursor_mark("stale");

    let client: Arc<dyn SearchClient> = backend.clone();
    let iter = DeepPagingIterator::new(client, query_with_stale_cursor, Arc::new(BuildTriples));

    assert_eq!(iter.query().cursor_mark(), Some("*"));
    assert_eq!(iter.query().get("sort"), Some("id asc"));
    assert_eq!(backend.dispatches(), 0);
}

#[tokio::test]
async fn test_empty_result_set() {
    let backend = ScriptedBackend::new(vec![page(vec![], "*")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(!iter.has_next().await.unwrap());
    assert!(!iter.has_next().await.unwrap());
    assert_eq!(backend.dispatches(), 1);

    let err = iter.next_triple().unwrap_err();
    assert!(matches!(err, Error::Contract { .. }));
}

#[tokio::test]
async fn test_empty_first_page_ends_even_if_cursor_moved() {
    let backend = ScriptedBackend::new(vec![page(vec![], "c1"), page(vec![doc("A")], "c2")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(!iter.has_next().await.unwrap());
    assert_eq!(backend.dispatches(), 1);
}

#[tokio::test]
async fn test_unchanged_cursor_ends_after_non_empty_page() {
    let backend = ScriptedBackend::new(vec![
        page(vec![doc("A")], "c1"),
        page(vec![doc("B")], "c1"),
    ]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    let triples = drain(&mut iter).await.unwrap();
    assert_eq!(
        subjects(&triples),
        vec!["<http://example.org/A>", "<http://example.org/B>"]
    );
    assert_eq!(backend.dispatches(), 2);
}

#[tokio::test]
async fn test_has_next_does_not_refetch() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(iter.has_next().await.unwrap());
    assert!(iter.has_next().await.unwrap());
    assert!(iter.has_next().await.unwrap());
    assert_eq!(backend.dispatches(), 1);

    let first = iter.next_triple().unwrap();
    assert_eq!(first.subject, Node::uri("http://example.org/A"));
}

#[tokio::test]
async fn test_no_dispatch_until_asked() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(iter.has_next().await.unwrap());
    iter.next_triple().unwrap();
    assert!(iter.has_next().await.unwrap());
    iter.next_triple().unwrap();
    assert_eq!(backend.dispatches(), 1);

    assert!(iter.has_next().await.unwrap());
    assert_eq!(backend.dispatches(), 2);
}

// ============================================================================
// Fast path
// ============================================================================

#[tokio::test]
async fn test_skip_build_yields_shared_placeholder() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(SkipTripleBuild));

    let triples = drain(&mut iter).await.unwrap();

    assert_eq!(triples.len(), 3);
    let any = Triple::any();
    assert!(triples.iter().all(|t| Arc::ptr_eq(t, &any)));
    assert_eq!(backend.dispatches(), 3);
}

#[tokio::test]
async fn test_skip_build_ignores_malformed_records() {
    let malformed = SolrDocument::new()
        .with_field("s", "not a node")
        .with_field("o", 42);
    let backend = ScriptedBackend::new(vec![
        page(vec![doc("A"), malformed], "c2"),
        page(vec![SolrDocument::new()], "c3"),
        page(vec![], "c3"),
    ]);
    let mut iter = iterator(&backend, Arc::new(SkipTripleBuild));

    let triples = drain(&mut iter).await.unwrap();
    assert_eq!(triples.len(), 3);
    assert!(triples.iter().all(|t| t.is_any()));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_parse_failure_is_fatal() {
    let bad = SolrDocument::new()
        .with_field("s", "\"literal subject\"")
        .with_field("p", "<http://example.org/p>")
        .with_field("o", "<http://example.org/o>");
    let backend = ScriptedBackend::new(vec![page(vec![doc("A"), bad, doc("C")], "c1")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(iter.has_next().await.unwrap());
    iter.next_triple().unwrap();
    assert!(iter.has_next().await.unwrap());

    let err = iter.next_triple().unwrap_err();
    assert!(err.is_record_error(), "unexpected error: {err}");

    // No skipping past the broken record
    assert!(matches!(
        iter.has_next().await.unwrap_err(),
        Error::Contract { .. }
    ));
    assert!(matches!(
        iter.next_triple().unwrap_err(),
        Error::Contract { .. }
    ));
}

#[tokio::test]
async fn test_missing_and_non_string_fields() {
    let missing = SolrDocument::new()
        .with_field("s", "<http://example.org/s>")
        .with_field("p", "<http://example.org/p>");
    let backend = ScriptedBackend::new(vec![page(vec![missing], "c1")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));
    assert!(iter.has_next().await.unwrap());
    let err = iter.next_triple().unwrap_err();
    assert!(matches!(err, Error::MissingField { ref field } if field == "o"));

    let numeric = doc("A").with_field("p", json!(7));
    let backend = ScriptedBackend::new(vec![page(vec![numeric], "c1")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));
    assert!(iter.has_next().await.unwrap());
    let err = iter.next_triple().unwrap_err();
    assert!(matches!(err, Error::InvalidFieldType { ref field } if field == "p"));
}

#[tokio::test]
async fn test_backend_failure_is_fatal() {
    let backend = ScriptedBackend::new(vec![
        page(vec![doc("A")], "c1"),
        Reply::Fail("connection reset"),
        page(vec![doc("B")], "c2"),
    ]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(iter.has_next().await.unwrap());
    iter.next_triple().unwrap();

    let err = iter.has_next().await.unwrap_err();
    assert_eq!(err.to_string(), "Search backend error: connection reset");
    assert_eq!(backend.dispatches(), 2);

    assert!(matches!(
        iter.has_next().await.unwrap_err(),
        Error::Contract { .. }
    ));
    assert_eq!(backend.dispatches(), 2);
}

#[tokio::test]
async fn test_missing_next_cursor_is_a_backend_error() {
    let reply = Reply::Page(QueryResponse {
        results: Page::new(vec![doc("A")]),
        next_cursor_mark: None,
    });
    let backend = ScriptedBackend::new(vec![reply]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    let err = iter.has_next().await.unwrap_err();
    assert!(matches!(err, Error::Backend { .. }));
    assert!(err.to_string().contains("nextCursorMark"));
}

#[tokio::test]
async fn test_next_triple_before_has_next() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    let err = iter.next_triple().unwrap_err();
    assert!(matches!(err, Error::Contract { .. }));
    assert_eq!(backend.dispatches(), 0);
}

#[tokio::test]
async fn test_next_triple_past_page_end() {
    let backend = three_page_backend();
    let mut iter = iterator(&backend, Arc::new(BuildTriples));

    assert!(iter.has_next().await.unwrap());
    iter.next_triple().unwrap();
    iter.next_triple().unwrap();
    let err = iter.next_triple().unwrap_err();
    assert!(matches!(err, Error::Contract { .. }));

    // Still usable through the proper protocol
    assert!(iter.has_next().await.unwrap());
    assert_eq!(
        iter.next_triple().unwrap().subject,
        Node::uri("http://example.org/C")
    );
}

// ============================================================================
// Consumer hooks
// ============================================================================

#[tokio::test]
async fn test_hooks_fire_per_page_and_per_triple() {
    let backend = three_page_backend();
    let consumer = RecordingConsumer::new(true);
    let mut iter = iterator(&backend, consumer.clone());

    drain(&mut iter).await.unwrap();

    assert_eq!(
        consumer.events(),
        vec![
            "page:2",
            "requires",
            "built:<http://example.org/A>",
            "requires",
            "built:<http://example.org/B>",
            "page:1",
            "requires",
            "built:<http://example.org/C>",
            "page:0",
        ]
    );
}

#[tokio::test]
async fn test_hooks_see_placeholder_on_fast_path() {
    let backend = ScriptedBackend::new(vec![page(vec![doc("A")], "*")]);
    let consumer = RecordingConsumer::new(false);
    let mut iter = iterator(&backend, consumer.clone());

    drain(&mut iter).await.unwrap();

    assert_eq!(
        consumer.events(),
        vec!["page:1", "requires", "built:ANY"]
    );
}

// ============================================================================
// Adapters and configuration
// ============================================================================

#[tokio::test]
async fn test_into_stream() {
    let backend = three_page_backend();
    let stream = iterator(&backend, Arc::new(BuildTriples)).into_stream();

    let triples: Vec<Arc<Triple>> = stream
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(triples.len(), 3);
    assert_eq!(triples[2].subject, Node::uri("http://example.org/C"));
}

#[tokio::test]
async fn test_into_stream_stops_after_error() {
    let backend = ScriptedBackend::new(vec![
        page(vec![doc("A")], "c1"),
        Reply::Fail("boom"),
    ]);
    let results: Vec<Result<Arc<Triple>>> = iterator(&backend, Arc::new(BuildTriples))
        .into_stream()
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}

#[tokio::test]
async fn test_count() {
    let backend = three_page_backend();
    let count = iterator(&backend, Arc::new(SkipTripleBuild))
        .count()
        .await
        .unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_custom_fields() {
    let record = SolrDocument::new()
        .with_field("subject", "_:b1")
        .with_field("predicate", "<http://example.org/p>")
        .with_field("object", "<http://example.org/o>");
    let backend = ScriptedBackend::new(vec![page(vec![record], "*")]);
    let mut iter = iterator(&backend, Arc::new(BuildTriples))
        .with_fields(TripleFields::new("subject", "predicate", "object"));

    let triples = drain(&mut iter).await.unwrap();
    assert_eq!(triples[0].subject, Node::blank("b1"));
    assert_eq!(triples[0].object, Node::uri("http://example.org/o"));
}

// ============================================================================
// Converter
// ============================================================================

#[test]
fn test_triple_fields_default() {
    let fields = TripleFields::default();
    assert_eq!(fields.field_list(), "s,p,o");
    assert_eq!(
        TripleFields::new("subj", "pred", "obj").field_list(),
        "subj,pred,obj"
    );
}

#[test]
fn test_converter_build() {
    let converter = TripleConverter::default();
    let triple = converter.build(&doc("X")).unwrap();
    assert_eq!(
        triple.to_string(),
        "<http://example.org/X> <http://purl.org/dc/elements/1.1/title> \"X\"@en ."
    );
}

#[test]
fn test_converter_predicate_must_be_uri() {
    let record = doc("X").with_field("p", "_:b0");
    let err = TripleConverter::default().build(&record).unwrap_err();
    assert!(matches!(err, Error::InvalidNode { .. }));
}

#[test]
fn test_converter_multi_valued_field() {
    let record = doc("X").with_field("o", json!(["\"first\"", "\"second\""]));
    let triple = TripleConverter::default().build(&record).unwrap();
    assert_eq!(triple.object, Node::Literal(Literal::simple("first")));
}
