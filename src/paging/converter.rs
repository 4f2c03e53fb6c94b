//! Record to triple conversion

use crate::consumer::GraphEventConsumer;
use crate::error::{Error, Result};
use crate::model::Triple;
use crate::ntriples;
use crate::solr::SolrDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// Names of the index fields holding the three triple positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripleFields {
    /// Subject field
    pub subject: String,
    /// Predicate field
    pub predicate: String,
    /// Object field
    pub object: String,
}

impl Default for TripleFields {
    fn default() -> Self {
        Self {
            subject: "s".to_string(),
            predicate: "p".to_string(),
            object: "o".to_string(),
        }
    }
}

impl TripleFields {
    /// Create custom field names
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Comma separated field list, suitable for `fl`
    pub fn field_list(&self) -> String {
        format!("{},{},{}", self.subject, self.predicate, self.object)
    }
}

/// Turns index documents into triples
#[derive(Debug, Clone, Default)]
pub struct TripleConverter {
    fields: TripleFields,
}

impl TripleConverter {
    /// Create a converter reading the given fields
    pub fn new(fields: TripleFields) -> Self {
        Self { fields }
    }

    /// Field names this converter reads
    pub fn fields(&self) -> &TripleFields {
        &self.fields
    }

    /// Convert one document for the given consumer
    ///
    /// Consumers that do not need triples get the shared `(ANY, ANY, ANY)`
    /// triple and the document is not read at all.
    pub fn convert(
        &self,
        document: &SolrDocument,
        consumer: &dyn GraphEventConsumer,
    ) -> Result<Arc<Triple>> {
        let triple = if consumer.requires_triple_build() {
            Arc::new(self.build(document)?)
        } else {
            Triple::any()
        };

        consumer.after_triple_built(&triple);
        Ok(triple)
    }

    /// Parse the three fields of a document into a triple
    pub fn build(&self, document: &SolrDocument) -> Result<Triple> {
        let subject = ntriples::as_uri_or_blank_node(field(document, &self.fields.subject)?)?;
        let predicate = ntriples::as_uri(field(document, &self.fields.predicate)?)?;
        let object = ntriples::as_node(field(document, &self.fields.object)?)?;

        let triple = Triple::new(subject, predicate, object);
        trace!("Built triple {}", triple);
        Ok(triple)
    }
}

fn field<'a>(document: &'a SolrDocument, name: &str) -> Result<&'a str> {
    match document.field_value(name) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(Error::InvalidFieldType {
            field: name.to_string(),
        }),
        None => Err(Error::missing_field(name)),
    }
}
