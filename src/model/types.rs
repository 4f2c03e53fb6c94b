//! Node and triple types

use std::fmt;
use std::sync::{Arc, LazyLock};

/// The `(ANY, ANY, ANY)` triple handed out when callers skip triple building
static ANY_TRIPLE: LazyLock<Arc<Triple>> =
    LazyLock::new(|| Arc::new(Triple::new(Node::Any, Node::Any, Node::Any)));

/// An RDF term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// Absolute IRI, stored unescaped and without angle brackets
    Uri(String),
    /// Blank node label, without the `_:` prefix
    Blank(String),
    /// Literal value
    Literal(Literal),
    /// Wildcard matching any node
    Any,
}

impl Node {
    /// Create a URI node
    pub fn uri(iri: impl Into<String>) -> Self {
        Self::Uri(iri.into())
    }

    /// Create a blank node
    pub fn blank(label: impl Into<String>) -> Self {
        Self::Blank(label.into())
    }

    /// Check if this is a URI node
    pub fn is_uri(&self) -> bool {
        matches!(self, Self::Uri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Check if this is the wildcard
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Get the IRI of a URI node
    pub fn as_uri(&self) -> Option<&str> {
        match self {
            Self::Uri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Get the literal of a literal node
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<Literal> for Node {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(iri) => write!(f, "<{iri}>"),
            Self::Blank(label) => write!(f, "_:{label}"),
            Self::Literal(literal) => fmt::Display::fmt(literal, f),
            Self::Any => f.write_str("ANY"),
        }
    }
}

/// An RDF literal
///
/// At most one of `language` and `datatype` is set. A literal with neither
/// is a simple (`xsd:string`) literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    /// Unescaped lexical form
    pub lexical: String,
    /// Language tag, without the `@`
    pub language: Option<String>,
    /// Datatype IRI
    pub datatype: Option<String>,
}

impl Literal {
    /// Create a simple literal
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Create a language-tagged literal
    pub fn lang_tagged(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Create a typed literal
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for ch in self.lexical.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                other => write!(f, "{other}")?,
            }
        }
        f.write_str("\"")?;

        if let Some(language) = &self.language {
            write!(f, "@{language}")
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^<{datatype}>")
        } else {
            Ok(())
        }
    }
}

/// An RDF triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// URI or blank node
    pub subject: Node,
    /// URI
    pub predicate: Node,
    /// Any node
    pub object: Node,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The shared `(ANY, ANY, ANY)` triple
    ///
    /// Every call returns a clone of the same `Arc`.
    pub fn any() -> Arc<Triple> {
        Arc::clone(&ANY_TRIPLE)
    }

    /// Check if all three positions are wildcards
    pub fn is_any(&self) -> bool {
        self.subject.is_any() && self.predicate.is_any() && self.object.is_any()
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
