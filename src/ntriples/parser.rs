//! Term parsers
//!
//! One entry point per triple position: subjects accept URIs and blank
//! nodes, predicates only URIs, objects any term.

use crate::error::{Error, Result};
use crate::model::{Literal, Node};
use regex::Regex;
use std::sync::LazyLock;

/// IRI scheme, required for absolute IRIs
static SCHEME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").unwrap());

/// Blank node label (PN_CHARS_U / PN_CHARS, no trailing dot)
static BLANK_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}_:]([\p{L}\p{N}_:.\-\x{B7}]*[\p{L}\p{N}_:\-\x{B7}])?$").unwrap()
});

/// BCP47-ish language tag as allowed by N-Triples
static LANG_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(-[a-zA-Z0-9]+)*$").unwrap());

/// Parse a predicate value
pub fn as_uri(value: &str) -> Result<Node> {
    let token = value.trim();
    if token.starts_with('<') {
        parse_iri_ref(token).map(Node::Uri)
    } else {
        Err(Error::invalid_node("IRI", value, "expected <...>"))
    }
}

/// Parse a subject value
pub fn as_uri_or_blank_node(value: &str) -> Result<Node> {
    let token = value.trim();
    if token.starts_with('<') {
        parse_iri_ref(token).map(Node::Uri)
    } else if token.starts_with("_:") {
        parse_blank_node(token)
    } else {
        Err(Error::invalid_node(
            "subject",
            value,
            "expected an IRI or a blank node",
        ))
    }
}

/// Parse an object value
pub fn as_node(value: &str) -> Result<Node> {
    let token = value.trim();
    if token.starts_with('<') {
        parse_iri_ref(token).map(Node::Uri)
    } else if token.starts_with("_:") {
        parse_blank_node(token)
    } else if token.starts_with('"') {
        parse_literal(token).map(Node::Literal)
    } else {
        Err(Error::invalid_node(
            "object",
            value,
            "expected an IRI, a blank node or a literal",
        ))
    }
}

/// Parse `<iri>` into the unescaped IRI
fn parse_iri_ref(token: &str) -> Result<String> {
    let inner = token
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| Error::invalid_node("IRI", token, "missing closing '>'"))?;

    let iri = unescape(inner, false).map_err(|message| Error::invalid_node("IRI", token, message))?;

    if let Some(bad) = iri
        .chars()
        .find(|&c| c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'))
    {
        return Err(Error::invalid_node(
            "IRI",
            token,
            format!("illegal character {bad:?}"),
        ));
    }

    if !SCHEME_REGEX.is_match(&iri) {
        return Err(Error::invalid_node("IRI", token, "IRI is not absolute"));
    }

    Ok(iri)
}

/// Parse `_:label`
fn parse_blank_node(token: &str) -> Result<Node> {
    let label = &token[2..];
    if BLANK_LABEL_REGEX.is_match(label) {
        Ok(Node::Blank(label.to_string()))
    } else {
        Err(Error::invalid_node(
            "blank node",
            token,
            "invalid blank node label",
        ))
    }
}

/// Parse a quoted literal with optional language tag or datatype
fn parse_literal(token: &str) -> Result<Literal> {
    // Find the closing quote, skipping escaped characters
    let mut end_quote = None;
    let mut escaped = false;
    for (i, ch) in token.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            end_quote = Some(i);
            break;
        }
    }

    let end_quote = end_quote
        .ok_or_else(|| Error::invalid_node("literal", token, "unterminated string literal"))?;

    let lexical = unescape(&token[1..end_quote], true)
        .map_err(|message| Error::invalid_node("literal", token, message))?;
    let suffix = &token[end_quote + 1..];

    if suffix.is_empty() {
        Ok(Literal::simple(lexical))
    } else if let Some(language) = suffix.strip_prefix('@') {
        if LANG_TAG_REGEX.is_match(language) {
            Ok(Literal::lang_tagged(lexical, language))
        } else {
            Err(Error::invalid_node(
                "literal",
                token,
                format!("invalid language tag '{language}'"),
            ))
        }
    } else if let Some(datatype) = suffix.strip_prefix("^^") {
        let datatype = parse_iri_ref(datatype)?;
        Ok(Literal::typed(lexical, datatype))
    } else {
        Err(Error::invalid_node(
            "literal",
            token,
            format!("invalid literal suffix '{suffix}'"),
        ))
    }
}

/// Resolve escape sequences
///
/// IRIs only allow `\u` and `\U`; string literals also allow the
/// single-character escapes.
fn unescape(s: &str, allow_echar: bool) -> std::result::Result<String, String> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        let escape = chars
            .next()
            .ok_or_else(|| "dangling escape at end of input".to_string())?;
        let decoded = match escape {
            'u' => read_code_point(&mut chars, 4)?,
            'U' => read_code_point(&mut chars, 8)?,
            't' if allow_echar => '\t',
            'b' if allow_echar => '\u{8}',
            'n' if allow_echar => '\n',
            'r' if allow_echar => '\r',
            'f' if allow_echar => '\u{c}',
            '"' if allow_echar => '"',
            '\'' if allow_echar => '\'',
            '\\' if allow_echar => '\\',
            other => return Err(format!("invalid escape sequence '\\{other}'")),
        };
        result.push(decoded);
    }

    Ok(result)
}

fn read_code_point(
    chars: &mut std::str::Chars<'_>,
    digits: usize,
) -> std::result::Result<char, String> {
    let code: String = chars.by_ref().take(digits).collect();
    if code.chars().count() != digits {
        return Err(format!("truncated unicode escape '{code}'"));
    }
    let code_point =
        u32::from_str_radix(&code, 16).map_err(|_| format!("invalid unicode escape '{code}'"))?;
    char::from_u32(code_point).ok_or_else(|| format!("invalid code point U+{code_point:X}"))
}
