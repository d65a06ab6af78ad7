//! Parsing one input line into a structured bibliographic document.
//!
//! This module provides [`LineParser`] for converting a single line of
//! line-delimited JSON into a [`serde_json::Value`], under a deliberately
//! strict-but-tolerant grammar:
//!
//! - **Strict**: fields the accepted schema does not account for cause the
//!   whole line to be rejected ([`ParseFailureKind::UnknownField`]) rather
//!   than being silently dropped. See [`crate::schema`].
//! - **Tolerant**: string literals delimited by single quotes are accepted
//!   as if double-quoted, a compatibility allowance for a legacy export
//!   format that emitted `{'title': 'X'}` style lines.
//!
//! The two behaviors are independent and both preserved exactly; the strict
//! schema check runs on the already-parsed document, the lenient lexing runs
//! before the JSON parser sees the line.
//!
//! # Examples
//!
//! ```
//! use bibjsonl::LineParser;
//!
//! let parser = LineParser::new();
//! let doc = parser.parse(r#"{'title': 'Flatland'}"#).unwrap();
//! assert_eq!(doc["title"], "Flatland");
//! ```

use crate::schema;
use memchr::memchr;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

/// Why a single line was rejected by the parser.
///
/// A `ParseFailure` is a per-line skip reason, not a fatal error: the stream
/// driver logs it and moves on to the next line. It carries the offending
/// line's content alongside the rejection reason, so a caller holding only
/// the failure can still report what was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} in line: {line}")]
pub struct ParseFailure {
    /// Why the line was rejected.
    pub kind: ParseFailureKind,
    /// The offending line, verbatim.
    pub line: String,
}

/// The rejection reason inside a [`ParseFailure`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailureKind {
    /// The line is not syntactically valid JSON under the accepted grammar.
    #[error("invalid JSON: {0}")]
    Syntax(String),

    /// The top level of the document is not a JSON object.
    #[error("document root is not an object")]
    NotAnObject,

    /// The document carries a field the schema does not account for.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Parser for one line of bibliographic JSON.
///
/// Stateless and cheap to construct: parsing a line never depends on state
/// from a prior line, so a single parser may be reused across an entire run
/// or rebuilt per call.
///
/// # Examples
///
/// ```
/// use bibjsonl::LineParser;
///
/// let parser = LineParser::new();
/// assert!(parser.parse(r#"{"title": ["X"]}"#).is_ok());
/// assert!(parser.parse("{not json}").is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct LineParser;

impl LineParser {
    /// Create a new line parser.
    #[must_use]
    pub fn new() -> Self {
        LineParser
    }

    /// Parse one line into a document.
    ///
    /// Empty and whitespace-only lines are malformed. The returned document
    /// is always a JSON object that passed the accepted-field check.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] carrying the offending line and why it was
    /// rejected; the caller decides whether to log, count, or ignore it.
    pub fn parse(&self, line: &str) -> std::result::Result<Value, ParseFailure> {
        self.parse_trimmed(line.trim()).map_err(|kind| ParseFailure {
            kind,
            line: line.to_string(),
        })
    }

    fn parse_trimmed(&self, line: &str) -> std::result::Result<Value, ParseFailureKind> {
        if line.is_empty() {
            return Err(ParseFailureKind::Syntax("empty line".to_string()));
        }

        let canonical = rewrite_single_quotes(line);
        let doc: Value = serde_json::from_str(&canonical)
            .map_err(|e| ParseFailureKind::Syntax(e.to_string()))?;

        if !doc.is_object() {
            return Err(ParseFailureKind::NotAnObject);
        }
        schema::validate(&doc).map_err(ParseFailureKind::UnknownField)?;

        Ok(doc)
    }
}

/// Lexer state while rewriting quote characters.
#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Outside,
    InDouble,
    InSingle,
}

/// Rewrite single-quoted string literals into standard double-quoted JSON.
///
/// Lines without a single quote byte are returned borrowed; the common case
/// pays one `memchr` scan and no allocation. Inside a single-quoted literal,
/// `\'` unescapes to `'` and a bare `"` is escaped to `\"` so the rewritten
/// literal stays valid JSON. Double-quoted literals pass through untouched,
/// apostrophes included.
fn rewrite_single_quotes(line: &str) -> Cow<'_, str> {
    if memchr(b'\'', line.as_bytes()).is_none() {
        return Cow::Borrowed(line);
    }

    let mut out = String::with_capacity(line.len());
    let mut state = QuoteState::Outside;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Outside => match c {
                '"' => {
                    state = QuoteState::InDouble;
                    out.push('"');
                },
                '\'' => {
                    state = QuoteState::InSingle;
                    out.push('"');
                },
                _ => out.push(c),
            },
            QuoteState::InDouble => match c {
                '\\' => {
                    out.push('\\');
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                },
                '"' => {
                    state = QuoteState::Outside;
                    out.push('"');
                },
                _ => out.push(c),
            },
            QuoteState::InSingle => match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(escaped) => {
                        out.push('\\');
                        out.push(escaped);
                    },
                    None => out.push('\\'),
                },
                '\'' => {
                    state = QuoteState::Outside;
                    out.push('"');
                },
                '"' => out.push_str("\\\""),
                _ => out.push(c),
            },
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_standard_json() {
        let parser = LineParser::new();
        let doc = parser.parse(r#"{"title": ["A title"], "DOI": "10.1000/x"}"#).unwrap();
        assert_eq!(doc, json!({"title": ["A title"], "DOI": "10.1000/x"}));
    }

    #[test]
    fn test_parse_single_quoted_strings() {
        let parser = LineParser::new();
        let doc = parser.parse(r"{'title': 'A title', 'volume': '7'}").unwrap();
        assert_eq!(doc, json!({"title": "A title", "volume": "7"}));
    }

    #[test]
    fn test_single_quoted_equals_double_quoted() {
        let parser = LineParser::new();
        let single = parser.parse("{'title': 'X'}").unwrap();
        let double = parser.parse(r#"{"title": "X"}"#).unwrap();
        assert_eq!(single, double);
    }

    #[test]
    fn test_escaped_apostrophe_in_single_quoted_string() {
        let parser = LineParser::new();
        let doc = parser.parse(r"{'title': 'O\'Brien\'s papers'}").unwrap();
        assert_eq!(doc["title"], "O'Brien's papers");
    }

    #[test]
    fn test_double_quote_inside_single_quoted_string() {
        let parser = LineParser::new();
        let doc = parser.parse(r#"{'title': 'the "real" title'}"#).unwrap();
        assert_eq!(doc["title"], "the \"real\" title");
    }

    #[test]
    fn test_apostrophe_inside_double_quoted_string_untouched() {
        let parser = LineParser::new();
        let doc = parser.parse(r#"{"title": "O'Brien"}"#).unwrap();
        assert_eq!(doc["title"], "O'Brien");
    }

    #[test]
    fn test_malformed_json_rejected() {
        let parser = LineParser::new();
        assert!(matches!(
            parser.parse("{not json}").unwrap_err().kind,
            ParseFailureKind::Syntax(_)
        ));
    }

    #[test]
    fn test_failure_carries_offending_line() {
        let parser = LineParser::new();
        let failure = parser.parse("{not json}").unwrap_err();
        assert_eq!(failure.line, "{not json}");
        assert!(failure.to_string().contains("{not json}"));
    }

    #[test]
    fn test_empty_and_whitespace_lines_rejected() {
        let parser = LineParser::new();
        assert!(matches!(
            parser.parse("").unwrap_err().kind,
            ParseFailureKind::Syntax(_)
        ));
        assert!(matches!(
            parser.parse("   \t").unwrap_err().kind,
            ParseFailureKind::Syntax(_)
        ));
    }

    #[test]
    fn test_non_object_root_rejected() {
        let parser = LineParser::new();
        assert_eq!(
            parser.parse("[1, 2, 3]").unwrap_err(),
            ParseFailure {
                kind: ParseFailureKind::NotAnObject,
                line: "[1, 2, 3]".to_string(),
            }
        );
        assert_eq!(
            parser.parse("42").unwrap_err().kind,
            ParseFailureKind::NotAnObject
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parser = LineParser::new();
        assert_eq!(
            parser.parse(r#"{"title": ["A"], "surprise": true}"#).unwrap_err().kind,
            ParseFailureKind::UnknownField("surprise".to_string())
        );
    }

    #[test]
    fn test_unknown_nested_field_rejected() {
        let parser = LineParser::new();
        assert_eq!(
            parser
                .parse(r#"{"author": [{"family": "Abbott", "middle": "E"}]}"#)
                .unwrap_err()
                .kind,
            ParseFailureKind::UnknownField("author[0].middle".to_string())
        );
    }

    #[test]
    fn test_rewrite_borrows_without_single_quotes() {
        let line = r#"{"title": "plain"}"#;
        assert!(matches!(rewrite_single_quotes(line), Cow::Borrowed(_)));
    }

    #[test]
    fn test_field_order_preserved() {
        let parser = LineParser::new();
        let doc = parser.parse(r#"{"title": ["A"], "DOI": "10.1/x", "volume": "3"}"#).unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["title", "DOI", "volume"]);
    }
}
