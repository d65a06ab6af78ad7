//! Accepted-field tables for the strict record parser.
//!
//! The ingestion corpus follows the Crossref works schema. The parser is
//! deliberately strict about schema drift: a document carrying a field this
//! module does not account for is rejected rather than silently accepted,
//! so that upstream format changes are noticed instead of absorbed.
//!
//! Structured fields whose inner shape the corpus relies on (contributor
//! lists, date objects, license and link entries) are checked one level
//! deeper; for the remaining known fields any value shape is accepted.

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::HashSet;

lazy_static! {
    /// Top-level fields accepted in a works record.
    static ref TOP_LEVEL_FIELDS: HashSet<&'static str> = [
        "DOI",
        "ISBN",
        "ISSN",
        "URL",
        "abstract",
        "accepted",
        "alternative-id",
        "approved",
        "archive",
        "article-number",
        "author",
        "chair",
        "container-title",
        "content-created",
        "content-domain",
        "created",
        "deposited",
        "edition-number",
        "editor",
        "funder",
        "group-title",
        "indexed",
        "is-referenced-by-count",
        "issn-type",
        "issue",
        "issued",
        "language",
        "license",
        "link",
        "member",
        "original-title",
        "page",
        "prefix",
        "published",
        "published-online",
        "published-print",
        "publisher",
        "publisher-location",
        "reference",
        "reference-count",
        "references-count",
        "relation",
        "score",
        "short-container-title",
        "short-title",
        "source",
        "subject",
        "subtitle",
        "title",
        "translator",
        "type",
        "update-policy",
        "volume",
    ]
    .iter()
    .copied()
    .collect();

    /// Keys accepted inside a contributor object (author, editor, ...).
    static ref CONTRIBUTOR_KEYS: HashSet<&'static str> = [
        "ORCID",
        "affiliation",
        "authenticated-orcid",
        "family",
        "given",
        "name",
        "sequence",
        "suffix",
    ]
    .iter()
    .copied()
    .collect();

    /// Keys accepted inside a partial-date object (issued, created, ...).
    static ref DATE_KEYS: HashSet<&'static str> =
        ["date-parts", "date-time", "timestamp"].iter().copied().collect();

    /// Keys accepted inside a license entry.
    static ref LICENSE_KEYS: HashSet<&'static str> =
        ["URL", "content-version", "delay-in-days", "start"].iter().copied().collect();

    /// Keys accepted inside a full-text link entry.
    static ref LINK_KEYS: HashSet<&'static str> =
        ["URL", "content-type", "content-version", "intended-application"]
            .iter()
            .copied()
            .collect();
}

/// Fields holding a contributor list.
const CONTRIBUTOR_FIELDS: [&str; 4] = ["author", "chair", "editor", "translator"];

/// Fields holding a partial-date object.
const DATE_FIELDS: [&str; 10] = [
    "accepted",
    "approved",
    "content-created",
    "created",
    "deposited",
    "indexed",
    "issued",
    "published",
    "published-online",
    "published-print",
];

/// Validate a parsed document against the accepted-field tables.
///
/// Returns `Err` with the path of the first offending field. The caller is
/// expected to reject the whole document; this check never mutates it.
///
/// # Errors
///
/// Returns the dotted path of the first unknown field encountered, e.g.
/// `"author[0].nickname"`.
pub fn validate(doc: &Value) -> std::result::Result<(), String> {
    let object = doc.as_object().ok_or_else(|| String::from("<root>"))?;

    for (key, value) in object {
        if !TOP_LEVEL_FIELDS.contains(key.as_str()) {
            return Err(key.clone());
        }
        if CONTRIBUTOR_FIELDS.contains(&key.as_str()) {
            check_entries(key, value, &CONTRIBUTOR_KEYS)?;
        } else if DATE_FIELDS.contains(&key.as_str()) {
            check_entries(key, value, &DATE_KEYS)?;
        } else if key == "license" {
            check_entries(key, value, &LICENSE_KEYS)?;
        } else if key == "link" {
            check_entries(key, value, &LINK_KEYS)?;
        }
    }

    Ok(())
}

/// Check every object found in `value` (directly, or as an array element)
/// against an accepted key set. Non-object shapes are left to the consumer.
fn check_entries(
    field: &str,
    value: &Value,
    accepted: &HashSet<&'static str>,
) -> std::result::Result<(), String> {
    match value {
        Value::Object(map) => {
            for key in map.keys() {
                if !accepted.contains(key.as_str()) {
                    return Err(format!("{field}.{key}"));
                }
            }
            Ok(())
        },
        Value::Array(entries) => {
            for (index, entry) in entries.iter().enumerate() {
                if let Value::Object(map) = entry {
                    for key in map.keys() {
                        if !accepted.contains(key.as_str()) {
                            return Err(format!("{field}[{index}].{key}"));
                        }
                    }
                }
            }
            Ok(())
        },
        _ => Ok(()),
    }
}
