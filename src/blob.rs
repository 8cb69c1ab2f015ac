//! Query blob disambiguation.
//!
//! A blob is either a JSON record shaped like [`QueryDefinition`] or literal
//! LQL text. JSON is tried first; only when it fails to decode is the raw
//! text checked against the query-block signature.

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::query::QueryDefinition;

/// How the query text of a definition was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
    /// The caller supplied query text directly; the blob was not consulted.
    Provided,
    Structured,
    Literal,
}

impl BlobKind {
    pub fn name(self) -> &'static str {
        match self {
            BlobKind::Provided => "provided",
            BlobKind::Structured => "structured",
            BlobKind::Literal => "literal",
        }
    }
}

/// The record form of a blob. Field names match the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BlobRecord {
    #[serde(rename = "START_TIME_RANGE", default, deserialize_with = "null_as_empty")]
    pub start_time_range: String,
    #[serde(rename = "END_TIME_RANGE", default, deserialize_with = "null_as_empty")]
    pub end_time_range: String,
    #[serde(rename = "QUERY_TEXT", default, deserialize_with = "null_as_empty")]
    pub query_text: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryBlob {
    Structured(BlobRecord),
    Literal(String),
}

impl QueryBlob {
    pub fn parse(blob: &str) -> Result<QueryBlob> {
        // A bare `null` is an empty record.
        match serde_json::from_str::<Option<BlobRecord>>(blob) {
            Ok(record) => return Ok(QueryBlob::Structured(record.unwrap_or_default())),
            Err(err) => tracing::trace!(%err, "blob is not a structured record"),
        }

        if looks_like_query(blob) {
            return Ok(QueryBlob::Literal(blob.to_string()));
        }

        Err(Error::BlobTranslate)
    }

    pub fn kind(&self) -> BlobKind {
        match self {
            QueryBlob::Structured(_) => BlobKind::Structured,
            QueryBlob::Literal(_) => BlobKind::Literal,
        }
    }
}

/// Coarse LQL signature: an identifier, an optional parenthesized parameter
/// list, then an opening brace, at the start of any line. The parameter list
/// may be absent (`q{ ... }`) or empty (`q() { ... }`).
pub fn looks_like_query(text: &str) -> bool {
    regex!(r"(?m)^\s*\w+\s*(?:\([^)]*\))?\s*\{").is_match(text)
}

/// Establish the query text of `definition`, returning a new definition.
///
/// Bounds embedded in a structured blob only fill bounds the caller left
/// empty. On error nothing is returned, so no partial state leaks out.
pub fn translate(definition: &QueryDefinition) -> Result<(QueryDefinition, BlobKind)> {
    if !definition.query_text.is_empty() {
        return Ok((definition.clone(), BlobKind::Provided));
    }

    let blob = QueryBlob::parse(&definition.query_blob)?;
    let kind = blob.kind();
    let mut out = definition.clone();

    match blob {
        QueryBlob::Structured(record) => {
            if out.start_time_range.is_empty() {
                out.start_time_range = record.start_time_range;
            }
            if out.end_time_range.is_empty() {
                out.end_time_range = record.end_time_range;
            }
            out.query_text = record.query_text;
        }
        QueryBlob::Literal(text) => out.query_text = text,
    }

    tracing::debug!(kind = kind.name(), "query blob translated");
    Ok((out, kind))
}
