use serde::{Deserialize, Serialize};

use crate::range::TimeWindow;

/// A query definition as exchanged with the remote API.
///
/// Callers populate at most one of `query_text`/`query_blob`, plus optional
/// raw time expressions. After normalization `query_text` is non-empty and
/// both ranges are canonical UTC timestamps (or empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinition {
    #[serde(rename = "LQL_ID", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(rename = "START_TIME_RANGE", default, skip_serializing_if = "String::is_empty")]
    pub start_time_range: String,
    #[serde(rename = "END_TIME_RANGE", default, skip_serializing_if = "String::is_empty")]
    pub end_time_range: String,
    #[serde(rename = "QUERY_TEXT", default)]
    pub query_text: String,
    /// Raw caller input: either a JSON record or literal query text.
    /// Consumed by normalization, never sent over the wire.
    #[serde(skip)]
    pub query_blob: String,
}

impl QueryDefinition {
    pub fn from_blob(blob: impl Into<String>) -> Self {
        Self { query_blob: blob.into(), ..Self::default() }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { query_text: text.into(), ..Self::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_start(mut self, expr: impl Into<String>) -> Self {
        self.start_time_range = expr.into();
        self
    }

    pub fn with_end(mut self, expr: impl Into<String>) -> Self {
        self.end_time_range = expr.into();
        self
    }
}

/// Whether empty time bounds are tolerated (and defaulted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub allow_empty_bounds: bool,
}

impl ValidationPolicy {
    /// Persisting a definition: bounds optional.
    pub const fn definition() -> Self {
        Self { allow_empty_bounds: true }
    }

    /// Running a query: both bounds required.
    pub const fn execution() -> Self {
        Self { allow_empty_bounds: false }
    }
}

impl From<bool> for ValidationPolicy {
    fn from(allow_empty_bounds: bool) -> Self {
        Self { allow_empty_bounds }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Definition,
    Execution,
}

impl Mode {
    pub const fn policy(self) -> ValidationPolicy {
        match self {
            Mode::Definition => ValidationPolicy::definition(),
            Mode::Execution => ValidationPolicy::execution(),
        }
    }
}

/// Output of a successful normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Definition with canonical bounds and an empty `query_blob`.
    pub definition: QueryDefinition,
    /// The concrete window the bounds (or their defaults) describe.
    pub window: TimeWindow,
}
