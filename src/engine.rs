//! Translate-then-validate pipeline.
//!
//! ```text
//! QueryDefinition
//!   │
//!   ├─(1) blob::translate        -> query text (+ embedded bounds)
//!   ├─(2) resolver::resolve ×2   -> canonical start / end
//!   ├─(3) range::validate        -> policy defaults + ordering
//!   └─(4) query text non-empty   -> NormalizedQuery
//! ```
//!
//! Each stage short-circuits on error. The input definition is never
//! modified; a successful run returns a new value.

pub mod metrics;

#[cfg(test)]
mod tests;

use std::time::Instant;

use crate::api::{Context, Options};
use crate::blob;
use crate::error::{Error, Result};
use crate::query::{NormalizedQuery, QueryDefinition, ValidationPolicy};
use crate::range;
use crate::time::resolver;
use crate::time_expr::TimeSource;

pub use crate::blob::BlobKind;
use metrics::RunMetrics;

/// How one bound was established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDetails {
    /// Expression after blob translation, before resolution.
    pub raw: String,
    pub source: TimeSource,
    /// The bound was empty and filled in by the policy default.
    pub defaulted: bool,
}

/// Per-stage trace of a successful run.
#[derive(Debug, Clone)]
pub struct NormalizeDetails {
    pub blob: BlobKind,
    pub policy: ValidationPolicy,
    pub start: BoundDetails,
    pub end: BoundDetails,
    pub metrics: RunMetrics,
}

pub(crate) struct Normalizer<'a> {
    context: &'a Context,
    options: &'a Options,
}

impl<'a> Normalizer<'a> {
    pub fn new(context: &'a Context, options: &'a Options) -> Self {
        Self { context, options }
    }

    pub fn run(&self, definition: &QueryDefinition, policy: ValidationPolicy) -> Result<NormalizedQuery> {
        self.run_with_metrics(definition, policy).map(|(query, _)| query)
    }

    pub fn run_with_metrics(
        &self,
        definition: &QueryDefinition,
        policy: ValidationPolicy,
    ) -> Result<(NormalizedQuery, NormalizeDetails)> {
        let _span = tracing::debug_span!("normalize", allow_empty_bounds = policy.allow_empty_bounds).entered();
        let mut metrics = RunMetrics::default();
        let run_start = Instant::now();

        let stage = Instant::now();
        let (mut out, blob) = blob::translate(definition)?;
        metrics.translate = stage.elapsed();

        let stage = Instant::now();
        let raw_start = out.start_time_range.clone();
        let raw_end = out.end_time_range.clone();
        let start = resolver::resolve(&raw_start, self.context, self.options)?;
        let end = resolver::resolve(&raw_end, self.context, self.options)?;
        out.start_time_range = start.canonical();
        out.end_time_range = end.canonical();
        metrics.resolve = stage.elapsed();

        let stage = Instant::now();
        let checked = range::validate(&out.start_time_range, &out.end_time_range, policy, self.context)?;
        metrics.range = stage.elapsed();

        if out.query_text.is_empty() {
            return Err(Error::EmptyQuery);
        }
        out.query_blob.clear();

        metrics.total = run_start.elapsed();
        tracing::debug!(
            blob = blob.name(),
            start = %out.start_time_range,
            end = %out.end_time_range,
            "query normalized"
        );

        let details = NormalizeDetails {
            blob,
            policy,
            start: BoundDetails { raw: raw_start, source: start.source, defaulted: checked.start_defaulted },
            end: BoundDetails { raw: raw_end, source: end.source, defaulted: checked.end_defaulted },
            metrics,
        };

        Ok((NormalizedQuery { definition: out, window: checked.window }, details))
    }
}
