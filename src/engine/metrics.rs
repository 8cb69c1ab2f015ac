//! Normalizer run metrics.
//!
//! Timings are collected per stage so the CLI report can show where a run
//! spent its time. Collection is cheap (a handful of `Instant` reads) and
//! only surfaced through the verbose entry point.

use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct RunMetrics {
    /// Total elapsed time for [`Normalizer::run_with_metrics`](super::Normalizer::run_with_metrics).
    pub total: Duration,
    /// Blob disambiguation.
    pub translate: Duration,
    /// Resolving both time expressions.
    pub resolve: Duration,
    /// Range defaulting and ordering.
    pub range: Duration,
}
