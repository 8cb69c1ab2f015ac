use crate::engine;
use crate::error::Result;
use crate::query::{Mode, NormalizedQuery, QueryDefinition, ValidationPolicy};
use crate::range::{self, TimeWindow};
use crate::time::resolver::{self, Resolution};
use crate::time_expr::WeekStart;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

pub use crate::engine::metrics::RunMetrics;
pub use crate::engine::{BlobKind, BoundDetails, NormalizeDetails};

/// Source of the current instant.
///
/// Relative expressions and open end bounds are evaluated against this, so
/// tests can pin "now" with [`FixedClock`].
pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Normalization context.
///
/// This holds the environment needed to evaluate relative expressions
/// (like "-1d@d") and to default an open end bound.
#[derive(Debug, Clone)]
pub struct Context {
    pub clock: Arc<dyn Clock>,
    /// First day of the week for `@w` snapping.
    pub week_start: WeekStart,
}

impl Context {
    /// A context whose clock always reports `reference`.
    pub fn fixed(reference: DateTime<Utc>) -> Self {
        Self { clock: Arc::new(FixedClock(reference)), week_start: WeekStart::default() }
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self { clock: Arc::new(SystemClock), week_start: WeekStart::default() }
    }
}

/// Options that affect resolution behavior.
#[derive(Debug, Clone)]
pub struct Options {
    /// Fall back to English phrases ("last friday") when the compact
    /// relative grammars do not match.
    pub natural_language: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { natural_language: true }
    }
}

/// Result from [`normalize_verbose_with`].
#[derive(Debug, Clone)]
pub struct NormalizeResultVerbose {
    pub query: NormalizedQuery,
    pub details: NormalizeDetails,
}

/// Normalize `definition` against the wall clock.
///
/// # Example
/// ```
/// use lqlnorm::{QueryDefinition, ValidationPolicy, normalize};
///
/// let def = QueryDefinition::from_blob("q{ source{CloudTrailRawEvents} return{INSERT_ID} }");
/// let out = normalize(&def, ValidationPolicy::definition()).unwrap();
/// assert_eq!(out.definition.query_text, "q{ source{CloudTrailRawEvents} return{INSERT_ID} }");
/// ```
pub fn normalize(definition: &QueryDefinition, policy: ValidationPolicy) -> Result<NormalizedQuery> {
    normalize_with(definition, policy, &Context::default(), &Options::default())
}

/// Normalize `definition` with an explicit `context`/`options`.
///
/// Use this for deterministic results by supplying a fixed clock.
pub fn normalize_with(
    definition: &QueryDefinition,
    policy: ValidationPolicy,
    context: &Context,
    options: &Options,
) -> Result<NormalizedQuery> {
    engine::Normalizer::new(context, options).run(definition, policy)
}

/// Normalize and also report which path each stage took.
pub fn normalize_verbose_with(
    definition: &QueryDefinition,
    policy: ValidationPolicy,
    context: &Context,
    options: &Options,
) -> Result<NormalizeResultVerbose> {
    let (query, details) = engine::Normalizer::new(context, options).run_with_metrics(definition, policy)?;
    Ok(NormalizeResultVerbose { query, details })
}

/// Validate a query blob for persisting as a definition (bounds optional).
pub fn prepare_create(blob: &str) -> Result<NormalizedQuery> {
    normalize(&QueryDefinition::from_blob(blob), Mode::Definition.policy())
}

/// Validate a query blob for execution over `[start, end]` (bounds mandatory,
/// unless the blob embeds them).
pub fn prepare_run(blob: &str, start: &str, end: &str) -> Result<NormalizedQuery> {
    let definition = QueryDefinition::from_blob(blob).with_start(start).with_end(end);
    normalize(&definition, Mode::Execution.policy())
}

/// Resolve one time expression against the wall clock.
pub fn resolve_time(expr: &str) -> Result<Resolution> {
    resolve_time_with(expr, &Context::default(), &Options::default())
}

pub fn resolve_time_with(expr: &str, context: &Context, options: &Options) -> Result<Resolution> {
    resolver::resolve(expr, context, options)
}

/// Check two canonical (or empty) bounds against `policy`.
pub fn validate_range(start: &str, end: &str, policy: ValidationPolicy) -> Result<TimeWindow> {
    validate_range_with(start, end, policy, &Context::default())
}

pub fn validate_range_with(start: &str, end: &str, policy: ValidationPolicy, context: &Context) -> Result<TimeWindow> {
    range::validate(start, end, policy, context).map(|checked| checked.window)
}
