//! Translation and time-range validation for LQL query definitions.
//!
//! A caller hands over a [`QueryDefinition`] holding either query text or an
//! opaque blob, plus optional start/end time expressions. Normalization:
//!
//! - decides whether the blob is a JSON record or literal LQL text,
//! - resolves each time expression (relative, RFC 3339 or epoch millis) to a
//!   canonical `YYYY-MM-DDTHH:MM:SSZ` timestamp,
//! - applies the [`ValidationPolicy`] (definition-mode tolerates empty bounds,
//!   execution-mode does not) and checks the window ordering.
//!
//! Query semantics are never inspected; only shape and time bounds are.

#[macro_use]
mod macros;
mod api;
mod blob;
mod engine;
mod error;
mod query;
mod range;
mod time;

mod time_expr;

pub use api::{
    BlobKind, BoundDetails, Clock, Context, FixedClock, NormalizeDetails, NormalizeResultVerbose, Options,
    RunMetrics, SystemClock, normalize, normalize_verbose_with, normalize_with, prepare_create, prepare_run,
    resolve_time, resolve_time_with, validate_range, validate_range_with,
};
pub use blob::{BlobRecord, QueryBlob, looks_like_query};
pub use error::{BLOB_TRANSLATE_ERROR, Bound, Error, ErrorKind, Result};
pub use query::{Mode, NormalizedQuery, QueryDefinition, ValidationPolicy};
pub use range::TimeWindow;
pub use time::resolver::{Resolution, format_canonical};
pub use time_expr::{Grain, TimeExpr, TimeSource, WeekStart};
