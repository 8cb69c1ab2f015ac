//! Time window validation.
//!
//! Bounds arrive as canonical RFC 3339 strings or empty. Empty bounds are
//! either defaulted (start to the Unix epoch, end to the context clock) or
//! rejected, depending on the policy. The ordering check runs after
//! defaulting, so a defaulted bound can still produce a `RangeOrder` error.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::Context;
use crate::error::{Bound, Error, Result};
use crate::query::ValidationPolicy;
use crate::time::resolver::parse_rfc3339;

/// A concrete, ordered time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A window plus which of its ends came from a policy default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedRange {
    pub window: TimeWindow,
    pub start_defaulted: bool,
    pub end_defaulted: bool,
}

pub fn validate(start: &str, end: &str, policy: ValidationPolicy, context: &Context) -> Result<CheckedRange> {
    let (start, start_defaulted) = bound_or_default(start, Bound::Start, policy, || DateTime::<Utc>::UNIX_EPOCH)?;
    let (end, end_defaulted) = bound_or_default(end, Bound::End, policy, || context.now())?;

    if start > end {
        tracing::debug!(%start, %end, "time window is inverted");
        return Err(Error::RangeOrder);
    }

    Ok(CheckedRange { window: TimeWindow { start, end }, start_defaulted, end_defaulted })
}

fn bound_or_default(
    value: &str,
    bound: Bound,
    policy: ValidationPolicy,
    default: impl FnOnce() -> DateTime<Utc>,
) -> Result<(DateTime<Utc>, bool)> {
    if !value.is_empty() {
        // A malformed non-empty bound fails regardless of policy.
        let parsed = parse_rfc3339(value).ok_or_else(|| Error::time_parse(value))?;
        return Ok((parsed, false));
    }

    if policy.allow_empty_bounds {
        let defaulted = default();
        tracing::debug!(%bound, value = %defaulted, "empty bound defaulted");
        Ok((defaulted, true))
    } else {
        Err(Error::EmptyTime { bound })
    }
}
