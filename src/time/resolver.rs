//! Time expression resolution.
//!
//! One textual bound goes in; either nothing (empty input) or a canonical UTC
//! instant comes out. Grammars are tried in a fixed order:
//!
//! ```text
//! ""              -> empty
//! relative        -> evaluated against Context::now()
//! RFC 3339        -> re-serialized in UTC
//! epoch millis    -> converted to UTC
//! otherwise       -> Error::TimeParse
//! ```

use chrono::{DateTime, Datelike, SecondsFormat, Timelike, Utc};

use crate::api::{Context, Options};
use crate::error::{Error, Result};
use crate::time::relative::resolve_relative;
use crate::time_expr::TimeSource;

/// A resolved (or intentionally empty) bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub value: Option<DateTime<Utc>>,
    pub source: TimeSource,
}

impl Resolution {
    fn empty() -> Self {
        Self { value: None, source: TimeSource::Empty }
    }

    fn resolved(value: DateTime<Utc>, source: TimeSource) -> Self {
        // Canonical form carries no fractional seconds.
        let value = value.with_nanosecond(0).unwrap_or(value);
        Self { value: Some(value), source }
    }

    /// Canonical wire form, or an empty string for an empty bound.
    pub fn canonical(&self) -> String {
        self.value.map(format_canonical).unwrap_or_default()
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_canonical(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an RFC 3339 timestamp (any offset) into UTC.
pub fn parse_rfc3339(input: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input).ok().map(|dt| dt.with_timezone(&Utc))
}

fn parse_epoch_millis(input: &str) -> Option<DateTime<Utc>> {
    let millis = input.parse::<i64>().ok()?;
    DateTime::from_timestamp_millis(millis)
}

/// Resolve one time expression.
pub fn resolve(input: &str, context: &Context, options: &Options) -> Result<Resolution> {
    if input.is_empty() {
        return Ok(Resolution::empty());
    }

    let resolution = if let Some(dt) = resolve_relative(input, context, options) {
        Resolution::resolved(dt, TimeSource::Relative)
    } else if let Some(dt) = parse_rfc3339(input) {
        Resolution::resolved(dt, TimeSource::Rfc3339)
    } else if let Some(dt) = parse_epoch_millis(input) {
        Resolution::resolved(dt, TimeSource::EpochMillis)
    } else {
        tracing::debug!(input, "no time grammar matched");
        return Err(Error::time_parse(input));
    };

    // Four-digit years only; anything else has no RFC 3339 form.
    if resolution.value.is_some_and(|dt| !(0..=9999).contains(&dt.year())) {
        tracing::debug!(input, "resolved instant outside years 0000-9999");
        return Err(Error::time_parse(input));
    }

    tracing::trace!(input, source = resolution.source.name(), value = %resolution.canonical(), "time resolved");
    Ok(resolution)
}
