use chrono::{DateTime, Utc};

use crate::time::helpers::boundaries::start_of;
use crate::time::helpers::shift::shift_datetime_by_grain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grain {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Grain {
    /// Compact unit used by offset/snap tokens (`-1d@d`, `+3mon`).
    pub fn from_token_unit(unit: &str) -> Option<Grain> {
        match unit {
            "s" => Some(Grain::Second),
            "m" => Some(Grain::Minute),
            "h" => Some(Grain::Hour),
            "d" => Some(Grain::Day),
            "w" => Some(Grain::Week),
            "mon" => Some(Grain::Month),
            "y" => Some(Grain::Year),
            _ => None,
        }
    }

    /// Spelled-out unit used by phrases (`last 3 days`, `2 hours ago`).
    pub fn from_word(word: &str) -> Option<Grain> {
        match word.to_ascii_lowercase().trim_end_matches('s') {
            "second" | "sec" => Some(Grain::Second),
            "minute" | "min" => Some(Grain::Minute),
            "hour" => Some(Grain::Hour),
            "day" => Some(Grain::Day),
            "week" => Some(Grain::Week),
            "month" => Some(Grain::Month),
            "year" => Some(Grain::Year),
            _ => None,
        }
    }
}

/// First day of the week used when snapping to [`Grain::Week`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Grammar that produced a resolved bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSource {
    /// Nothing to resolve; the bound stays empty.
    Empty,
    Relative,
    Rfc3339,
    EpochMillis,
}

impl TimeSource {
    pub fn name(self) -> &'static str {
        match self {
            TimeSource::Empty => "empty",
            TimeSource::Relative => "relative",
            TimeSource::Rfc3339 => "rfc3339",
            TimeSource::EpochMillis => "epoch-millis",
        }
    }
}

/// A relative time expression, evaluated lazily against a reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeExpr {
    /// The reference instant itself ("now").
    Reference,
    Shift {
        expr: Box<TimeExpr>,
        amount: i32,
        grain: Grain,
    },
    StartOf {
        expr: Box<TimeExpr>,
        grain: Grain,
    },
}

impl TimeExpr {
    pub fn shift(self, amount: i32, grain: Grain) -> TimeExpr {
        TimeExpr::Shift { expr: Box::new(self), amount, grain }
    }

    pub fn start_of(self, grain: Grain) -> TimeExpr {
        TimeExpr::StartOf { expr: Box::new(self), grain }
    }
}

/// Evaluate `expr` against `reference`.
///
/// Returns `None` when the result falls outside the representable range.
pub fn normalize(expr: &TimeExpr, reference: DateTime<Utc>, week_start: WeekStart) -> Option<DateTime<Utc>> {
    match expr {
        TimeExpr::Reference => Some(reference),
        TimeExpr::Shift { expr, amount, grain } => {
            let base = normalize(expr, reference, week_start)?;
            if *amount == 0 {
                return Some(base);
            }
            shift_datetime_by_grain(base, *amount, *grain)
        }
        TimeExpr::StartOf { expr, grain } => {
            let base = normalize(expr, reference, week_start)?;
            start_of(*grain, base, week_start)
        }
    }
}
