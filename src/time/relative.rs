//! Relative time grammars.
//!
//! Three grammars are tried in order, first match wins:
//!
//! ```text
//! "now"                         keyword
//! "-24h", "-1d@d", "@w", "7d"   offset-and-snap tokens
//! "last 3 days", "2 hours ago"  phrases
//! ```
//!
//! The first two produce a [`TimeExpr`] that is evaluated against the
//! context clock. Anything still unmatched may be handed to `chrono-english`
//! when [`Options::natural_language`] is set.

use chrono::{DateTime, Utc};
use chrono_english::{Dialect, parse_date_string};

use crate::api::{Context, Options};
use crate::time_expr::{Grain, TimeExpr, normalize};

/// Parse `input` into a relative expression without evaluating it.
pub fn parse_relative_expr(input: &str) -> Option<TimeExpr> {
    if input.eq_ignore_ascii_case("now") {
        return Some(TimeExpr::Reference);
    }
    parse_offset_snap(input).or_else(|| parse_phrase(input))
}

/// Resolve `input` as a relative time against `context`.
pub fn resolve_relative(input: &str, context: &Context, options: &Options) -> Option<DateTime<Utc>> {
    let now = context.now();

    if let Some(expr) = parse_relative_expr(input) {
        tracing::trace!(input, ?expr, "relative expression parsed");
        return normalize(&expr, now, context.week_start);
    }

    if options.natural_language && input.starts_with(|c: char| c.is_ascii_alphabetic()) && small_counts(input) {
        match parse_date_string(input, now, Dialect::Us) {
            Ok(dt) => return Some(dt),
            Err(err) => tracing::trace!(input, %err, "natural language parse failed"),
        }
    }

    None
}

// chrono-english overflows (and panics) on large counts.
fn small_counts(input: &str) -> bool {
    !regex!(r"\d{5,}").is_match(input)
}

// "[+-]N<unit>" offset, then "@<unit>" snap; at least one must be present.
fn parse_offset_snap(input: &str) -> Option<TimeExpr> {
    let caps = regex!(r"^(?:([+-])?(\d+)(mon|[ywdhms]))?(?:@(mon|[ywdhms]))?$").captures(input)?;

    let mut expr = TimeExpr::Reference;
    let mut matched = false;

    if let (Some(amount), Some(unit)) = (caps.get(2), caps.get(3)) {
        let amount: i32 = amount.as_str().parse().ok()?;
        let grain = Grain::from_token_unit(unit.as_str())?;
        let amount = match caps.get(1).map(|m| m.as_str()) {
            Some("+") => amount,
            // An unsigned offset looks back.
            _ => -amount,
        };
        expr = expr.shift(amount, grain);
        matched = true;
    }

    if let Some(snap) = caps.get(4) {
        expr = expr.start_of(Grain::from_token_unit(snap.as_str())?);
        matched = true;
    }

    matched.then_some(expr)
}

fn parse_phrase(input: &str) -> Option<TimeExpr> {
    if input.eq_ignore_ascii_case("today") {
        return Some(TimeExpr::Reference.start_of(Grain::Day));
    }
    if input.eq_ignore_ascii_case("yesterday") {
        return Some(TimeExpr::Reference.shift(-1, Grain::Day).start_of(Grain::Day));
    }

    if let Some(caps) = regex!(r"(?i)^(?:last|past)\s+(?:(\d+)\s+)?([a-z]+)$").captures(input) {
        let amount = match caps.get(1) {
            Some(m) => m.as_str().parse::<i32>().ok()?,
            None => 1,
        };
        let grain = Grain::from_word(caps.get(2)?.as_str())?;
        return Some(TimeExpr::Reference.shift(-amount, grain));
    }

    if let Some(caps) = regex!(r"(?i)^(\d+)\s+([a-z]+)\s+ago$").captures(input) {
        let amount = caps.get(1)?.as_str().parse::<i32>().ok()?;
        let grain = Grain::from_word(caps.get(2)?.as_str())?;
        return Some(TimeExpr::Reference.shift(-amount, grain));
    }

    if let Some(caps) = regex!(r"(?i)^in\s+(\d+)\s+([a-z]+)$").captures(input) {
        let amount = caps.get(1)?.as_str().parse::<i32>().ok()?;
        let grain = Grain::from_word(caps.get(2)?.as_str())?;
        return Some(TimeExpr::Reference.shift(amount, grain));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_context() -> Context {
        // Thursday.
        Context::fixed(Utc.with_ymd_and_hms(2020, 7, 16, 18, 30, 15).unwrap())
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn relative_examples_matching() {
        let ctx = reference_context();
        let opts = Options { natural_language: false };

        let cases: Vec<(DateTime<Utc>, &str)> = vec![
            (at(2020, 7, 16, 18, 30, 15), "now"),
            (at(2020, 7, 16, 18, 30, 15), "NOW"),
            (at(2020, 7, 15, 18, 30, 15), "-24h"),
            (at(2020, 7, 15, 18, 30, 15), "24h"),
            (at(2020, 7, 17, 18, 30, 15), "+1d"),
            (at(2020, 7, 15, 0, 0, 0), "-1d@d"),
            (at(2020, 7, 16, 0, 0, 0), "@d"),
            (at(2020, 7, 13, 0, 0, 0), "@w"),
            (at(2020, 7, 1, 0, 0, 0), "@mon"),
            (at(2020, 1, 1, 0, 0, 0), "@y"),
            (at(2020, 6, 16, 18, 30, 15), "-1mon"),
            (at(2019, 7, 16, 18, 30, 15), "-1y"),
            (at(2020, 7, 16, 18, 0, 0), "@h"),
            (at(2020, 7, 16, 18, 25, 15), "-5m"),
            (at(2020, 7, 16, 18, 30, 0), "-15s"),
            (at(2020, 7, 16, 0, 0, 0), "today"),
            (at(2020, 7, 15, 0, 0, 0), "yesterday"),
            (at(2020, 7, 13, 18, 30, 15), "last 3 days"),
            (at(2020, 7, 16, 17, 30, 15), "last hour"),
            (at(2020, 7, 9, 18, 30, 15), "past 1 week"),
            (at(2020, 7, 16, 16, 30, 15), "2 hours ago"),
            (at(2020, 7, 16, 18, 40, 15), "in 10 minutes"),
        ];

        for (expected, input) in cases {
            let got = resolve_relative(input, &ctx, &opts);
            assert_eq!(got, Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn non_relative_inputs_are_rejected() {
        let ctx = reference_context();
        let opts = Options { natural_language: false };

        for input in [
            "",
            "1594927200000",
            "-24",
            "2020-01-01T00:00:00Z",
            "@",
            "-1q",
            "last fortnight",
            "3 parsecs ago",
            "not a time",
        ] {
            assert_eq!(resolve_relative(input, &ctx, &opts), None, "input {input:?}");
        }
    }

    #[test]
    fn week_snap_follows_context() {
        let ctx = reference_context().with_week_start(crate::time_expr::WeekStart::Sunday);
        let got = resolve_relative("@w", &ctx, &Options::default());
        assert_eq!(got, Some(at(2020, 7, 12, 0, 0, 0)));
    }

    #[test]
    fn natural_language_fallback_is_optional() {
        let ctx = reference_context();

        let english = resolve_relative("last friday", &ctx, &Options::default());
        assert!(english.is_some_and(|dt| dt < ctx.now()));

        assert_eq!(resolve_relative("last friday", &ctx, &Options { natural_language: false }), None);
    }

    #[test]
    fn natural_language_large_counts_are_rejected() {
        let ctx = reference_context();
        for input in ["next 99999999 days", "next 4000000000 years", "in 12345 weeks time"] {
            assert_eq!(resolve_relative(input, &ctx, &Options::default()), None, "input {input:?}");
        }
    }

    #[test]
    fn parse_only_does_not_need_a_clock() {
        assert_eq!(parse_relative_expr("now"), Some(TimeExpr::Reference));
        assert_eq!(
            parse_relative_expr("-1d@d"),
            Some(TimeExpr::Reference.shift(-1, Grain::Day).start_of(Grain::Day))
        );
        assert_eq!(parse_relative_expr("1594927200000"), None);
    }
}
