use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use crate::api::{Context, Options, normalize_with};
use crate::error::{Bound, Error, ErrorKind};
use crate::query::{QueryDefinition, ValidationPolicy};
use crate::range;
use crate::time::resolver::{self, format_canonical};

use super::{BlobKind, Normalizer};

fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 7, 16, 18, 0, 0).unwrap()
}

fn reference_context() -> Context {
    Context::fixed(reference_time())
}

fn run(definition: &QueryDefinition, policy: ValidationPolicy) -> Result<crate::NormalizedQuery, Error> {
    normalize_with(definition, policy, &reference_context(), &Options::default())
}

#[test]
fn structured_blob_with_embedded_bounds_in_execution_mode() {
    let blob = r#"{"START_TIME_RANGE":"2020-01-01T00:00:00Z","END_TIME_RANGE":"2020-01-02T00:00:00Z","QUERY_TEXT":"q{ source{A} return{B} }"}"#;
    let out = run(&QueryDefinition::from_blob(blob), ValidationPolicy::execution()).unwrap();

    assert_eq!(out.definition.start_time_range, "2020-01-01T00:00:00Z");
    assert_eq!(out.definition.end_time_range, "2020-01-02T00:00:00Z");
    assert_eq!(out.definition.query_text, "q{ source{A} return{B} }");
    assert!(out.definition.query_blob.is_empty());
}

#[test]
fn literal_blob_in_definition_mode_defaults_window() {
    let blob = "q{ source{CloudTrailRawEvents} return{INSERT_ID} }";
    let out = run(&QueryDefinition::from_blob(blob), ValidationPolicy::definition()).unwrap();

    assert_eq!(out.definition.query_text, blob);
    assert_eq!(out.definition.start_time_range, "");
    assert_eq!(out.definition.end_time_range, "");
    assert_eq!(out.window.start.timestamp(), 0);
    assert_eq!(out.window.end, reference_time());
}

#[test]
fn epoch_millis_bound_resolves() {
    let def = QueryDefinition::from_text("q{ source{A} }").with_start("0").with_end("1594927200000");
    let out = run(&def, ValidationPolicy::execution()).unwrap();
    assert_eq!(out.definition.end_time_range, "2020-07-16T18:00:00Z");
}

#[test]
fn unrecognized_blob_fails_before_anything_else() {
    let def = QueryDefinition::from_blob("not json and not a query block").with_start("garbage");
    let err = run(&def, ValidationPolicy::execution()).unwrap_err();
    assert_eq!(err, Error::BlobTranslate);
    assert_eq!(err.to_string(), "unable to translate query blob");
}

#[test]
fn unparseable_end_is_reported() {
    let def = QueryDefinition::from_text("q{ source{A} }").with_start("-1d").with_end("1594927200000ms");
    let err = run(&def, ValidationPolicy::definition()).unwrap_err();
    assert_eq!(err.to_string(), "unable to parse time (1594927200000ms)");
}

#[test]
fn out_of_range_bounds_report_the_input() {
    for (start, end) in [("-1d", "253402300800000"), ("-1d", "+8000y"), ("next 99999999 days", "now")] {
        let def = QueryDefinition::from_text("q{ source{A} }").with_start(start).with_end(end);
        let err = run(&def, ValidationPolicy::definition()).unwrap_err();
        let bad = if start == "-1d" { end } else { start };
        assert_eq!(err, Error::time_parse(bad), "bounds {start:?} {end:?}");
    }
}

#[test]
fn null_blob_is_empty_query() {
    let err = run(&QueryDefinition::from_blob("null"), ValidationPolicy::definition()).unwrap_err();
    assert_eq!(err, Error::EmptyQuery);
}

#[test]
fn empty_start_in_execution_mode() {
    let def = QueryDefinition::from_text("q{ source{A} }").with_end("now");
    let err = run(&def, ValidationPolicy::execution()).unwrap_err();
    assert_eq!(err, Error::EmptyTime { bound: Bound::Start });
}

#[test]
fn inverted_relative_window() {
    let def = QueryDefinition::from_text("q{ source{A} }").with_start("-1h").with_end("-2h");
    let err = run(&def, ValidationPolicy::definition()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeOrder);
}

#[test]
fn structured_blob_without_text_is_empty_query() {
    let blob = r#"{"START_TIME_RANGE":"-1d"}"#;
    let err = run(&QueryDefinition::from_blob(blob), ValidationPolicy::definition()).unwrap_err();
    assert_eq!(err, Error::EmptyQuery);
}

#[test]
fn range_errors_precede_empty_query() {
    let blob = r#"{"START_TIME_RANGE":"2020-01-02T00:00:00Z","END_TIME_RANGE":"2020-01-01T00:00:00Z"}"#;
    let err = run(&QueryDefinition::from_blob(blob), ValidationPolicy::definition()).unwrap_err();
    assert_eq!(err, Error::RangeOrder);
}

#[test]
fn input_definition_is_untouched() {
    let def = QueryDefinition::from_blob("q{ source{A} }").with_start("-1d@d").with_id("my_lql");
    let before = def.clone();
    let out = run(&def, ValidationPolicy::definition()).unwrap();

    assert_eq!(def, before);
    assert_eq!(out.definition.id, "my_lql");
    assert_eq!(out.definition.start_time_range, "2020-07-15T00:00:00Z");
}

#[test]
fn details_trace_each_stage() {
    let ctx = reference_context();
    let opts = Options::default();
    let def = QueryDefinition::from_blob(r#"{"QUERY_TEXT":"q{ source{A} }","END_TIME_RANGE":"1594927200000"}"#)
        .with_start("-1w@w");

    let (_, details) = Normalizer::new(&ctx, &opts).run_with_metrics(&def, ValidationPolicy::definition()).unwrap();

    assert_eq!(details.blob, BlobKind::Structured);
    assert_eq!(details.start.raw, "-1w@w");
    assert_eq!(details.start.source, crate::TimeSource::Relative);
    assert_eq!(details.end.source, crate::TimeSource::EpochMillis);
    assert!(!details.start.defaulted && !details.end.defaulted);
}

// Inputs built from digits and punctuation only, so the natural-language
// fallback never participates.
fn time_like() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,14}",
        "[+-]?[0-9]{1,3}(s|m|h|d|w|mon|y)?(@(s|m|h|d|w|mon|y))?",
        "(19|20)[0-9]{2}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(Z|[+-][0-9]{2}:[0-9]{2})",
        "[0-9:+TZ.-]{0,12}",
    ]
}

fn canonical_instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970..2100, whole seconds.
    (0i64..4_102_444_800).prop_map(|secs| DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
}

proptest! {
    #[test]
    fn resolution_is_canonical_or_parse_error(input in time_like()) {
        let opts = Options { natural_language: false };
        match resolver::resolve(&input, &reference_context(), &opts) {
            Ok(res) => {
                let canonical = res.canonical();
                if input.is_empty() {
                    prop_assert!(canonical.is_empty());
                } else {
                    prop_assert!(canonical.ends_with('Z'));
                    prop_assert!(!canonical.contains('.'));
                    let reparsed = resolver::parse_rfc3339(&canonical);
                    prop_assert!(reparsed.is_some_and(|dt| format_canonical(dt) == canonical));
                }
            }
            Err(err) => prop_assert_eq!(err, Error::TimeParse { input: input.clone() }),
        }
    }

    #[test]
    fn canonical_timestamps_are_fixed_points(instant in canonical_instant()) {
        let canonical = format_canonical(instant);
        let res = resolver::resolve(&canonical, &reference_context(), &Options::default()).unwrap();
        prop_assert_eq!(res.canonical(), canonical);
    }

    #[test]
    fn inverted_windows_always_fail(a in canonical_instant(), b in canonical_instant(), allow in any::<bool>()) {
        prop_assume!(a != b);
        let (start, end) = if a > b { (a, b) } else { (b, a) };
        let err = range::validate(
            &format_canonical(start),
            &format_canonical(end),
            ValidationPolicy::from(allow),
            &reference_context(),
        )
        .unwrap_err();
        prop_assert_eq!(err, Error::RangeOrder);
    }
}
