use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::time_expr::{Grain, WeekStart};

/// Truncate `dt` to the first instant of its enclosing `grain`.
pub fn start_of(grain: Grain, dt: DateTime<Utc>, week_start: WeekStart) -> Option<DateTime<Utc>> {
    let naive = dt.naive_utc();
    let midnight = NaiveTime::from_hms_opt(0, 0, 0)?;
    let truncated = match grain {
        Grain::Second => naive.with_nanosecond(0)?,
        Grain::Minute => naive.date().and_time(NaiveTime::from_hms_opt(naive.hour(), naive.minute(), 0)?),
        Grain::Hour => naive.date().and_time(NaiveTime::from_hms_opt(naive.hour(), 0, 0)?),
        Grain::Day => naive.date().and_time(midnight),
        Grain::Week => {
            let weekday_offset = match week_start {
                WeekStart::Monday => naive.date().weekday().num_days_from_monday(),
                WeekStart::Sunday => naive.date().weekday().num_days_from_sunday(),
            };
            let start_date = naive.date().checked_sub_signed(Duration::days(weekday_offset as i64))?;
            start_date.and_time(midnight)
        }
        Grain::Month => NaiveDate::from_ymd_opt(naive.year(), naive.month(), 1)?.and_time(midnight),
        Grain::Year => NaiveDate::from_ymd_opt(naive.year(), 1, 1)?.and_time(midnight),
    };
    Some(truncated.and_utc())
}
