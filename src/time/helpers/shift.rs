use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::time_expr::Grain;

/// Move `dt` by `amount` units of `grain`. `None` on overflow.
pub fn shift_datetime_by_grain(dt: DateTime<Utc>, amount: i32, grain: Grain) -> Option<DateTime<Utc>> {
    let delta = match grain {
        Grain::Second => Duration::try_seconds(amount as i64)?,
        Grain::Minute => Duration::try_minutes(amount as i64)?,
        Grain::Hour => Duration::try_hours(amount as i64)?,
        Grain::Day => Duration::try_days(amount as i64)?,
        Grain::Week => Duration::try_weeks(amount as i64)?,
        Grain::Month => return add_months(dt.naive_utc(), amount).map(|n| n.and_utc()),
        Grain::Year => return add_months(dt.naive_utc(), amount.checked_mul(12)?).map(|n| n.and_utc()),
    };
    dt.checked_add_signed(delta)
}

fn add_months(dt: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let base_year = dt.date().year();
    let base_month = dt.date().month() as i32;
    let zero_based = (base_month - 1).checked_add(months)?;
    let year = base_year.checked_add(zero_based.div_euclid(12))?;
    let month = (zero_based.rem_euclid(12) + 1) as u32;
    let day = dt.date().day().min(days_in_month(year, month)?);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(NaiveDateTime::new(date, dt.time()))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year.checked_add(1)?, 1) } else { (year, month + 1) };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_next.pred_opt()?.day())
}
