//! Day-granular calendar helpers.
//!
//! All scheduling works on [`NaiveDate`], so there is no time-of-day or
//! daylight-saving component to normalize away. Shifting helpers return
//! `None` when the result leaves chrono's representable date range.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

/// Shift a date by a signed number of days.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(TimeDelta::try_days(days)?)
}

/// Whole days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Whether the date falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a date forward to the next business day.
///
/// Saturday advances two days and Sunday one day; weekdays are returned
/// unchanged.
pub fn next_business_day(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => add_days(date, 2),
        Weekday::Sun => add_days(date, 1),
        _ => Some(date),
    }
}

/// Inclusive end date of a task that starts on `start` and lasts
/// `duration_days` days.
pub fn inclusive_end(start: NaiveDate, duration_days: u32) -> Option<NaiveDate> {
    add_days(start, i64::from(duration_days) - 1)
}
