//! Temporal classification on top of [`PeriodInfo`].
//!
//! All functions are total: missing bounds classify as "no", never as an error.

use crate::period::PeriodInfo;
use crate::types::{Announcement, MonthlyCounts};
use chrono::{Datelike, NaiveDate};

/// Trailing window, in days, in which an opened announcement counts as new
pub const NEW_ANNOUNCEMENT_WINDOW_DAYS: i64 = 5;

/// Window, in days, before the closing date in which an announcement is urgent.
/// Kept separate from [`NEW_ANNOUNCEMENT_WINDOW_DAYS`] on purpose.
pub const URGENT_DEADLINE_WINDOW_DAYS: i64 = 7;

/// Minimum score for the high score count
pub const HIGH_SCORE_THRESHOLD: f64 = 80.0;

/// Open today: always active, or `start <= today <= end` with both bounds known
pub fn is_active(info: &PeriodInfo, today: NaiveDate) -> bool {
    if info.always_active {
        return true;
    }
    match (info.start_date, info.end_date) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => false,
    }
}

/// Opened between `window_days` days ago and today, inclusive
pub fn is_new(info: &PeriodInfo, today: NaiveDate, window_days: i64) -> bool {
    match info.start_date {
        Some(start) => {
            let age = (today - start).num_days();
            (0..=window_days).contains(&age)
        }
        None => false,
    }
}

/// Days from `today` until the end date, negative once closed
pub fn days_until_deadline(info: &PeriodInfo, today: NaiveDate) -> Option<i64> {
    info.end_date.map(|end| (end - today).num_days())
}

/// Closes between today and `window_days` days from now, inclusive
pub fn is_urgent(info: &PeriodInfo, today: NaiveDate, window_days: i64) -> bool {
    days_until_deadline(info, today).is_some_and(|left| (0..=window_days).contains(&left))
}

/// Calendar month (1-12) of the start date
pub fn month_of(info: &PeriodInfo) -> Option<u32> {
    info.start_date.map(|start| start.month())
}

/// Start date falls in `month` of `year`
pub fn starts_in(info: &PeriodInfo, year: i32, month: u32) -> bool {
    info.start_date
        .is_some_and(|start| start.year() == year && start.month() == month)
}

/// Count announcements per start month; unknown periods are skipped
pub fn aggregate_by_month<'a, I>(records: I) -> MonthlyCounts
where
    I: IntoIterator<Item = &'a Announcement>,
{
    let mut counts = MonthlyCounts::zeroed();
    for record in records {
        if let Some(month) = month_of(&record.period_info()) {
            counts.increment(month);
        }
    }
    counts
}
