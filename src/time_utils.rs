// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Week calendar and shared date/time helpers.
//!
//! All weekly grouping in the app uses the same calendar: week N of a year
//! covers ordinal days (N-1)*7+1 through N*7, with January 1 as day 1.
//! This is not ISO 8601 — there is no Monday alignment and no cross-year
//! reconciliation, so the last week of a year may be short. Week/year keys
//! are computed once when an activity is stored and must never be derived
//! any other way on the read path.
//!
//! The whole process runs on UTC so that the stored keys cannot drift
//! between write time and read time.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Map a timestamp to its (week, year) key.
///
/// Week numbers start at 1; a year has up to 53 of them.
pub fn week_of(date: DateTime<Utc>) -> (u32, i32) {
    let week = (date.ordinal() + 6) / 7;
    (week, date.year())
}

/// The (week, year) key for the current instant.
pub fn current_week() -> (u32, i32) {
    week_of(Utc::now())
}

/// Midnight UTC on the first day of the given week.
///
/// Returns `None` only for week/year combinations outside chrono's
/// representable range.
pub fn start_of_week(week: u32, year: i32) -> Option<DateTime<Utc>> {
    let jan1 = NaiveDate::from_yo_opt(year, 1)?;
    let day = jan1.checked_add_signed(Duration::days(((week.max(1) - 1) * 7) as i64))?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Half-open [start, end) bounds of the calendar month containing `date`.
pub fn month_bounds(date: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    let end = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)?
    };
    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc(),
        end.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
///
/// Stored timestamps all use this fixed format, so lexicographic order
/// equals chronological order in range queries.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
