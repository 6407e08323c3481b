// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and local-calendar bucketing.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, SecondsFormat, Utc, Weekday};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Convert an instant to the wall-clock time of the local timezone.
///
/// All calendar bucketing (day keys, nap windows, week/month ranges)
/// operates on local wall-clock time, not UTC.
pub fn to_local_naive(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&Local).naive_local()
}

/// Local calendar-day key, "YYYY-MM-DD".
pub fn local_date_key(instant: DateTime<Utc>) -> String {
    to_local_naive(instant).date().format("%Y-%m-%d").to_string()
}

/// First day of the local calendar week containing `date` (weeks start Monday).
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// True if two dates fall in the same local calendar month.
pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Whole minutes between two wall-clock times, floored, never negative.
pub fn whole_minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    ((to - from).num_milliseconds() / 60_000).max(0)
}
