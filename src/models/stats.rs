// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived statistics over activity lists.
//!
//! All of these are pure functions over a fetched activity list; the
//! lists are small (one household's diary), so nothing here is
//! pre-aggregated or cached.

use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{Activity, ActivityKind};
use crate::time_utils::{same_month, to_local_naive, week_start, whole_minutes_between};

/// Daytime nap window: naps count between 08:00 and 21:00 local time.
/// Sleep outside the window is overnight sleep, not a nap.
pub const NAP_WINDOW_START_HOUR: u32 = 8;
pub const NAP_WINDOW_END_HOUR: u32 = 21;

/// Count activities per kind.
pub fn counts_by_type(activities: &[Activity]) -> HashMap<ActivityKind, u32> {
    let mut counts = HashMap::new();
    for activity in activities {
        *counts.entry(activity.kind).or_insert(0) += 1;
    }
    counts
}

/// Total nap minutes inside the `[window_start_hour, window_end_hour)`
/// local-time window.
///
/// Sleeps are paired with the next later wake entry. A later sleep ends
/// the search for the earlier one (superseded, contributes nothing). A
/// sleep with no wake at all is still ongoing and accrues up to the
/// lesser of `now` and the window end. Wakes past the window end are
/// clipped to it. Minutes are floored from millisecond deltas.
pub fn nap_minutes(
    activities: &[Activity],
    window_start_hour: u32,
    window_end_hour: u32,
    now: DateTime<Utc>,
) -> i64 {
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by_key(|a| a.start_time);

    let now_local = to_local_naive(now);
    let mut total = 0;

    for (i, activity) in sorted.iter().enumerate() {
        if activity.kind != ActivityKind::Sleep {
            continue;
        }

        let sleep_start = to_local_naive(activity.start_time);
        let hour = sleep_start.time().hour();
        if hour < window_start_hour || hour >= window_end_hour {
            continue;
        }
        let Some(window_end) = sleep_start.date().and_hms_opt(window_end_hour, 0, 0) else {
            continue;
        };

        // Scan forward for the matching wake; another sleep supersedes.
        let mut matched_wake = None;
        let mut superseded = false;
        for later in &sorted[i + 1..] {
            match later.kind {
                ActivityKind::Sleep => {
                    superseded = true;
                    break;
                }
                ActivityKind::Wake => {
                    matched_wake = Some(to_local_naive(later.start_time));
                    break;
                }
                _ => {}
            }
        }

        if let Some(wake) = matched_wake {
            total += whole_minutes_between(sleep_start, wake.min(window_end));
        } else if !superseded {
            // Nap still ongoing
            total += whole_minutes_between(sleep_start, now_local.min(window_end));
        }
    }

    total
}

/// Total minutes of completed walks. Ongoing walks contribute zero.
pub fn walk_minutes(activities: &[Activity]) -> i64 {
    activities
        .iter()
        .filter(|a| a.kind == ActivityKind::Walk)
        .filter_map(|a| a.end_time.map(|end| (a, end)))
        .map(|(a, end)| ((end - a.start_time).num_milliseconds() / 60_000).max(0))
        .sum()
}

/// Time-range selector for the stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Day,
    Week,
    Month,
}

/// True if the activity's start time falls within the local calendar
/// day/week/month containing `now`. Weeks start on Monday.
pub fn in_range(activity: &Activity, range: StatsRange, now: DateTime<Utc>) -> bool {
    let date = to_local_naive(activity.start_time).date();
    let today = to_local_naive(now).date();
    match range {
        StatsRange::Day => date == today,
        StatsRange::Week => week_start(date) == week_start(today),
        StatsRange::Month => same_month(date, today),
    }
}

/// Select the activities whose start time falls in `range` around `now`.
pub fn filter_by_range(
    activities: &[Activity],
    range: StatsRange,
    now: DateTime<Utc>,
) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| in_range(a, range, now))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn local_utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn activity(id: &str, kind: ActivityKind, start: DateTime<Utc>) -> Activity {
        Activity {
            id: id.to_string(),
            kind,
            start_time: start,
            end_time: None,
            notes: String::new(),
            created_at: start,
            parent_id: None,
        }
    }

    fn walk(id: &str, start: DateTime<Utc>, minutes: Option<i64>) -> Activity {
        let mut a = activity(id, ActivityKind::Walk, start);
        a.end_time = minutes.map(|m| start + chrono::Duration::minutes(m));
        a
    }

    #[test]
    fn test_nap_minutes_empty_list() {
        let now = local_utc(2026, 8, 30, 12, 0);
        assert_eq!(
            nap_minutes(&[], NAP_WINDOW_START_HOUR, NAP_WINDOW_END_HOUR, now),
            0
        );
    }

    #[test]
    fn test_nap_with_matching_wake() {
        let activities = vec![
            activity("s", ActivityKind::Sleep, local_utc(2026, 8, 30, 9, 0)),
            activity("w", ActivityKind::Wake, local_utc(2026, 8, 30, 9, 45)),
        ];
        let now = local_utc(2026, 8, 30, 12, 0);
        assert_eq!(nap_minutes(&activities, 8, 21, now), 45);
    }

    #[test]
    fn test_ongoing_nap_accrues_to_now() {
        let activities = vec![activity("s", ActivityKind::Sleep, local_utc(2026, 8, 30, 9, 0))];
        let now = local_utc(2026, 8, 30, 10, 30);
        assert_eq!(nap_minutes(&activities, 8, 21, now), 90);
    }

    #[test]
    fn test_wake_after_window_end_is_clipped() {
        let activities = vec![
            activity("s", ActivityKind::Sleep, local_utc(2026, 8, 30, 20, 50)),
            activity("w", ActivityKind::Wake, local_utc(2026, 8, 30, 21, 30)),
        ];
        let now = local_utc(2026, 8, 30, 22, 0);
        assert_eq!(nap_minutes(&activities, 8, 21, now), 10);
    }

    #[test]
    fn test_later_sleep_supersedes_unwoken_nap() {
        // First sleep never gets a wake before the second sleep starts,
        // so only the second sleep (woken at 15:00) counts.
        let activities = vec![
            activity("s1", ActivityKind::Sleep, local_utc(2026, 8, 30, 9, 0)),
            activity("s2", ActivityKind::Sleep, local_utc(2026, 8, 30, 14, 0)),
            activity("w", ActivityKind::Wake, local_utc(2026, 8, 30, 15, 0)),
        ];
        let now = local_utc(2026, 8, 30, 16, 0);
        assert_eq!(nap_minutes(&activities, 8, 21, now), 60);
    }

    #[test]
    fn test_sleep_outside_window_ignored() {
        let activities = vec![
            activity("s", ActivityKind::Sleep, local_utc(2026, 8, 30, 22, 0)),
            activity("w", ActivityKind::Wake, local_utc(2026, 8, 31, 6, 0)),
        ];
        let now = local_utc(2026, 8, 31, 12, 0);
        assert_eq!(nap_minutes(&activities, 8, 21, now), 0);
    }

    #[test]
    fn test_walk_minutes_sums_completed_only() {
        let activities = vec![
            walk("w1", local_utc(2026, 8, 30, 8, 0), Some(25)),
            walk("w2", local_utc(2026, 8, 30, 17, 0), Some(40)),
            walk("ongoing", local_utc(2026, 8, 30, 19, 0), None),
        ];
        assert_eq!(walk_minutes(&activities), 65);
    }

    #[test]
    fn test_counts_by_type() {
        let activities = vec![
            activity("a", ActivityKind::Meal, local_utc(2026, 8, 30, 8, 0)),
            activity("b", ActivityKind::Meal, local_utc(2026, 8, 30, 18, 0)),
            activity("c", ActivityKind::Wee, local_utc(2026, 8, 30, 9, 0)),
        ];
        let counts = counts_by_type(&activities);
        assert_eq!(counts.get(&ActivityKind::Meal), Some(&2));
        assert_eq!(counts.get(&ActivityKind::Wee), Some(&1));
        assert_eq!(counts.get(&ActivityKind::Walk), None);
    }

    #[test]
    fn test_range_filters() {
        let now = local_utc(2026, 8, 19, 12, 0); // a Wednesday
        let today = activity("t", ActivityKind::Meal, local_utc(2026, 8, 19, 8, 0));
        let this_week = activity("w", ActivityKind::Meal, local_utc(2026, 8, 17, 8, 0));
        let this_month = activity("m", ActivityKind::Meal, local_utc(2026, 8, 1, 8, 0));
        let last_month = activity("o", ActivityKind::Meal, local_utc(2026, 7, 31, 8, 0));

        assert!(in_range(&today, StatsRange::Day, now));
        assert!(!in_range(&this_week, StatsRange::Day, now));

        assert!(in_range(&this_week, StatsRange::Week, now));
        assert!(!in_range(&this_month, StatsRange::Week, now));

        assert!(in_range(&this_month, StatsRange::Month, now));
        assert!(!in_range(&last_month, StatsRange::Month, now));
    }
}
