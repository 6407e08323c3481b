// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timeline grouping: bucket top-level activities by local calendar day
//! and look up children nested under a parent activity.

use crate::models::Activity;
use crate::time_utils::local_date_key;

/// One calendar day of top-level activities.
///
/// Child activities (those with a `parent_id`) never appear here; they
/// are attached via [`children_of`].
#[derive(Debug, Clone)]
pub struct DayGroup {
    /// Local calendar day, "YYYY-MM-DD"
    pub date: String,
    /// Top-level activities for the day, in the order received
    pub activities: Vec<Activity>,
}

/// Local calendar-day key for an activity, derived from its start time.
///
/// Used both for timeline grouping and calendar-presence marking.
pub fn date_key(activity: &Activity) -> String {
    local_date_key(activity.start_time)
}

/// Group top-level activities by calendar day.
///
/// The input arrives ordered by start time descending (the store's query
/// order); day groups and the activities within them inherit that order.
pub fn group_by_day(activities: &[Activity]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for activity in activities {
        if activity.parent_id.is_some() {
            continue;
        }
        let key = date_key(activity);
        match groups.last_mut() {
            Some(group) if group.date == key => group.activities.push(activity.clone()),
            _ => groups.push(DayGroup {
                date: key,
                activities: vec![activity.clone()],
            }),
        }
    }

    groups
}

/// All activities nested under `parent_id`, ordered by start time ascending.
pub fn children_of(parent_id: &str, activities: &[Activity]) -> Vec<Activity> {
    let mut children: Vec<Activity> = activities
        .iter()
        .filter(|a| a.parent_id.as_deref() == Some(parent_id))
        .cloned()
        .collect();
    children.sort_by_key(|a| a.start_time);
    children
}
