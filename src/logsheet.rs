//! Day slicing: partitions the flat timeline into calendar-day log sheets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::simulator::{Activity, Remark, Timeline};

const DAY_HOURS: f64 = 24.0;

/// One calendar day's record of activities and remarks, the output
/// artifact analogous to a driver's daily log. Times are rebased to the
/// day-local 0–24 range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogSheet {
    pub activities: Vec<Activity>,
    pub remarks: Vec<Remark>,
    /// Hours per duty status, keyed by display name, rounded to 2 decimals.
    pub total_hours_by_status: BTreeMap<String, f64>,
    pub total_hours: f64,
}

/// Slices the timeline into one sheet per populated day, in day order.
///
/// Each activity is clipped to the day window and rebased; an interval
/// spanning midnight appears, split, on both sheets. Slicing stops at the
/// first day no activity overlaps.
pub fn slice_log_sheets(timeline: &Timeline) -> Vec<LogSheet> {
    let mut sheets = Vec::new();

    for day in 0.. {
        let window_start = day as f64 * DAY_HOURS;
        let window_end = window_start + DAY_HOURS;

        let activities: Vec<Activity> = timeline
            .activities
            .iter()
            .filter(|a| a.start < window_end && a.end > window_start)
            .map(|a| Activity {
                start: a.start.max(window_start) - window_start,
                end: a.end.min(window_end) - window_start,
                status: a.status,
            })
            .collect();
        if activities.is_empty() {
            break;
        }

        let remarks: Vec<Remark> = timeline
            .remarks
            .iter()
            .filter(|r| r.start < window_end && r.end > window_start)
            .map(|r| Remark {
                start: r.start.max(window_start) - window_start,
                end: r.end.min(window_end) - window_start,
                location: r.location.clone(),
                information: r.information.clone(),
                coords: r.coords,
            })
            .collect();

        let mut minutes_by_status: BTreeMap<&'static str, f64> = BTreeMap::new();
        for activity in &activities {
            *minutes_by_status.entry(activity.status.as_str()).or_default() +=
                (activity.end - activity.start) * 60.0;
        }
        let total_hours_by_status: BTreeMap<String, f64> = minutes_by_status
            .into_iter()
            .map(|(status, minutes)| (status.to_string(), round2(minutes / 60.0)))
            .collect();
        let total_hours = round2(total_hours_by_status.values().sum());

        sheets.push(LogSheet {
            activities,
            remarks,
            total_hours_by_status,
            total_hours,
        });
    }

    sheets
}

fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
