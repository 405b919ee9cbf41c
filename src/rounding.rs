//! Quarter-hour rounding helpers.
//!
//! All simulated durations live on a 15-minute grid: drive times and
//! service times round up, distance-to-refill conversions round down.

/// Rounds a duration in hours up to the next 15-minute block.
///
/// Example: 1.02 → 1.25, 2.6 → 2.75.
pub fn round_up_quarter_hour(hours: f64) -> f64 {
    (hours * 4.0).ceil() / 4.0
}

/// Rounds a duration in hours down to the previous 15-minute block.
pub fn round_down_quarter_hour(hours: f64) -> f64 {
    (hours * 4.0).floor() / 4.0
}
