//! Per-segment trip facts and simulation-tracking state.
//!
//! A [`Leg`] is immutable once built; the mutable counters the simulator
//! threads through a run live in [`LegProgress`], so leg construction and
//! simulation can be tested in isolation.

use crate::polyline::Polyline;
use crate::rounding::round_down_quarter_hour;

/// Maximum driving time within one duty day.
pub const MAX_DAILY_DRIVING_HOURS: f64 = 11.0;

/// The on-duty window in which all driving and work must fit each day.
pub const MAX_DUTY_WINDOW_HOURS: f64 = 14.0;

/// Distance between mandatory fuel stops (1000 mi).
pub const REFILL_INTERVAL_KM: f64 = 1609.34;

/// What happens at the end of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPurpose {
    Pickup,
    Dropoff,
}

impl StopPurpose {
    pub fn label(self) -> &'static str {
        match self {
            StopPurpose::Pickup => "Pickup",
            StopPurpose::Dropoff => "Dropoff",
        }
    }
}

/// One directed trip segment with its route facts.
#[derive(Debug, Clone)]
pub struct Leg {
    pub name: String,
    /// Total drive time in hours, already rounded up to 0.25h.
    pub drive_hours: f64,
    /// Total road distance in kilometers.
    pub distance_km: f64,
    /// On-duty service time at the destination (loading or unloading).
    pub duty_hours: f64,
    /// Destination display name, used directly on load/unload remarks.
    pub destination: String,
    pub purpose: StopPurpose,
    pub route: Polyline,
}

impl Leg {
    /// Assumed constant speed over the leg, in km per drive hour.
    fn km_per_hour(&self) -> f64 {
        if self.drive_hours <= 0.0 {
            0.0
        } else {
            self.distance_km / self.drive_hours
        }
    }

    /// Largest drive increment legal right now: capped by the daily drive
    /// limit, the remaining duty window, and what is left of this leg.
    pub fn allowed_drive(
        &self,
        progress: &LegProgress,
        driving_today: f64,
        duty_today: f64,
    ) -> f64 {
        (MAX_DAILY_DRIVING_HOURS - driving_today)
            .min(MAX_DUTY_WINDOW_HOURS - duty_today)
            .min(progress.remain_drive)
    }

    /// Drive time, rounded down to 0.25h, until the refill threshold is
    /// reached, given kilometers already driven since the last refill.
    ///
    /// A leg that covers no distance yields zero: no kilometers accrue, so
    /// no conversion from distance to time exists.
    pub fn drive_hours_to_refill(&self, km_since_refill: f64) -> f64 {
        if self.distance_km <= 0.0 {
            return 0.0;
        }
        let remaining_km = (REFILL_INTERVAL_KM - km_since_refill).max(0.0);
        round_down_quarter_hour(remaining_km * self.drive_hours / self.distance_km)
    }
}

/// Mutable per-leg tracking state, reset at the start of each leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegProgress {
    /// Drive time still to be consumed on this leg. Never negative.
    pub remain_drive: f64,
    /// Distance covered within this leg since its start.
    pub km_covered: f64,
}

impl LegProgress {
    /// Fresh tracking state for one leg: full remaining drive time, zero
    /// covered distance. The since-refill counter is carried on the
    /// simulator because it crosses leg boundaries.
    pub fn start(leg: &Leg) -> Self {
        Self {
            remain_drive: leg.drive_hours,
            km_covered: 0.0,
        }
    }

    /// Consumes `hours` of driving: decreases the remaining drive time
    /// (floored at zero) and advances the covered distance at the leg's
    /// constant speed. Returns the kilometers driven so the caller can
    /// feed its since-refill counter.
    pub fn advance(&mut self, leg: &Leg, hours: f64) -> f64 {
        let km = hours * leg.km_per_hour();
        self.remain_drive = (self.remain_drive - hours).max(0.0);
        self.km_covered = (self.km_covered + km).min(leg.distance_km);
        km
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(drive_hours: f64, distance_km: f64) -> Leg {
        Leg {
            name: "leg1".to_string(),
            drive_hours,
            distance_km,
            duty_hours: 1.0,
            destination: "Indianapolis, IN".to_string(),
            purpose: StopPurpose::Pickup,
            route: Polyline::new(vec![(-87.6, 41.8), (-86.1, 39.7)]),
        }
    }

    #[test]
    fn test_allowed_drive_caps() {
        let leg = leg(12.0, 1200.0);
        let progress = LegProgress::start(&leg);

        // Fresh day: the 11h drive cap binds.
        assert_eq!(leg.allowed_drive(&progress, 0.0, 0.0), 11.0);
        // Duty window binds once enough on-duty time has accrued.
        assert_eq!(leg.allowed_drive(&progress, 0.0, 4.0), 10.0);
        // Remaining drive binds on a short leg.
        let short = super::Leg { drive_hours: 2.0, ..leg.clone() };
        let progress = LegProgress::start(&short);
        assert_eq!(short.allowed_drive(&progress, 0.0, 0.0), 2.0);
    }

    #[test]
    fn test_allowed_drive_never_exceeds_remaining() {
        let leg = leg(12.0, 1200.0);
        let mut progress = LegProgress::start(&leg);
        progress.advance(&leg, 11.0);
        assert_eq!(leg.allowed_drive(&progress, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_exhausted_day_yields_zero() {
        let leg = leg(12.0, 1200.0);
        let progress = LegProgress::start(&leg);
        assert!(leg.allowed_drive(&progress, 11.0, 11.0) <= 0.0);
        assert!(leg.allowed_drive(&progress, 3.0, 14.0) <= 0.0);
    }

    #[test]
    fn test_drive_hours_to_refill_rounds_down() {
        // 2000 km over 20h: 100 km/h, threshold at 1609.34 km.
        let leg = leg(20.0, 2000.0);
        // 1609.34 km left → 16.0934h → 16.0
        assert_eq!(leg.drive_hours_to_refill(0.0), 16.0);
        // 509.34 km left → 5.0934h → 5.0
        assert_eq!(leg.drive_hours_to_refill(1100.0), 5.0);
        // Past the threshold: zero.
        assert_eq!(leg.drive_hours_to_refill(1700.0), 0.0);
    }

    #[test]
    fn test_zero_distance_leg_guards_division() {
        let leg = leg(1.0, 0.0);
        assert_eq!(leg.drive_hours_to_refill(0.0), 0.0);
        let mut progress = LegProgress::start(&leg);
        assert_eq!(progress.advance(&leg, 1.0), 0.0);
        assert_eq!(progress.remain_drive, 0.0);
        assert_eq!(progress.km_covered, 0.0);
    }

    #[test]
    fn test_advance_tracks_distance_at_constant_speed() {
        let leg = leg(20.0, 2000.0);
        let mut progress = LegProgress::start(&leg);
        let km = progress.advance(&leg, 11.0);
        assert!((km - 1100.0).abs() < 1e-9);
        assert!((progress.remain_drive - 9.0).abs() < 1e-9);
        assert!((progress.km_covered - 1100.0).abs() < 1e-9);

        progress.advance(&leg, 9.0);
        assert_eq!(progress.remain_drive, 0.0);
        assert!((progress.km_covered - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_floors_remaining_at_zero() {
        let leg = leg(2.0, 200.0);
        let mut progress = LegProgress::start(&leg);
        progress.advance(&leg, 5.0);
        assert_eq!(progress.remain_drive, 0.0);
        assert!(progress.km_covered <= leg.distance_km);
    }
}
