//! Duty-cycle simulation: the HOS state machine.
//!
//! Walks each leg in quarter-hour-rounded increments, deciding how much
//! driving is legal next, when to insert mandatory rests and fuel stops,
//! and emitting a flat activity timeline plus annotated remarks. Checks
//! run in a fixed order on every iteration (duty exhaustion, then the
//! refill threshold, then a drive increment) so a rest is always taken
//! before a refill would be skipped, and a refill always lands before the
//! threshold is crossed.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::leg::{Leg, LegProgress, MAX_DUTY_WINDOW_HOURS};
use crate::traits::{Coord, GeoService};

/// Mandatory off-duty period once the drive or duty cap is exhausted.
pub const MANDATORY_REST_HOURS: f64 = 10.0;

/// On-duty time spent at a fuel stop.
pub const REFILL_STOP_HOURS: f64 = 0.5;

pub const REST_LABEL: &str = "Duty-Limit Rest";
pub const REFILL_LABEL: &str = "Fuel Refill";

/// Duty status of one timeline interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DutyStatus {
    Driving,
    #[serde(rename = "On Duty")]
    OnDuty,
    #[serde(rename = "Off Duty")]
    OffDuty,
}

impl DutyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DutyStatus::Driving => "Driving",
            DutyStatus::OnDuty => "On Duty",
            DutyStatus::OffDuty => "Off Duty",
        }
    }
}

/// A continuous interval of the activity timeline. Hours count from trip
/// start and are not clamped to 24h boundaries until sliced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub start: f64,
    pub end: f64,
    pub status: DutyStatus,
}

/// An annotated stop. Only rest and refill remarks carry a coordinate;
/// load/unload remarks use the known destination name directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Remark {
    pub start: f64,
    pub end: f64,
    pub location: String,
    pub information: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coord>,
}

/// Simulator output: the flat timeline and its remark events.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub activities: Vec<Activity>,
    pub remarks: Vec<Remark>,
}

/// The closed set of stops the simulator inserts on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopCause {
    DutyLimitRest,
    FuelRefill,
}

impl StopCause {
    fn duration_hours(self) -> f64 {
        match self {
            StopCause::DutyLimitRest => MANDATORY_REST_HOURS,
            StopCause::FuelRefill => REFILL_STOP_HOURS,
        }
    }

    fn status(self) -> DutyStatus {
        match self {
            StopCause::DutyLimitRest => DutyStatus::OffDuty,
            StopCause::FuelRefill => DutyStatus::OnDuty,
        }
    }

    fn label(self) -> &'static str {
        match self {
            StopCause::DutyLimitRest => REST_LABEL,
            StopCause::FuelRefill => REFILL_LABEL,
        }
    }
}

/// Stateful walk over the trip's legs.
pub struct Simulator<'a, G: GeoService> {
    geo: &'a G,
    clock: f64,
    driving_today: f64,
    duty_today: f64,
    km_since_refill: f64,
    activities: Vec<Activity>,
    remarks: Vec<Remark>,
}

impl<'a, G: GeoService> Simulator<'a, G> {
    /// Starts a run at `start_hour` (hours of day 0). Any time before it
    /// is logged as off duty.
    pub fn new(geo: &'a G, start_hour: f64) -> Self {
        let mut activities = Vec::new();
        if start_hour > 0.0 {
            activities.push(Activity {
                start: 0.0,
                end: start_hour,
                status: DutyStatus::OffDuty,
            });
        }
        Self {
            geo,
            clock: start_hour,
            driving_today: 0.0,
            duty_today: 0.0,
            km_since_refill: 0.0,
            activities,
            remarks: Vec::new(),
        }
    }

    /// Simulates all legs in order and closes out the final calendar day.
    pub fn run(mut self, legs: &[Leg]) -> Result<Timeline> {
        for leg in legs {
            self.run_leg(leg)?;
        }
        self.close_final_day();
        info!(
            end_hour = self.clock,
            activities = self.activities.len(),
            remarks = self.remarks.len(),
            "simulation complete"
        );
        Ok(Timeline {
            activities: self.activities,
            remarks: self.remarks,
        })
    }

    fn run_leg(&mut self, leg: &Leg) -> Result<()> {
        let mut progress = LegProgress::start(leg);

        while progress.remain_drive > 0.0 {
            let allowed = leg.allowed_drive(&progress, self.driving_today, self.duty_today);
            if allowed <= 0.0 {
                self.insert_stop(StopCause::DutyLimitRest, leg, &progress)?;
                continue;
            }

            // A full tank (counter at zero) cannot need fuel; checking the
            // counter also keeps a leg faster than one tank per duty day
            // from refilling twice at the same spot. Legs that cover no
            // distance never approach the threshold at all.
            let to_refill = leg.drive_hours_to_refill(self.km_since_refill);
            if leg.distance_km > 0.0 && self.km_since_refill > 0.0 && allowed > to_refill {
                self.insert_stop(StopCause::FuelRefill, leg, &progress)?;
                continue;
            }

            self.drive(leg, &mut progress, allowed);
        }

        // Service at the destination must still fit today's duty window.
        if self.duty_today + leg.duty_hours > MAX_DUTY_WINDOW_HOURS {
            self.insert_stop(StopCause::DutyLimitRest, leg, &progress)?;
        }
        self.serve_destination(leg)
    }

    /// One driving increment of `hours`.
    fn drive(&mut self, leg: &Leg, progress: &mut LegProgress, hours: f64) {
        self.push_activity(hours, DutyStatus::Driving);
        self.driving_today += hours;
        self.duty_today += hours;
        self.km_since_refill += progress.advance(leg, hours);
        debug!(
            leg = %leg.name,
            hours,
            km_covered = progress.km_covered,
            "drive increment"
        );
    }

    /// Inserts a rest or refill stop at the current point on the route,
    /// annotated with the interpolated coordinate and its place name.
    fn insert_stop(&mut self, cause: StopCause, leg: &Leg, progress: &LegProgress) -> Result<()> {
        let coord = self.geo.interpolate(&leg.route, progress.km_covered)?;
        let place = self.geo.reverse_geocode(coord.1, coord.0);
        let hours = cause.duration_hours();

        debug!(leg = %leg.name, cause = cause.label(), at = self.clock, %place, "stop inserted");
        self.remarks.push(Remark {
            start: self.clock,
            end: self.clock + hours,
            location: place,
            information: cause.label().to_string(),
            coords: Some(coord),
        });
        self.push_activity(hours, cause.status());

        match cause {
            StopCause::DutyLimitRest => {
                self.driving_today = 0.0;
                self.duty_today = 0.0;
            }
            StopCause::FuelRefill => {
                self.duty_today += hours;
                self.km_since_refill = 0.0;
            }
        }
        Ok(())
    }

    /// Load/unload on-duty time at the leg destination. The destination
    /// name is already known, so no geo lookup happens here.
    fn serve_destination(&mut self, leg: &Leg) -> Result<()> {
        if leg.duty_hours <= 0.0 {
            return Ok(());
        }
        self.remarks.push(Remark {
            start: self.clock,
            end: self.clock + leg.duty_hours,
            location: leg.destination.clone(),
            information: leg.purpose.label().to_string(),
            coords: None,
        });
        self.push_activity(leg.duty_hours, DutyStatus::OnDuty);
        self.duty_today += leg.duty_hours;

        // Unreachable after the forced rest above; the window check stays
        // authoritative regardless.
        if self.duty_today > MAX_DUTY_WINDOW_HOURS {
            return Err(Error::DutyLimitExceeded(format!(
                "{} at {} does not fit the {}h duty window",
                leg.purpose.label(),
                leg.destination,
                MAX_DUTY_WINDOW_HOURS
            )));
        }
        Ok(())
    }

    /// Logs the remainder of the current calendar day as off duty.
    fn close_final_day(&mut self) {
        let day_end = (self.clock / 24.0).ceil() * 24.0;
        if day_end > self.clock {
            self.push_activity(day_end - self.clock, DutyStatus::OffDuty);
        }
    }

    fn push_activity(&mut self, hours: f64, status: DutyStatus) {
        self.activities.push(Activity {
            start: self.clock,
            end: self.clock + hours,
            status,
        });
        self.clock += hours;
    }
}
