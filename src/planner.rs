//! Trip planning orchestration.
//!
//! Resolves the trip's geography up front, runs the pre-flight cycle
//! validator, simulates the duty cycle, and post-processes the timeline
//! into log sheets and map waypoints. Every geo result is fetched once
//! and reused for the whole run.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::leg::{Leg, StopPurpose};
use crate::logsheet::{slice_log_sheets, LogSheet};
use crate::rounding::round_up_quarter_hour;
use crate::simulator::Simulator;
use crate::traits::{Coord, GeoService};
use crate::waypoints::{aggregate, RestStops, TripCoords};

/// Rolling multi-day duty-hour budget.
pub const CYCLE_LIMIT_HOURS: f64 = 70.0;

/// Hour of day the trip starts when the request does not say.
pub const DEFAULT_START_HOUR: f64 = 5.0;

/// On-duty service time at the pickup and at the dropoff.
const STOP_SERVICE_HOURS: f64 = 1.0;

/// A trip to plan: three free-text locations plus the duty hours already
/// consumed in the rolling cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub cycle_used_hours: f64,
    /// Hour of day (0–24) the driver becomes available; defaults to 5.0.
    #[serde(default)]
    pub start_hour: Option<f64>,
}

/// The planned trip: map markers, one log sheet per touched calendar day,
/// and the route geometry for each leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripPlan {
    pub rests: RestStops,
    pub log_sheets: Vec<LogSheet>,
    pub routes: Vec<Vec<Coord>>,
}

/// Plans one trip against the given geo service.
pub fn plan_trip<G: GeoService>(request: &TripRequest, geo: &G) -> Result<TripPlan> {
    validate_request(request)?;

    let resolved = geo.resolve(&[
        request.current_location.as_str(),
        request.pickup_location.as_str(),
        request.dropoff_location.as_str(),
    ])?;
    let [current, pickup, dropoff] = resolved[..] else {
        return Err(Error::GeoService(format!(
            "expected 3 resolved coordinates, got {}",
            resolved.len()
        )));
    };
    let coords = TripCoords { current, pickup, dropoff };
    let stops = [current, pickup, dropoff];

    let durations = geo.leg_durations(&stops)?;
    if durations.len() != 2 {
        return Err(Error::GeoService(format!(
            "expected 2 leg durations, got {}",
            durations.len()
        )));
    }
    let drive_hours: Vec<f64> = durations.iter().copied().map(round_up_quarter_hour).collect();
    let loading = round_up_quarter_hour(STOP_SERVICE_HOURS);
    let unloading = round_up_quarter_hour(STOP_SERVICE_HOURS);

    validate_cycle_budget(request.cycle_used_hours, &drive_hours, loading + unloading)?;

    let distances = geo.leg_distances(&stops)?;
    if distances.len() != 2 {
        return Err(Error::GeoService(format!(
            "expected 2 leg distances, got {}",
            distances.len()
        )));
    }
    let geometries = geo.route_geometries(&stops)?;
    let [route1, route2] = <[_; 2]>::try_from(geometries).map_err(|gs| {
        Error::GeoService(format!("expected 2 route geometries, got {}", gs.len()))
    })?;

    let legs = [
        Leg {
            name: "leg1".to_string(),
            drive_hours: drive_hours[0],
            distance_km: distances[0],
            duty_hours: loading,
            destination: request.pickup_location.clone(),
            purpose: StopPurpose::Pickup,
            route: route1,
        },
        Leg {
            name: "leg2".to_string(),
            drive_hours: drive_hours[1],
            distance_km: distances[1],
            duty_hours: unloading,
            destination: request.dropoff_location.clone(),
            purpose: StopPurpose::Dropoff,
            route: route2,
        },
    ];

    let start_hour = request.start_hour.unwrap_or(DEFAULT_START_HOUR);
    let timeline = Simulator::new(geo, start_hour).run(&legs)?;
    let log_sheets = slice_log_sheets(&timeline);
    let rests = aggregate(&coords, &timeline.remarks);
    let routes = legs.map(|leg| leg.route.into_points()).into_iter().collect();

    info!(
        from = %request.current_location,
        to = %request.dropoff_location,
        days = log_sheets.len(),
        "trip planned"
    );
    Ok(TripPlan { rests, log_sheets, routes })
}

fn validate_request(request: &TripRequest) -> Result<()> {
    if !request.cycle_used_hours.is_finite() || request.cycle_used_hours < 0.0 {
        return Err(Error::InvalidInput(format!(
            "cycle_used_hours must be a non-negative number, got {}",
            request.cycle_used_hours
        )));
    }
    if let Some(start) = request.start_hour {
        if !(0.0..=24.0).contains(&start) {
            return Err(Error::InvalidInput(format!(
                "start_hour must be within 0..=24, got {start}"
            )));
        }
    }
    Ok(())
}

/// The authoritative pre-flight rule: the whole trip's duty must fit the
/// rolling cycle budget. The per-day 14h window is enforced inside the
/// simulator, so no separate single-day check runs here.
fn validate_cycle_budget(cycle_used: f64, drive_hours: &[f64], service_hours: f64) -> Result<()> {
    let total = cycle_used + drive_hours.iter().sum::<f64>() + service_hours;
    if total > CYCLE_LIMIT_HOURS {
        return Err(Error::DutyLimitExceeded(format!(
            "trip needs {total:.2}h of the {CYCLE_LIMIT_HOURS}h cycle"
        )));
    }
    Ok(())
}
