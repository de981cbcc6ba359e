use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FleetError;

/// A WGS-84 point, degrees, no altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FleetError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FleetError::InvalidCoordinate {
                field: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FleetError::InvalidCoordinate {
                field: "longitude",
                value: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Raw ingress report as produced by the transport boundary. Validated once,
/// here, before anything downstream sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReport {
    pub truck_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionReport {
    /// Validates the report and stamps the arrival time.
    pub fn into_position(self) -> Result<Position, FleetError> {
        if self.truck_id.trim().is_empty() {
            return Err(FleetError::MissingTruckId);
        }
        let coordinate = Coordinate::new(self.latitude, self.longitude)?;
        Ok(Position {
            truck_id: self.truck_id,
            coordinate,
            recorded_at: Utc::now(),
        })
    }
}

/// Last known whereabouts of a truck. Immutable; a later report for the same
/// truck supersedes it rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub truck_id: String,
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteStatus {
    Planned,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub route_id: String,
    pub truck_id: String,
    pub status: RouteStatus,
    pub planned_departure: Option<DateTime<Utc>>,
    pub planned_arrival: Option<DateTime<Utc>>,
}

/// A point on a planned route. `sequence_number` is unique and strictly
/// increasing within a route; `expected_arrival_min` is minutes from route
/// start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub route_id: String,
    pub sequence_number: u32,
    pub coordinate: Coordinate,
    pub expected_arrival_min: f64,
}

/// How far past the trigger threshold a deviation landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviationStatus {
    New,
    Acknowledged,
    Resolved,
}

/// A detected excursion from the assigned route. Created only through the
/// deviation ledger; status moves only through acknowledge/resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub id: Uuid,
    pub route_id: String,
    pub truck_id: String,
    pub distance_m: f64,
    pub coordinate: Coordinate,
    pub detected_at: DateTime<Utc>,
    pub severity: Severity,
    pub status: DeviationStatus,
}
