use shared::config::DeviationThresholds;
use shared::geo;
use shared::types::{Coordinate, Position, Route, Waypoint};

/// A threshold breach found by the engine. Carries no identity or status;
/// only [`crate::ledger::DeviationLedger::record`] turns it into a
/// deviation.
#[derive(Debug, Clone)]
pub struct DeviationCandidate {
    pub route_id: String,
    pub truck_id: String,
    pub distance_m: f64,
    pub coordinate: Coordinate,
}

/// Decides whether a position has strayed from its route's polyline.
/// Pure: same inputs, same answer, no side effects.
#[derive(Debug, Clone, Copy)]
pub struct DeviationEngine {
    thresholds: DeviationThresholds,
}

impl DeviationEngine {
    pub fn new(thresholds: DeviationThresholds) -> Self {
        Self { thresholds }
    }

    /// Minimum distance from the position to any consecutive waypoint pair,
    /// compared against the trigger threshold. Exactly at the threshold is
    /// still on-route; only strictly greater flags a candidate.
    ///
    /// Fewer than two waypoints means there is no geometry to compare
    /// against, which is a normal no-candidate outcome rather than an error.
    pub fn evaluate(
        &self,
        position: &Position,
        route: &Route,
        waypoints: &[Waypoint],
    ) -> Option<DeviationCandidate> {
        if waypoints.len() < 2 {
            return None;
        }

        let mut min_distance = f64::INFINITY;
        for pair in waypoints.windows(2) {
            let d = geo::distance_to_segment(
                position.coordinate,
                pair[0].coordinate,
                pair[1].coordinate,
            );
            if d < min_distance {
                min_distance = d;
            }
        }

        if min_distance > self.thresholds.trigger_m {
            Some(DeviationCandidate {
                route_id: route.route_id.clone(),
                truck_id: position.truck_id.clone(),
                distance_m: min_distance,
                coordinate: position.coordinate,
            })
        } else {
            None
        }
    }
}
