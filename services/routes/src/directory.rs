use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use shared::routes::RouteProvider;
use shared::types::{Coordinate, Route, RouteStatus, Waypoint};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route not found: {0}")]
    NotFound(String),

    #[error("truck {truck_id} already has active route {route_id}")]
    ActiveRouteExists { truck_id: String, route_id: String },

    #[error("waypoint sequence numbers must be strictly increasing")]
    InvalidWaypoints,

    #[error("route {route_id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        route_id: String,
        from: RouteStatus,
        to: RouteStatus,
    },
}

/// Waypoint data as supplied at route creation, before a route id exists to
/// stamp onto it.
#[derive(Debug, Clone)]
pub struct WaypointSpec {
    pub sequence_number: u32,
    pub coordinate: Coordinate,
    pub expected_arrival_min: f64,
}

/// Route assignments and their lifecycle: Planned -> Active -> Completed.
/// Enforces the invariant the rest of the system relies on: at most one
/// Active route per truck at any time.
pub struct RouteDirectory {
    routes: DashMap<String, Route>,
    waypoints: DashMap<String, Vec<Waypoint>>,
    active_by_truck: DashMap<String, String>,
}

impl Default for RouteDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteDirectory {
    pub fn new() -> Self {
        Self {
            routes: DashMap::new(),
            waypoints: DashMap::new(),
            active_by_truck: DashMap::new(),
        }
    }

    /// Registers a Planned route. Waypoint sequence numbers must be strictly
    /// increasing; they arrive pre-ordered or not at all.
    pub fn create_route(
        &self,
        truck_id: &str,
        waypoints: Vec<WaypointSpec>,
    ) -> Result<Route, RouteError> {
        if waypoints
            .windows(2)
            .any(|w| w[0].sequence_number >= w[1].sequence_number)
        {
            return Err(RouteError::InvalidWaypoints);
        }

        let route_id = format!(
            "ROUTE-{}",
            Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );

        let route = Route {
            route_id: route_id.clone(),
            truck_id: truck_id.to_string(),
            status: RouteStatus::Planned,
            planned_departure: None,
            planned_arrival: None,
        };

        let stamped: Vec<Waypoint> = waypoints
            .into_iter()
            .map(|spec| Waypoint {
                route_id: route_id.clone(),
                sequence_number: spec.sequence_number,
                coordinate: spec.coordinate,
                expected_arrival_min: spec.expected_arrival_min,
            })
            .collect();

        self.waypoints.insert(route_id.clone(), stamped);
        self.routes.insert(route_id.clone(), route.clone());

        tracing::info!(route_id = %route_id, truck_id = %truck_id, "route created");
        Ok(route)
    }

    /// Planned -> Active. Fails if the truck already has an Active route;
    /// the caller must complete that one first.
    pub fn activate_route(&self, route_id: &str) -> Result<Route, RouteError> {
        let mut route = self
            .routes
            .get_mut(route_id)
            .ok_or_else(|| RouteError::NotFound(route_id.to_string()))?;

        if route.status != RouteStatus::Planned {
            return Err(RouteError::InvalidTransition {
                route_id: route_id.to_string(),
                from: route.status,
                to: RouteStatus::Active,
            });
        }

        match self.active_by_truck.entry(route.truck_id.clone()) {
            Entry::Occupied(existing) => {
                return Err(RouteError::ActiveRouteExists {
                    truck_id: route.truck_id.clone(),
                    route_id: existing.get().clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(route_id.to_string());
            }
        }

        route.status = RouteStatus::Active;
        route.planned_departure = Some(Utc::now());
        tracing::info!(route_id = %route_id, truck_id = %route.truck_id, "route activated");
        Ok(route.clone())
    }

    /// Active -> Completed; frees the truck's active slot.
    pub fn complete_route(&self, route_id: &str) -> Result<Route, RouteError> {
        let mut route = self
            .routes
            .get_mut(route_id)
            .ok_or_else(|| RouteError::NotFound(route_id.to_string()))?;

        if route.status != RouteStatus::Active {
            return Err(RouteError::InvalidTransition {
                route_id: route_id.to_string(),
                from: route.status,
                to: RouteStatus::Completed,
            });
        }

        route.status = RouteStatus::Completed;
        route.planned_arrival = Some(Utc::now());
        self.active_by_truck.remove(&route.truck_id);
        tracing::info!(route_id = %route_id, truck_id = %route.truck_id, "route completed");
        Ok(route.clone())
    }

    pub fn get_route(&self, route_id: &str) -> Result<Route, RouteError> {
        self.routes
            .get(route_id)
            .map(|r| r.clone())
            .ok_or_else(|| RouteError::NotFound(route_id.to_string()))
    }

    pub fn all_routes(&self) -> Vec<Route> {
        self.routes.iter().map(|r| r.clone()).collect()
    }
}

#[async_trait]
impl RouteProvider for RouteDirectory {
    async fn active_route_for(&self, truck_id: &str) -> Option<Route> {
        let route_id = self.active_by_truck.get(truck_id)?.clone();
        self.routes.get(&route_id).map(|r| r.clone())
    }

    async fn waypoints_of(&self, route_id: &str) -> Vec<Waypoint> {
        // Stored pre-validated in sequence order.
        self.waypoints
            .get(route_id)
            .map(|w| w.clone())
            .unwrap_or_default()
    }
}
