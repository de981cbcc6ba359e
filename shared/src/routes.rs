use async_trait::async_trait;

use crate::types::{Route, Waypoint};

/// Read-only view of route assignments consumed by the update pipeline.
///
/// At most one route per truck is Active at a time; the implementor
/// enforces that invariant, callers rely on it.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// The route the truck is currently traveling, if any.
    async fn active_route_for(&self, truck_id: &str) -> Option<Route>;

    /// Waypoints of a route, ordered by sequence number. Unknown routes
    /// yield an empty sequence.
    async fn waypoints_of(&self, route_id: &str) -> Vec<Waypoint>;
}
