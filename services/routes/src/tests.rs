use shared::routes::RouteProvider;
use shared::types::{Coordinate, RouteStatus};

use crate::directory::{RouteDirectory, RouteError, WaypointSpec};

fn wp(seq: u32, lat: f64, lon: f64) -> WaypointSpec {
    WaypointSpec {
        sequence_number: seq,
        coordinate: Coordinate::new(lat, lon).unwrap(),
        expected_arrival_min: seq as f64 * 15.0,
    }
}

fn three_waypoints() -> Vec<WaypointSpec> {
    vec![wp(0, 0.0, 0.0), wp(1, 0.0, 1.0), wp(2, 0.0, 2.0)]
}

#[test]
fn create_route_starts_planned() {
    let directory = RouteDirectory::new();
    let route = directory.create_route("T1", three_waypoints()).unwrap();

    assert!(route.route_id.starts_with("ROUTE-"));
    assert_eq!(route.truck_id, "T1");
    assert_eq!(route.status, RouteStatus::Planned);
    assert!(route.planned_departure.is_none());
}

#[test]
fn waypoints_are_stamped_and_ordered() {
    let directory = RouteDirectory::new();
    let route = directory.create_route("T1", three_waypoints()).unwrap();

    let wps = tokio_test::block_on(directory.waypoints_of(&route.route_id));
    assert_eq!(wps.len(), 3);
    assert!(wps.iter().all(|w| w.route_id == route.route_id));
    assert!(wps.windows(2).all(|w| w[0].sequence_number < w[1].sequence_number));
}

#[test]
fn waypoint_sequence_must_increase() {
    let directory = RouteDirectory::new();

    let duplicated = vec![wp(0, 0.0, 0.0), wp(0, 0.0, 1.0)];
    assert_eq!(
        directory.create_route("T1", duplicated).unwrap_err(),
        RouteError::InvalidWaypoints
    );

    let decreasing = vec![wp(2, 0.0, 0.0), wp(1, 0.0, 1.0)];
    assert_eq!(
        directory.create_route("T1", decreasing).unwrap_err(),
        RouteError::InvalidWaypoints
    );
}

#[test]
fn activation_lifecycle() {
    let directory = RouteDirectory::new();
    let route = directory.create_route("T1", three_waypoints()).unwrap();

    let active = directory.activate_route(&route.route_id).unwrap();
    assert_eq!(active.status, RouteStatus::Active);
    assert!(active.planned_departure.is_some());

    // Active -> Active is not a legal move.
    assert!(matches!(
        directory.activate_route(&route.route_id),
        Err(RouteError::InvalidTransition { .. })
    ));

    let done = directory.complete_route(&route.route_id).unwrap();
    assert_eq!(done.status, RouteStatus::Completed);
    assert!(done.planned_arrival.is_some());
}

#[test]
fn at_most_one_active_route_per_truck() {
    let directory = RouteDirectory::new();
    let first = directory.create_route("T1", three_waypoints()).unwrap();
    let second = directory.create_route("T1", three_waypoints()).unwrap();

    directory.activate_route(&first.route_id).unwrap();
    assert_eq!(
        directory.activate_route(&second.route_id).unwrap_err(),
        RouteError::ActiveRouteExists {
            truck_id: "T1".into(),
            route_id: first.route_id.clone(),
        }
    );

    // Completing the first frees the slot.
    directory.complete_route(&first.route_id).unwrap();
    assert!(directory.activate_route(&second.route_id).is_ok());
}

#[test]
fn completing_a_planned_route_fails() {
    let directory = RouteDirectory::new();
    let route = directory.create_route("T1", three_waypoints()).unwrap();
    assert!(matches!(
        directory.complete_route(&route.route_id),
        Err(RouteError::InvalidTransition { .. })
    ));
}

#[test]
fn unknown_route_is_not_found() {
    let directory = RouteDirectory::new();
    assert_eq!(
        directory.activate_route("ROUTE-NOPE").unwrap_err(),
        RouteError::NotFound("ROUTE-NOPE".into())
    );
    assert_eq!(
        directory.get_route("ROUTE-NOPE").unwrap_err(),
        RouteError::NotFound("ROUTE-NOPE".into())
    );
}

#[tokio::test]
async fn provider_reflects_lifecycle() {
    let directory = RouteDirectory::new();
    let route = directory.create_route("T1", three_waypoints()).unwrap();

    assert!(directory.active_route_for("T1").await.is_none());

    directory.activate_route(&route.route_id).unwrap();
    let active = directory.active_route_for("T1").await.unwrap();
    assert_eq!(active.route_id, route.route_id);

    directory.complete_route(&route.route_id).unwrap();
    assert!(directory.active_route_for("T1").await.is_none());

    assert!(directory.waypoints_of("ROUTE-NOPE").await.is_empty());
}
