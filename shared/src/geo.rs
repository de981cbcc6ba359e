//! Great-circle helpers shared by the deviation engine and the proximity
//! queries on the position cache. Pure functions, no state.

use crate::types::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Shortest distance in meters from `p` to the segment `s1`-`s2`.
///
/// The projection parameter is computed in raw degree space and clamped to
/// [0, 1]; the result is the haversine distance to the interpolated point.
/// This locally-flat approximation holds for waypoint spacing up to tens of
/// kilometers and is not geodesically exact for longer segments.
pub fn distance_to_segment(p: Coordinate, s1: Coordinate, s2: Coordinate) -> f64 {
    let dx = s2.latitude - s1.latitude;
    let dy = s2.longitude - s1.longitude;

    // Degenerate segment
    if dx == 0.0 && dy == 0.0 {
        return distance(p, s1);
    }

    let t = ((p.latitude - s1.latitude) * dx + (p.longitude - s1.longitude) * dy)
        / (dx * dx + dy * dy);
    let t = t.clamp(0.0, 1.0);

    let closest = Coordinate {
        latitude: s1.latitude + t * dx,
        longitude: s1.longitude + t * dy,
    };

    distance(p, closest)
}
