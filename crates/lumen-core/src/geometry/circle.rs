use super::LngLat;
use crate::consts::EARTH_RADIUS_M;

/// Point reached by travelling `distance_m` from `origin` along `bearing_deg`
/// on a spherical earth.
pub fn destination(origin: LngLat, distance_m: f64, bearing_deg: f64) -> LngLat {
    let lon1 = origin.lon().to_radians();
    let lat1 = origin.lat().to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    LngLat(lon2.to_degrees(), lat2.to_degrees())
}

/// Closed polygonal approximation of a circle of `radius_m` meters.
///
/// Produces `steps` vertices walked counter-clockwise from north plus the
/// closing vertex. Output depends only on the inputs.
pub fn circle_ring(center: LngLat, radius_m: f64, steps: usize) -> Vec<LngLat> {
    let steps = steps.max(3);
    let mut ring = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let bearing = (i as f64) * -360.0 / (steps as f64);
        ring.push(destination(center, radius_m, bearing));
    }
    ring.push(ring[0]);
    ring
}

/// Great-circle distance in meters.
pub fn haversine_m(a: LngLat, b: LngLat) -> f64 {
    let dlat = (b.lat() - a.lat()).to_radians();
    let dlon = (b.lon() - a.lon()).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}
