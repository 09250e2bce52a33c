use crate::geo::GeoPoint;

use super::precision::normalize_degrees;

/// Mean Earth radius (kilometres) used for great-circle distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;

/// Great-circle distance between two points (Haversine), in kilometres.
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let sin_lat = (d_lat / 2.0).sin();
    let sin_lng = (d_lng / 2.0).sin();

    let h = sin_lat * sin_lat
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * sin_lng * sin_lng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());
    EARTH_MEAN_RADIUS_KM * c
}

/// Initial compass bearing from `from` toward `to` along the great circle.
///
/// Result is in `[0, 360)`, 0 = north, clockwise.
pub fn initial_bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Shortest angle between two compass directions, in `[0, 180]`.
pub fn angular_difference_deg(a: f64, b: f64) -> f64 {
    let d = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if d > 180.0 { 360.0 - d } else { d }
}
