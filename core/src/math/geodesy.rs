//! Spherical-earth helpers working in nautical miles and decimal degrees.

/// Mean earth radius expressed in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance between two positions in nautical miles.
///
/// Non-finite inputs propagate as NaN rather than panicking.
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = phi2 - phi1;
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
}

/// Position reached after travelling `distance_nm` along `bearing` from a start point.
pub fn destination(lat: f64, lon: f64, bearing: f64, distance_nm: f64) -> (f64, f64) {
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();
    let theta = bearing.to_radians();
    let delta = distance_nm / EARTH_RADIUS_NM;

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    let lon2 = (lambda2.to_degrees() + 540.0) % 360.0 - 180.0;
    (phi2.to_degrees(), lon2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_arc_minute_of_latitude_is_one_nm() {
        let d = haversine_nm(0.0, 0.0, 1.0 / 60.0, 0.0);
        assert!((d - 1.0).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(haversine_nm(50.1, -1.3, 50.1, -1.3), 0.0);
    }

    #[test]
    fn nan_coordinates_propagate() {
        assert!(haversine_nm(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn destination_inverts_haversine() {
        let (lat, lon) = destination(50.0, -1.0, 135.0, 12.5);
        let back = haversine_nm(50.0, -1.0, lat, lon);
        assert!((back - 12.5).abs() < 1e-6, "got {back}");
        assert!(lat < 50.0 && lon > -1.0);
    }
}
