pub mod geocode;

use lifeline_types::models::Point;

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A circular geofence: center plus radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub center: Point,
    pub radius_m: f64,
}

impl Zone {
    pub fn new(center: Point, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Boundary inclusive: a point exactly `radius_m` away is inside.
    pub fn contains(&self, point: Point) -> bool {
        haversine_m(point, self.center) <= self.radius_m
    }
}

/// Great-circle distance in meters between two WGS84 coordinates.
pub fn haversine_m(a: Point, b: Point) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Set-membership over the caller's zones, short-circuiting on the first
/// containing zone. Never fails; zones with non-positive radius are rejected
/// at creation and so never reach this point.
pub fn is_within_any_zone(point: Point, zones: &[Zone]) -> bool {
    zones.iter().any(|zone| zone.contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distances() {
        // New York -> London, about 5570 km.
        let nyc = Point::new(40.7128, -74.0060);
        let london = Point::new(51.5074, -0.1278);
        let d = haversine_m(nyc, london);
        assert!((d - 5_570_000.0).abs() < 50_000.0);

        // Same point: zero.
        let p = Point::new(12.9716, 77.5946);
        assert!(haversine_m(p, p) < 1e-6);
    }

    #[test]
    fn equatorial_degree_scale() {
        // One degree of longitude at the equator is ~111.2 km.
        let d = haversine_m(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 200.0);
    }

    #[test]
    fn zone_membership_end_to_end() {
        let home = Zone::new(Point::new(0.0, 0.0), 1000.0);

        // ~555 m east: inside.
        assert!(is_within_any_zone(Point::new(0.0, 0.005), &[home]));
        // ~2224 m east: outside.
        assert!(!is_within_any_zone(Point::new(0.0, 0.02), &[home]));
    }

    #[test]
    fn boundary_is_inclusive() {
        let center = Point::new(0.0, 0.0);
        let p = Point::new(0.0, 0.005);
        let zone = Zone::new(center, haversine_m(p, center));
        assert!(zone.contains(p));
    }

    #[test]
    fn first_match_wins_over_zone_set() {
        let point = Point::new(10.0, 10.0);
        let zones = [
            Zone::new(Point::new(-40.0, 100.0), 500.0),
            Zone::new(point, 50.0),
            Zone::new(Point::new(60.0, -120.0), 500.0),
        ];
        assert!(is_within_any_zone(point, &zones));
        assert!(!is_within_any_zone(point, &zones[..1]));
    }

    #[test]
    fn no_zones_means_outside() {
        assert!(!is_within_any_zone(Point::new(0.0, 0.0), &[]));
    }
}
