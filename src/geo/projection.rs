//! Lat/lon <-> local ENU projection and great-circle helpers.

use super::{GeoPoint, Point2};

/// Metres per degree of latitude, the equirectangular approximation
/// constant used throughout the core (spec \S3).
pub const METRES_PER_DEGREE: f64 = 111_111.0;

const EARTH_RADIUS_M: f64 = 6_371_000.0;
/// WGS84 semi-major/semi-minor axes, for the optional high-accuracy path.
const WGS84_A: f64 = 6_378_137.0;
const WGS84_E2: f64 = 0.006_694_379_990_13;

/// A local projection origin (spec \S3: `project(lat,lon; lat0,lon0)`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOrigin {
    pub lat0: f64,
    pub lon0: f64,
}

impl ProjectionOrigin {
    pub fn new(lat0: f64, lon0: f64) -> Self {
        Self { lat0, lon0 }
    }

    pub fn from_centroid(points: &[GeoPoint]) -> Self {
        let n = points.len().max(1) as f64;
        let lat0 = points.iter().map(|p| p.lat).sum::<f64>() / n;
        let lon0 = points.iter().map(|p| p.lon).sum::<f64>() / n;
        Self { lat0, lon0 }
    }

    pub fn project(&self, p: GeoPoint) -> Point2 {
        project(p, *self)
    }

    pub fn unproject(&self, p: Point2) -> GeoPoint {
        unproject(p, *self)
    }
}

/// Equirectangular-approximation projection: `x = dlon * K * cos(lat0)`,
/// `y = dlat * K`, `K ~= 111111 m/deg` (spec \S3).
pub fn project(p: GeoPoint, origin: ProjectionOrigin) -> Point2 {
    let dlat = p.lat - origin.lat0;
    let dlon = p.lon - origin.lon0;
    let x = dlon * METRES_PER_DEGREE * origin.lat0.to_radians().cos();
    let y = dlat * METRES_PER_DEGREE;
    Point2::new(x, y)
}

/// Inverse of [`project`]. Round-trips within 1 cm for points within ~1 km
/// of the origin (spec \S8 invariant 1).
pub fn unproject(p: Point2, origin: ProjectionOrigin) -> GeoPoint {
    let dlat = p.y / METRES_PER_DEGREE;
    let dlon = p.x / (METRES_PER_DEGREE * origin.lat0.to_radians().cos());
    GeoPoint::new(origin.lat0 + dlat, origin.lon0 + dlon)
}

/// High-accuracy WGS84 projection using meridian/prime-vertical radii of
/// curvature, for callers needing better than the ~1e-2 relative error of
/// the equirectangular approximation beyond ~10 km (spec \S3).
pub fn project_wgs84(p: GeoPoint, origin: ProjectionOrigin) -> Point2 {
    let lat0_rad = origin.lat0.to_radians();
    let sin_lat0 = lat0_rad.sin();
    let denom = (1.0 - WGS84_E2 * sin_lat0 * sin_lat0).sqrt();
    let m = WGS84_A * (1.0 - WGS84_E2) / denom.powi(3); // meridian radius
    let n = WGS84_A / denom; // prime vertical radius

    let dlat = (p.lat - origin.lat0).to_radians();
    let dlon = (p.lon - origin.lon0).to_radians();

    let x = dlon * n * lat0_rad.cos();
    let y = dlat * m;
    Point2::new(x, y)
}

pub fn unproject_wgs84(p: Point2, origin: ProjectionOrigin) -> GeoPoint {
    let lat0_rad = origin.lat0.to_radians();
    let sin_lat0 = lat0_rad.sin();
    let denom = (1.0 - WGS84_E2 * sin_lat0 * sin_lat0).sqrt();
    let m = WGS84_A * (1.0 - WGS84_E2) / denom.powi(3);
    let n = WGS84_A / denom;

    let dlat = p.y / m;
    let dlon = p.x / (n * lat0_rad.cos());
    GeoPoint::new(origin.lat0 + dlat.to_degrees(), origin.lon0 + dlon.to_degrees())
}

/// Great-circle distance in metres (haversine formula).
pub fn distance_haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Planar (ENU) Euclidean distance in metres.
pub fn distance_planar_m(a: Point2, b: Point2) -> f64 {
    a.distance_to(&b)
}

/// Initial bearing from `a` to `b`, degrees, `[0, 360)`, 0 = north,
/// clockwise positive.
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let theta = y.atan2(x).to_degrees();
    (theta + 360.0) % 360.0
}

/// Spherical-earth direct geodesic problem: the point `distance` metres
/// from `origin` along `bearing_deg` (spec \S4.1).
pub fn point_at(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let brng = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brng.cos()).asin();
    let lon2 = lon1
        + (brng.sin() * delta.sin() * lat1.cos())
            .atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn project_round_trip_within_1cm() {
        let origin = ProjectionOrigin::new(23.7, 120.4);
        let p = GeoPoint::new(23.705, 120.402);
        let xy = project(p, origin);
        let back = unproject(xy, origin);
        let err_m = distance_haversine_m(p, back);
        assert!(err_m < 0.01, "round-trip error {err_m} m exceeds 1 cm");
    }

    #[test]
    fn origin_projects_to_zero() {
        let origin = ProjectionOrigin::new(10.0, 20.0);
        let xy = project(GeoPoint::new(10.0, 20.0), origin);
        assert_relative_eq!(xy.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(xy.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn bearing_north_is_zero() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        assert_relative_eq!(bearing_deg(a, b), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn bearing_east_is_90() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert_relative_eq!(bearing_deg(a, b), 90.0, epsilon = 1e-6);
    }

    #[test]
    fn point_at_round_trips_distance() {
        let origin = GeoPoint::new(40.0, -73.0);
        let dest = point_at(origin, 45.0, 1000.0);
        let d = distance_haversine_m(origin, dest);
        assert_relative_eq!(d, 1000.0, epsilon = 1.0);
    }
}
