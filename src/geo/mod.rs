//! Geometry kernel (C1): lat/lon <-> local ENU projection, polygon
//! primitives, intersection tests, simplification and rotation.
//!
//! Degeneracy thresholds: `1e-10` for direction/length comparisons, `1e-6`
//! for duplicate-point coalescing (spec \S4.1). Angles are degrees at the
//! public boundary, radians internally. Heading convention: 0° = north,
//! clockwise positive, in `[0°, 360°)`.

mod intersect;
mod polygon;
mod projection;
mod simplify;
#[cfg(feature = "utm")]
mod utm;

pub use intersect::{segment_circle_intersect, segment_polygon_intersect, segment_segment_intersect};
pub use polygon::{
    bounding_box, centroid, convex_hull, offset_polygon, point_in_polygon, rotate_points,
    shoelace_area, BoundingBox,
};
pub use projection::{
    bearing_deg, distance_haversine_m, distance_planar_m, point_at, project, project_wgs84,
    unproject, unproject_wgs84, ProjectionOrigin,
};
pub use simplify::douglas_peucker;
#[cfg(feature = "utm")]
pub use utm::to_utm;

/// Direction/length degeneracy threshold (spec \S4.1).
pub const EPS_DIRECTION: f64 = 1e-10;
/// Duplicate-point coalescing threshold (spec \S4.1).
pub const EPS_COALESCE: f64 = 1e-6;

/// A geographic point: latitude/longitude in degrees, optional altitude in
/// metres above nominal ground (spec \S3).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, alt: None }
    }

    pub fn with_alt(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt: Some(alt) }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A local-frame point: ENU metres relative to a declared origin. `x` is
/// east, `y` is north (spec \S9 coordinate-system subtlety).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector2(self) -> nalgebra::Vector2<f64> {
        nalgebra::Vector2::new(self.x, self.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Point2 {
    fn from(v: nalgebra::Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl std::ops::Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Mul<f64> for Point2 {
    type Output = Point2;
    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

/// A simple polygon: an ordered sequence of ≥3 local points, implicitly
/// closed. The core does not validate simplicity (spec \S3: caller error).
#[derive(Debug, Clone, PartialEq)]
pub struct LocalPolygon {
    pub vertices: Vec<Point2>,
}

impl LocalPolygon {
    pub fn new(vertices: Vec<Point2>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges as `(start, end)` pairs, with the closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    pub fn to_geo_polygon(&self) -> ::geo::Polygon<f64> {
        let coords: Vec<::geo::Coord<f64>> =
            self.vertices.iter().map(|p| ::geo::Coord { x: p.x, y: p.y }).collect();
        ::geo::Polygon::new(::geo::LineString::from(coords), vec![])
    }
}
