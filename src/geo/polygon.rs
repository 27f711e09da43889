//! Polygon primitives: area, centroid, bounding box, convex hull,
//! point-in-polygon, offset and rotation.

use super::{Point2, EPS_DIRECTION};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

pub fn bounding_box(points: &[Point2]) -> Option<BoundingBox> {
    if points.is_empty() {
        return None;
    }
    let mut min = points[0];
    let mut max = points[0];
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(BoundingBox { min, max })
}

/// Signed shoelace area. Orientation may be either winding; callers that
/// need unsigned area take `.abs()` (spec \S3, invariant 2).
pub fn shoelace_area(vertices: &[Point2]) -> f64 {
    let n = vertices.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Vertex-average centroid (spec \S4.1).
pub fn centroid(vertices: &[Point2]) -> Option<Point2> {
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let sx: f64 = vertices.iter().map(|p| p.x).sum();
    let sy: f64 = vertices.iter().map(|p| p.y).sum();
    Some(Point2::new(sx / n, sy / n))
}

/// Even-odd ray-cast point-in-polygon test.
///
/// Resolved Open Question (spec \S9): the canonical even-odd test needs a
/// consistent strict/non-strict split across the two edge endpoints to
/// avoid double-counting at shared vertices. This port uses strict
/// inequality on the edge's lower endpoint and non-strict on the upper
/// endpoint: an edge `(p1, p2)` is considered to cross the horizontal ray
/// through `point.y` when `p1.y > point.y` differs from `p2.y > point.y`.
/// This convention is applied uniformly and is stable under polygon
/// rotation about its centroid (spec \S8, invariant 3), because it depends
/// only on the relative order of `y` values, which rotation preserves.
pub fn point_in_polygon(point: Point2, vertices: &[Point2]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = vertices[i];
        let vj = vertices[j];
        let crosses = (vi.y > point.y) != (vj.y > point.y);
        if crosses {
            let x_intersect = vj.x + (point.y - vj.y) / (vi.y - vj.y) * (vi.x - vj.x);
            if point.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Graham-scan convex hull. Returns vertices in counter-clockwise order.
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut pts: Vec<Point2> = points.to_vec();
    // dedupe near-identical points
    pts.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.x.partial_cmp(&b.x).unwrap()));

    let pivot = pts[0];
    pts.sort_by(|a, b| {
        let angle_a = (a.y - pivot.y).atan2(a.x - pivot.x);
        let angle_b = (b.y - pivot.y).atan2(b.x - pivot.x);
        angle_a.partial_cmp(&angle_b).unwrap().then(
            pivot
                .distance_to(a)
                .partial_cmp(&pivot.distance_to(b))
                .unwrap(),
        )
    });

    let cross = |o: Point2, a: Point2, b: Point2| -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    };

    let mut hull: Vec<Point2> = Vec::with_capacity(pts.len());
    for p in pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}

/// Rotate `points` about `centre` by `angle_deg`, clockwise-positive
/// (spec's heading convention), returning new points.
pub fn rotate_points(points: &[Point2], centre: Point2, angle_deg: f64) -> Vec<Point2> {
    let theta = -angle_deg.to_radians(); // clockwise-positive -> standard CCW math rotation is negated
    let (s, c) = theta.sin_cos();
    points
        .iter()
        .map(|p| {
            let dx = p.x - centre.x;
            let dy = p.y - centre.y;
            Point2::new(centre.x + dx * c - dy * s, centre.y + dx * s + dy * c)
        })
        .collect()
}

/// Offset a polygon inward (negative `distance`) or outward (positive) by
/// averaging each vertex's two edge normals, with an angle-halving
/// correction so the offset distance is preserved at convex/concave
/// corners (spec \S4.1).
pub fn offset_polygon(vertices: &[Point2], distance: f64) -> Vec<Point2> {
    let n = vertices.len();
    if n < 3 || distance.abs() < EPS_DIRECTION {
        return vertices.to_vec();
    }

    // The normal formula below is derived for CCW winding; flip the sign
    // for CW input so "negative = inward" holds regardless of winding
    // (spec \S3: polygon orientation may be either winding).
    let distance = if shoelace_area(vertices) < 0.0 { -distance } else { distance };

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = vertices[(i + n - 1) % n];
        let cur = vertices[i];
        let next = vertices[(i + 1) % n];

        let e1 = normalize(cur - prev);
        let e2 = normalize(next - cur);

        // outward normal of an edge (x, y) for a CCW polygon is (y, -x)
        let n1 = Point2::new(e1.y, -e1.x);
        let n2 = Point2::new(e2.y, -e2.x);

        let bisector = normalize(n1 + n2);
        // angle between the two edge directions, used to correct the
        // bisector length so the perpendicular offset is exactly `distance`
        let cos_half = ((1.0 + (e1.x * e2.x + e1.y * e2.y)) / 2.0).max(1e-6).sqrt();
        let scale = distance / cos_half;

        out.push(cur + bisector * scale);
    }
    out
}

fn normalize(v: Point2) -> Point2 {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len < EPS_DIRECTION {
        Point2::new(0.0, 0.0)
    } else {
        Point2::new(v.x / len, v.y / len)
    }
}
