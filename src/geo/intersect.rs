//! Segment-segment, segment-circle and segment-polygon intersection.

use super::{LocalPolygon, Point2, EPS_DIRECTION};

const DET_TOLERANCE: f64 = 1e-10;

/// Parametric segment-segment intersection with a determinant-check
/// tolerance of `1e-10` (spec \S4.1). Returns `None` for parallel or
/// non-crossing segments.
pub fn segment_segment_intersect(
    p1: Point2,
    p2: Point2,
    p3: Point2,
    p4: Point2,
) -> Option<Point2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let det = d1.x * d2.y - d1.y * d2.x;
    if det.abs() < DET_TOLERANCE {
        return None; // parallel or collinear
    }

    let diff = p3 - p1;
    let t = (diff.x * d2.y - diff.y * d2.x) / det;
    let u = (diff.x * d1.y - diff.y * d1.x) / det;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point2::new(p1.x + t * d1.x, p1.y + t * d1.y))
    } else {
        None
    }
}

/// Segment-circle intersection, solved as a quadratic in the segment
/// parameter (spec \S4.1). Returns 0, 1 (tangent / clipped) or 2 points,
/// sorted by parametric distance from `p1`.
pub fn segment_circle_intersect(
    p1: Point2,
    p2: Point2,
    centre: Point2,
    radius: f64,
) -> Vec<Point2> {
    let d = p2 - p1;
    let f = p1 - centre;

    let a = d.x * d.x + d.y * d.y;
    if a < EPS_DIRECTION {
        return Vec::new();
    }
    let b = 2.0 * (f.x * d.x + f.y * d.y);
    let c = f.x * f.x + f.y * f.y - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    let mut out = Vec::new();
    for t in [t1, t2] {
        if (0.0..=1.0).contains(&t) {
            out.push(Point2::new(p1.x + t * d.x, p1.y + t * d.y));
        }
    }
    out
}

/// Intersections of a segment against every edge of a polygon: iterates
/// edges, deduplicates results rounded to 6 decimals, and sorts by squared
/// distance from the segment start (spec \S4.1).
pub fn segment_polygon_intersect(p1: Point2, p2: Point2, polygon: &LocalPolygon) -> Vec<Point2> {
    let mut hits: Vec<Point2> = Vec::new();

    for (e1, e2) in polygon.edges() {
        if let Some(pt) = segment_segment_intersect(p1, p2, e1, e2) {
            hits.push(pt);
        }
    }

    // deduplicate rounded to 6 decimals
    let mut seen: Vec<(i64, i64)> = Vec::new();
    hits.retain(|p| {
        let key = ((p.x * 1e6).round() as i64, (p.y * 1e6).round() as i64);
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });

    hits.sort_by(|a, b| {
        let da = (*a - p1).x.powi(2) + (*a - p1).y.powi(2);
        let db = (*b - p1).x.powi(2) + (*b - p1).y.powi(2);
        da.partial_cmp(&db).unwrap()
    });

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_intersect_at_centre() {
        let p = segment_segment_intersect(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 0.0),
        );
        let p = p.expect("segments should cross");
        assert!((p.x - 5.0).abs() < 1e-9);
        assert!((p.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let p = segment_segment_intersect(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 5.0),
            Point2::new(10.0, 5.0),
        );
        assert!(p.is_none());
    }

    #[test]
    fn segment_through_circle_returns_two_points() {
        let hits = segment_circle_intersect(
            Point2::new(-20.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(0.0, 0.0),
            10.0,
        );
        assert_eq!(hits.len(), 2);
        for p in hits {
            assert!((p.x.abs() - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn segment_missing_circle_returns_empty() {
        let hits = segment_circle_intersect(
            Point2::new(-20.0, 50.0),
            Point2::new(20.0, 50.0),
            Point2::new(0.0, 0.0),
            10.0,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn segment_polygon_intersections_sorted_by_distance() {
        let square = LocalPolygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ]);
        let hits = segment_polygon_intersect(Point2::new(-10.0, 50.0), Point2::new(110.0, 50.0), &square);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].x < hits[1].x);
    }
}
