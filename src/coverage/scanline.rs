//! Scanline fill over a rotated, already-projected polygon (spec \S4.5,
//! step 3). Grounded on
//! `examples/original_source/core/global_planner/coverage_planner.py`'s
//! `_generate_scan_lines`/`_find_line_polygon_intersections`, generalised
//! to emit every crossing pair per line (concave polygons) rather than
//! just the outermost two.

use crate::geo::Point2;

/// One sweep-line segment: the ordered pair of x-crossings at a given y,
/// left-to-right in the rotated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSegment {
    pub a: Point2,
    pub b: Point2,
}

/// Generates sweep-line segments across `polygon` (already in the
/// rotated local frame) at `spacing` intervals, starting at
/// `y_min + spacing/2` (spec \S4.5, step 3).
pub fn generate_scan_segments(polygon: &[Point2], spacing: f64) -> Vec<ScanSegment> {
    if polygon.len() < 3 || spacing <= 0.0 {
        return Vec::new();
    }

    let y_min = polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_max = polygon.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    if y_max - y_min < spacing / 2.0 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut y = y_min + spacing / 2.0;
    while y <= y_max {
        let mut crossings = x_crossings_at(polygon, y);
        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let mut i = 0;
        while i + 1 < crossings.len() {
            segments.push(ScanSegment {
                a: Point2::new(crossings[i], y),
                b: Point2::new(crossings[i + 1], y),
            });
            i += 2;
        }
        y += spacing;
    }

    segments
}

/// X-coordinates where the horizontal line `y` crosses the polygon's
/// edges, using a strict/loose tie-break on the two endpoints
/// (`y1 <= y < y2` or `y2 <= y < y1`) to avoid double-counting at shared
/// vertices (spec \S4.5, step 3; resolves the same ambiguity as
/// `point_in_polygon`'s Open Question in spec \S9).
fn x_crossings_at(polygon: &[Point2], y: f64) -> Vec<f64> {
    let n = polygon.len();
    let mut out = Vec::new();
    for i in 0..n {
        let p1 = polygon[i];
        let p2 = polygon[(i + 1) % n];

        let crosses = (p1.y <= y && y < p2.y) || (p2.y <= y && y < p1.y);
        if crosses && (p2.y - p1.y).abs() > 1e-10 {
            let t = (y - p1.y) / (p2.y - p1.y);
            out.push(p1.x + t * (p2.x - p1.x));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ]
    }

    #[test]
    fn unit_square_20m_spacing_yields_five_lines() {
        let segments = generate_scan_segments(&unit_square(), 20.0);
        assert_eq!(segments.len(), 5);
        let ys: Vec<f64> = segments.iter().map(|s| s.a.y).collect();
        assert_eq!(ys, vec![10.0, 30.0, 50.0, 70.0, 90.0]);
        for s in &segments {
            assert!((s.a.x - 0.0).abs() < 1e-9);
            assert!((s.b.x - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn too_small_polygon_yields_no_segments() {
        let tiny = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let segments = generate_scan_segments(&tiny, 20.0);
        assert!(segments.is_empty());
    }

    #[test]
    fn concave_polygon_yields_multiple_segments_per_line() {
        // A "U" shape: two towers joined at the bottom, spanning y in [0,100].
        let u_shape = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 100.0),
            Point2::new(20.0, 100.0),
            Point2::new(20.0, 40.0),
            Point2::new(80.0, 40.0),
            Point2::new(80.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
        ];
        let segments = generate_scan_segments(&u_shape, 20.0);
        let at_y90: Vec<&ScanSegment> = segments.iter().filter(|s| (s.a.y - 90.0).abs() < 1e-9).collect();
        assert_eq!(at_y90.len(), 2);
    }
}
