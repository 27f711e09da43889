//! Douglas-Peucker polyline simplification.

use super::Point2;

/// Recursive Douglas-Peucker simplification with perpendicular-distance
/// threshold `epsilon` (spec \S4.1, \S4.8). Idempotent:
/// `simplify(simplify(p, e), e) == simplify(p, e)` (spec \S8, invariant 10).
pub fn douglas_peucker(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = *points.last().unwrap();

    let mut max_dist = 0.0;
    let mut max_index = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance(*p, first, last);
        if d > max_dist {
            max_dist = d;
            max_index = i;
        }
    }

    if max_dist > epsilon {
        let mut left = douglas_peucker(&points[..=max_index], epsilon);
        let right = douglas_peucker(&points[max_index..], epsilon);
        left.pop(); // avoid duplicating the shared point
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn perpendicular_distance(p: Point2, line_start: Point2, line_end: Point2) -> f64 {
    let dx = line_end.x - line_start.x;
    let dy = line_end.y - line_start.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-10 {
        return p.distance_to(&line_start);
    }
    ((p.x - line_start.x) * dy - (p.y - line_start.y) * dx).abs() / len
}
