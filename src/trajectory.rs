//! Trajectory shaper (C8): path smoothing and velocity profiling
//! (spec \S4.8). Smoothing primitives grounded on
//! `examples/original_source/core/trajectory/smoother.py`
//! (`BezierSmoother`) and `spline.py` (B-spline in place of the
//! original's natural cubic spline, generalised to arbitrary degree via
//! Cox-de Boor per the spec); velocity profiling grounded on
//! `time_optimal.py`'s Menger-curvature forward/backward pass.

use crate::geo::{douglas_peucker, Point2};

/// A timestamped waypoint carrying a planned speed (spec \S4.8).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedPoint {
    pub point: Point2,
    pub speed_mps: f64,
}

/// Moving-average smoothing over a 3-point window, endpoints preserved
/// (spec \S4.8a).
pub fn moving_average(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for w in points.windows(3) {
        out.push(Point2::new(
            (w[0].x + w[1].x + w[2].x) / 3.0,
            (w[0].y + w[1].y + w[2].y) / 3.0,
        ));
    }
    out.push(*points.last().unwrap());
    out
}

/// Cubic Bezier curve over all of `control_points` treated as control
/// points for a single degree-`n` Bezier, sampled uniformly in `t`
/// across `num_samples` (spec \S4.8b). Degenerates to a straight line
/// for 2 control points.
pub fn cubic_bezier(control_points: &[Point2], num_samples: usize) -> Vec<Point2> {
    if control_points.len() < 2 || num_samples < 2 {
        return control_points.to_vec();
    }
    let n = control_points.len() - 1;
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / (num_samples - 1) as f64;
            bezier_point(control_points, n, t)
        })
        .collect()
}

fn bezier_point(points: &[Point2], n: usize, t: f64) -> Point2 {
    let mut x = 0.0;
    let mut y = 0.0;
    for (k, p) in points.iter().enumerate() {
        let coeff = binomial(n, k) as f64 * t.powi(k as i32) * (1.0 - t).powi((n - k) as i32);
        x += coeff * p.x;
        y += coeff * p.y;
    }
    Point2::new(x, y)
}

fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let mut result = 1u64;
    for i in 0..k {
        result = result * (n - i) as u64 / (i + 1) as u64;
    }
    result
}

/// Uniform B-spline of degree `k`, evaluated via the Cox-de Boor
/// recursion over a clamped knot vector so the curve passes through the
/// first and last control points (spec \S4.8c).
pub fn uniform_bspline(control_points: &[Point2], degree: usize, num_samples: usize) -> Vec<Point2> {
    let n = control_points.len();
    if n < degree + 1 || num_samples < 2 {
        return control_points.to_vec();
    }

    let knots = clamped_knot_vector(n, degree);
    let domain_lo = knots[degree];
    let domain_hi = knots[n];

    (0..num_samples)
        .map(|i| {
            let u = domain_lo + (domain_hi - domain_lo) * i as f64 / (num_samples - 1) as f64;
            let u = u.min(domain_hi - 1e-9);
            let mut x = 0.0;
            let mut y = 0.0;
            for (j, p) in control_points.iter().enumerate() {
                let basis = cox_de_boor(j, degree, u, &knots);
                x += basis * p.x;
                y += basis * p.y;
            }
            Point2::new(x, y)
        })
        .collect()
}

fn clamped_knot_vector(num_control_points: usize, degree: usize) -> Vec<f64> {
    let n = num_control_points;
    let m = n + degree + 1;
    let mut knots = vec![0.0; m];
    let interior = n.saturating_sub(degree + 1);
    for i in 0..m {
        knots[i] = if i <= degree {
            0.0
        } else if i >= n {
            (interior + 1) as f64
        } else {
            (i - degree) as f64
        };
    }
    knots
}

fn cox_de_boor(i: usize, degree: usize, u: f64, knots: &[f64]) -> f64 {
    if degree == 0 {
        return if knots[i] <= u && u < knots[i + 1] { 1.0 } else { 0.0 };
    }
    let denom_a = knots[i + degree] - knots[i];
    let term_a = if denom_a.abs() > 1e-12 {
        (u - knots[i]) / denom_a * cox_de_boor(i, degree - 1, u, knots)
    } else {
        0.0
    };
    let denom_b = knots[i + degree + 1] - knots[i + 1];
    let term_b = if denom_b.abs() > 1e-12 {
        (knots[i + degree + 1] - u) / denom_b * cox_de_boor(i + 1, degree - 1, u, knots)
    } else {
        0.0
    };
    term_a + term_b
}

/// Reduces point count via Douglas-Peucker (spec \S4.8).
pub fn simplify(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    douglas_peucker(points, epsilon)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityProfileConfig {
    pub max_speed_mps: f64,
    pub max_accel_mps2: f64,
    pub max_decel_mps2: f64,
}

/// Assigns a speed to each point of `path` via curvature-limited
/// forward/backward trapezoidal passes (spec \S4.8).
pub fn velocity_profile(
    path: &[Point2],
    config: VelocityProfileConfig,
    initial_speed_mps: f64,
    final_speed_mps: f64,
) -> Vec<TimedPoint> {
    if path.len() < 2 {
        return path.iter().map(|p| TimedPoint { point: *p, speed_mps: 0.0 }).collect();
    }

    let distances: Vec<f64> = path.windows(2).map(|w| w[0].distance_to(&w[1])).collect();
    let curvature_caps = curvature_speed_caps(path, config.max_speed_mps, config.max_accel_mps2);

    let mut forward = vec![initial_speed_mps];
    for i in 1..path.len() {
        let d = distances[i - 1];
        let v_sq = forward[i - 1].powi(2) + 2.0 * config.max_accel_mps2 * d;
        forward.push(v_sq.max(0.0).sqrt().min(curvature_caps[i]));
    }

    let mut backward = vec![final_speed_mps; path.len()];
    for i in (0..path.len() - 1).rev() {
        let d = distances[i];
        let v_sq = backward[i + 1].powi(2) + 2.0 * config.max_decel_mps2 * d;
        backward[i] = v_sq.max(0.0).sqrt().min(curvature_caps[i]);
    }

    path.iter()
        .zip(forward.iter().zip(backward.iter()))
        .map(|(p, (vf, vb))| TimedPoint { point: *p, speed_mps: vf.min(*vb) })
        .collect()
}

/// Curvature-limited speed cap per point via the Menger radius of each
/// consecutive triple: `v_max = sqrt(a_max / curvature)`.
fn curvature_speed_caps(path: &[Point2], max_speed: f64, max_accel: f64) -> Vec<f64> {
    let n = path.len();
    let mut caps = vec![max_speed; n];
    for i in 1..n.saturating_sub(1) {
        let (p1, p2, p3) = (path[i - 1], path[i], path[i + 1]);
        let a = p1.distance_to(&p2);
        let b = p2.distance_to(&p3);
        let c = p1.distance_to(&p3);
        if a > 1e-6 && b > 1e-6 && c > 1e-6 {
            let s = (a + b + c) / 2.0;
            let area = (s * (s - a) * (s - b) * (s - c)).max(0.0).sqrt();
            let curvature = if area > 1e-6 { 4.0 * area / (a * b * c) } else { 0.0 };
            if curvature > 1e-6 {
                caps[i] = (max_accel / curvature).sqrt().min(max_speed);
            }
        }
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn moving_average_preserves_endpoints() {
        let path = vec![Point2::new(0.0, 0.0), Point2::new(5.0, 5.0), Point2::new(10.0, 0.0), Point2::new(15.0, 5.0)];
        let smoothed = moving_average(&path);
        assert_eq!(smoothed.first(), path.first());
        assert_eq!(smoothed.last(), path.last());
    }

    #[test]
    fn cubic_bezier_starts_and_ends_at_control_points() {
        let controls = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(15.0, 0.0),
        ];
        let curve = cubic_bezier(&controls, 20);
        assert_relative_eq!(curve[0].x, controls[0].x, epsilon = 1e-9);
        assert_relative_eq!(curve.last().unwrap().x, controls[3].x, epsilon = 1e-6);
    }

    #[test]
    fn bspline_passes_through_first_and_last_control_points() {
        let controls = vec![
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 5.0),
            Point2::new(10.0, 0.0),
            Point2::new(15.0, 5.0),
            Point2::new(20.0, 0.0),
        ];
        let curve = uniform_bspline(&controls, 3, 30);
        assert_relative_eq!(curve[0].x, controls[0].x, epsilon = 1e-6);
        assert_relative_eq!(curve[0].y, controls[0].y, epsilon = 1e-6);
    }

    #[test]
    fn velocity_profile_slows_for_sharp_turn() {
        let path = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 1.0),
            Point2::new(20.0, 1.0),
        ];
        let config = VelocityProfileConfig { max_speed_mps: 10.0, max_accel_mps2: 2.0, max_decel_mps2: 2.0 };
        let profile = velocity_profile(&path, config, 0.0, 0.0);
        assert!(profile[2].speed_mps < config.max_speed_mps);
    }

    #[test]
    fn simplify_reuses_douglas_peucker() {
        let path = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(simplify(&path, 0.1).len(), 2);
    }
}
