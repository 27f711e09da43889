//! Swarm coordinator (C9): region partition, conflict resolution,
//! altitude stratification and loiter-delay computation (spec \S4.9).
//! Grounded on the teacher's `CoverageRect`-per-drone split idea
//! (`flight_path.rs`'s `CoverageRect`), generalised to the spec's
//! bilinear-strip / 2x2 / horizontal-band partition rules.

use crate::error::{PlanningError, PlanningResult};
use crate::geo::{bounding_box, shoelace_area, BoundingBox, Point2};

const MIN_INTER_VEHICLE_BUFFER_S: f64 = 2.0;

/// Partitions `polygon` among `n` vehicles (spec \S4.9). `gap_fraction`
/// is an inter-strip/band gap expressed as a fraction of the
/// partitioned axis's extent. `N = 1` or a degenerate polygon (`< 3`
/// vertices) returns the original polygon unchanged.
pub fn partition_polygon(polygon: &[Point2], n: usize, gap_fraction: f64) -> Vec<Vec<Point2>> {
    if n <= 1 || polygon.len() < 3 {
        return vec![polygon.to_vec()];
    }

    if polygon.len() == 4 {
        if n == 4 {
            return split_quad_2x2(polygon, gap_fraction);
        }
        if n == 2 || n == 3 {
            return split_quad_strips(polygon, n, gap_fraction);
        }
    }

    horizontal_bands(polygon, n, gap_fraction)
}

/// Vertical strips of a quadrilateral (vertex order: top-left,
/// top-right, bottom-right, bottom-left) via bilinear interpolation on
/// the four corners (spec \S4.9, `N in {2,3}`).
fn split_quad_strips(quad: &[Point2], n: usize, gap_fraction: f64) -> Vec<Vec<Point2>> {
    let (tl, tr, br, bl) = (quad[0], quad[1], quad[2], quad[3]);
    let gap = gap_fraction / n as f64;

    (0..n)
        .map(|i| {
            let u0 = i as f64 / n as f64 + gap / 2.0;
            let u1 = (i + 1) as f64 / n as f64 - gap / 2.0;
            vec![lerp(tl, tr, u0), lerp(tl, tr, u1), lerp(bl, br, u1), lerp(bl, br, u0)]
        })
        .collect()
}

/// 2x2 split of a quadrilateral (spec \S4.9, `N = 4`).
fn split_quad_2x2(quad: &[Point2], gap_fraction: f64) -> Vec<Vec<Point2>> {
    let (tl, tr, br, bl) = (quad[0], quad[1], quad[2], quad[3]);
    let gap = gap_fraction / 2.0;
    let u_mid_lo = 0.5 - gap / 2.0;
    let u_mid_hi = 0.5 + gap / 2.0;

    // Left/right edges at u=0 / u=1, and the midline at u=0.5, each
    // split top/bottom the same way.
    let left_top = tl;
    let left_bottom = bl;
    let right_top = tr;
    let right_bottom = br;
    let mid_top_lo = lerp(tl, tr, u_mid_lo);
    let mid_top_hi = lerp(tl, tr, u_mid_hi);
    let mid_bottom_lo = lerp(bl, br, u_mid_lo);
    let mid_bottom_hi = lerp(bl, br, u_mid_hi);

    let v_mid_lo = 0.5 - gap / 2.0;
    let v_mid_hi = 0.5 + gap / 2.0;

    vec![
        // top-left quadrant
        vec![left_top, mid_top_lo, lerp(mid_top_lo, mid_bottom_lo, v_mid_lo), lerp(left_top, left_bottom, v_mid_lo)],
        // top-right quadrant
        vec![mid_top_hi, right_top, lerp(right_top, right_bottom, v_mid_lo), lerp(mid_top_hi, mid_bottom_hi, v_mid_lo)],
        // bottom-right quadrant
        vec![lerp(mid_top_hi, mid_bottom_hi, v_mid_hi), lerp(right_top, right_bottom, v_mid_hi), right_bottom, mid_bottom_hi],
        // bottom-left quadrant
        vec![lerp(left_top, left_bottom, v_mid_hi), lerp(mid_top_lo, mid_bottom_lo, v_mid_hi), mid_bottom_lo, left_bottom],
    ]
}

/// Horizontal bands of equal height (minus gap) within the polygon's
/// bounding box — the spec's fallback for non-quadrilateral inputs
/// (spec \S4.9).
fn horizontal_bands(polygon: &[Point2], n: usize, gap_fraction: f64) -> Vec<Vec<Point2>> {
    let Some(bbox) = bounding_box(polygon) else { return vec![polygon.to_vec()] };
    let height = bbox.height();
    let gap = gap_fraction * height / n as f64;

    (0..n)
        .map(|i| {
            let y0 = bbox.min.y + i as f64 * height / n as f64 + gap / 2.0;
            let y1 = bbox.min.y + (i + 1) as f64 * height / n as f64 - gap / 2.0;
            vec![
                Point2::new(bbox.min.x, y0),
                Point2::new(bbox.max.x, y0),
                Point2::new(bbox.max.x, y1),
                Point2::new(bbox.min.x, y1),
            ]
        })
        .collect()
}

fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    Point2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Per-vehicle takeoff delay for the *sequential* conflict-resolution
/// strategy (spec \S4.9): `delay[0] = 0`; each subsequent vehicle waits
/// until its predecessor has cleared `safety_distance_m` from the point
/// it is converging on, plus a fixed inter-vehicle buffer.
pub fn compute_sequential_delays(
    time_to_first_waypoint_s: &[f64],
    speeds_mps: &[f64],
    safety_distance_m: f64,
) -> Vec<f64> {
    let n = time_to_first_waypoint_s.len();
    let mut delays = vec![0.0; n];
    for i in 1..n {
        let prev_speed = speeds_mps[i - 1].max(1e-6);
        let clearance_time = safety_distance_m / prev_speed;
        let prev_arrival = delays[i - 1] + time_to_first_waypoint_s[i - 1];
        let required_arrival = prev_arrival + clearance_time + MIN_INTER_VEHICLE_BUFFER_S;
        delays[i] = (required_arrival - time_to_first_waypoint_s[i]).max(0.0);
    }
    delays
}

/// Validates the *simultaneous* conflict-resolution strategy: no pair of
/// per-vehicle bounding boxes may overlap (spec \S4.9).
pub fn validate_simultaneous(vehicle_bboxes: &[BoundingBox]) -> PlanningResult<()> {
    let mut conflicts = Vec::new();
    for i in 0..vehicle_bboxes.len() {
        for j in (i + 1)..vehicle_bboxes.len() {
            if vehicle_bboxes[i].overlaps(&vehicle_bboxes[j]) {
                conflicts.push((i, j));
            }
        }
    }
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(PlanningError::SpatialConflict { pairs: conflicts })
    }
}

/// RTL altitudes stratified so the last-returning vehicle is lowest:
/// `base + (n - i - 1) * increment` (spec \S4.9).
pub fn stratify_rtl_altitudes(base_m: f64, n: usize, increment_m: f64) -> Vec<f64> {
    (0..n).map(|i| base_m + (n - i - 1) as f64 * increment_m).collect()
}

/// Sum of sub-region areas for invariant checking (spec \S8, invariant
/// 8: `sum(area(subregion_i)) == area(region) - area(gaps)`).
pub fn total_partition_area(partitions: &[Vec<Point2>]) -> f64 {
    partitions.iter().map(|p| shoelace_area(p).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 100.0),
            Point2::new(100.0, 100.0),
            Point2::new(100.0, 0.0),
            Point2::new(0.0, 0.0),
        ]
    }

    #[test]
    fn single_vehicle_returns_original_polygon() {
        let parts = partition_polygon(&unit_square(), 1, 0.0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0], unit_square());
    }

    #[test]
    fn two_way_split_preserves_area_with_no_gap() {
        let parts = partition_polygon(&unit_square(), 2, 0.0);
        assert_eq!(parts.len(), 2);
        let total = total_partition_area(&parts);
        assert!((total - shoelace_area(&unit_square()).abs()).abs() < 1e-6);
    }

    #[test]
    fn four_way_split_has_no_pairwise_bbox_overlap() {
        let parts = partition_polygon(&unit_square(), 4, 0.05);
        assert_eq!(parts.len(), 4);
        let bboxes: Vec<BoundingBox> = parts.iter().map(|p| bounding_box(p).unwrap()).collect();
        assert!(validate_simultaneous(&bboxes).is_ok());
    }

    #[test]
    fn sequential_delays_are_monotonic_and_zero_for_lead_vehicle() {
        let delays = compute_sequential_delays(&[10.0, 10.0, 10.0], &[5.0, 5.0, 5.0], 5.0);
        assert_eq!(delays[0], 0.0);
        assert!(delays[1] > 0.0);
        assert!(delays[2] > delays[1]);
    }

    #[test]
    fn altitude_stratification_lowers_later_returning_vehicles() {
        let altitudes = stratify_rtl_altitudes(100.0, 3, 3.0);
        assert_eq!(altitudes, vec![106.0, 103.0, 100.0]);
    }
}
