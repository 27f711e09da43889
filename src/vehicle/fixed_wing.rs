//! Fixed-wing vehicle model (spec \S4.3): positive stall speed and
//! bank-limited minimum turn radius, LSL Dubins arcs at turns.
//!
//! Only the LSL (left-straight-left) Dubins path family is implemented;
//! other turn directions fall back to a straight pass through the turn
//! vertex (spec \S1 non-goal: "full Dubins-curve path families... not
//! required by core tests").

use super::{VehicleConstraints, VehicleModel, VehicleState, VelocitySample};
use crate::geo::Point2;

const GRAVITY_MPS2: f64 = 9.80665;
const ARC_SAMPLES: usize = 8;

pub struct FixedWingModel {
    constraints: VehicleConstraints,
    max_bank_deg: f64,
}

impl FixedWingModel {
    pub fn new(constraints: VehicleConstraints, max_bank_deg: f64) -> Self {
        Self { constraints, max_bank_deg }
    }

    /// Bank-limited turn radius at `speed_mps`: `r = v^2 / (g * tan(bank))`
    /// (spec \S4.3), floored by the configured `min_turn_radius_m`.
    pub fn turn_radius_m(&self, speed_mps: f64) -> f64 {
        let bank = self.max_bank_deg.to_radians();
        let dynamic = speed_mps.powi(2) / (GRAVITY_MPS2 * bank.tan());
        dynamic.max(self.constraints.min_turn_radius_m)
    }
}

impl VehicleModel for FixedWingModel {
    fn constraints(&self) -> &VehicleConstraints {
        &self.constraints
    }

    fn reachable_velocities(&self, current: VehicleState, dt: f64) -> Vec<VelocitySample> {
        // Fixed-wing craft cannot hover or reverse; speed stays above
        // stall (min_speed) at all times, and yaw rate is derived from
        // bank angle rather than sampled directly, so the window
        // collapses to a 1-D speed sweep at the vehicle's current turn
        // rate.
        let c = &self.constraints;
        let v_lo = (current.speed() - c.max_decel_mps2 * dt).max(c.min_speed_mps);
        let v_hi = (current.speed() + c.max_accel_mps2 * dt).min(c.max_speed_mps);

        const SAMPLES: usize = 11;
        (0..SAMPLES)
            .map(|i| {
                let t = i as f64 / (SAMPLES - 1) as f64;
                VelocitySample { v: v_lo + (v_hi - v_lo) * t, omega: current.yaw_rate_rad_s }
            })
            .collect()
    }

    fn compute_turn_waypoints(&self, p1: Point2, p2: Point2, p3: Point2) -> Vec<Point2> {
        let in_dir = unit(p2 - p1);
        let out_dir = unit(p3 - p2);
        let cross = in_dir.x * out_dir.y - in_dir.y * out_dir.x;

        // Only left (CCW) turns get the LSL treatment.
        if cross <= 0.0 {
            return vec![p2];
        }

        let radius = self.turn_radius_m(self.constraints.max_speed_mps);
        let entry_heading = in_dir.y.atan2(in_dir.x);
        let exit_heading = out_dir.y.atan2(out_dir.x);

        // Centre of the turn circle is radius to the left of the inbound
        // heading.
        let left_normal = Point2::new(-in_dir.y, in_dir.x);
        let centre = p2 + left_normal * radius;

        let mut sweep = exit_heading - entry_heading;
        while sweep < 0.0 {
            sweep += std::f64::consts::TAU;
        }

        let mut arc = Vec::with_capacity(ARC_SAMPLES);
        let start_angle = (p2 - centre).y.atan2((p2 - centre).x);
        for i in 0..=ARC_SAMPLES {
            let t = i as f64 / ARC_SAMPLES as f64;
            let angle = start_angle + sweep * t;
            arc.push(Point2::new(
                centre.x + radius * angle.cos(),
                centre.y + radius * angle.sin(),
            ));
        }
        arc
    }
}

fn unit(v: Point2) -> Point2 {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len < 1e-10 {
        Point2::new(0.0, 0.0)
    } else {
        Point2::new(v.x / len, v.y / len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_radius_grows_with_speed() {
        let model = FixedWingModel::new(VehicleConstraints::fixed_wing_default(), 30.0);
        assert!(model.turn_radius_m(25.0) > model.turn_radius_m(12.0));
    }

    #[test]
    fn right_turn_falls_back_to_single_waypoint() {
        let model = FixedWingModel::new(VehicleConstraints::fixed_wing_default(), 30.0);
        let wps = model.compute_turn_waypoints(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, -100.0),
        );
        assert_eq!(wps.len(), 1);
    }

    #[test]
    fn left_turn_produces_arc_samples() {
        let model = FixedWingModel::new(VehicleConstraints::fixed_wing_default(), 30.0);
        let wps = model.compute_turn_waypoints(
            Point2::new(0.0, 0.0),
            Point2::new(100.0, 0.0),
            Point2::new(100.0, 100.0),
        );
        assert_eq!(wps.len(), ARC_SAMPLES + 1);
    }
}
