//! Multirotor vehicle model (spec \S4.3): omnidirectional hover-capable
//! craft with zero minimum speed and turn radius.

use super::{VehicleConstraints, VehicleModel, VehicleState, VelocitySample};
use crate::geo::Point2;

/// Default dynamic-window sample counts and resolutions (spec \S4.3:
/// "defaults 0.1 m/s, 5°/s; 21×21 samples").
const SPEED_SAMPLES: usize = 21;
const YAW_SAMPLES: usize = 21;
const SPEED_RESOLUTION_MPS: f64 = 0.1;
const YAW_RESOLUTION_RAD: f64 = 5.0_f64.to_radians();

/// Exterior-angle threshold above which a turn gets dedicated decel/accel
/// waypoints (spec \S4.3).
const SHARP_TURN_THRESHOLD_DEG: f64 = 60.0;
const TURN_OFFSET_M: f64 = 2.0;

pub struct MultirotorModel {
    constraints: VehicleConstraints,
}

impl MultirotorModel {
    pub fn new(constraints: VehicleConstraints) -> Self {
        Self { constraints }
    }
}

impl VehicleModel for MultirotorModel {
    fn constraints(&self) -> &VehicleConstraints {
        &self.constraints
    }

    fn reachable_velocities(&self, current: VehicleState, dt: f64) -> Vec<VelocitySample> {
        let c = &self.constraints;
        let current_speed = current.speed();

        let accel_lo = (current_speed - c.max_decel_mps2 * dt).max(c.min_speed_mps);
        let accel_hi = (current_speed + c.max_accel_mps2 * dt).min(c.max_speed_mps);
        let v_lo = accel_lo.max(current_speed - SPEED_RESOLUTION_MPS * (SPEED_SAMPLES as f64 / 2.0));
        let v_hi = accel_hi.min(current_speed + SPEED_RESOLUTION_MPS * (SPEED_SAMPLES as f64 / 2.0));

        let yaw_lo = (current.yaw_rate_rad_s - c.max_yaw_accel_rad_s2 * dt).max(-c.max_yaw_rate_rad_s);
        let yaw_hi = (current.yaw_rate_rad_s + c.max_yaw_accel_rad_s2 * dt).min(c.max_yaw_rate_rad_s);

        let mut out = Vec::with_capacity(SPEED_SAMPLES * YAW_SAMPLES);
        for i in 0..SPEED_SAMPLES {
            let v = lerp(v_lo, v_hi, i as f64 / (SPEED_SAMPLES - 1).max(1) as f64);
            for j in 0..YAW_SAMPLES {
                let omega = lerp(yaw_lo, yaw_hi, j as f64 / (YAW_SAMPLES - 1).max(1) as f64);
                out.push(VelocitySample { v, omega });
            }
        }
        let _ = YAW_RESOLUTION_RAD; // documents the nominal resolution the sample bounds approximate
        out
    }

    fn compute_turn_waypoints(&self, p1: Point2, p2: Point2, p3: Point2) -> Vec<Point2> {
        let exterior_deg = exterior_angle_deg(p1, p2, p3);
        if exterior_deg <= SHARP_TURN_THRESHOLD_DEG {
            return vec![p2];
        }

        let in_dir = unit(p2 - p1);
        let out_dir = unit(p3 - p2);
        let decel = p2 - in_dir * TURN_OFFSET_M;
        let accel = p2 + out_dir * TURN_OFFSET_M;
        vec![decel, p2, accel]
    }
}

fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    lo + (hi - lo) * t
}

fn unit(v: Point2) -> Point2 {
    let len = (v.x * v.x + v.y * v.y).sqrt();
    if len < 1e-10 {
        Point2::new(0.0, 0.0)
    } else {
        Point2::new(v.x / len, v.y / len)
    }
}

/// Exterior angle at `p2` of the path `p1 -> p2 -> p3`, in degrees.
fn exterior_angle_deg(p1: Point2, p2: Point2, p3: Point2) -> f64 {
    let in_dir = unit(p2 - p1);
    let out_dir = unit(p3 - p2);
    let dot = (in_dir.x * out_dir.x + in_dir.y * out_dir.y).clamp(-1.0, 1.0);
    dot.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Position3;

    fn state_at_rest() -> VehicleState {
        VehicleState {
            position: Position3::new(0.0, 0.0, 50.0),
            velocity: Position3::new(0.0, 0.0, 0.0),
            heading_rad: 0.0,
            yaw_rate_rad_s: 0.0,
            timestamp_s: 0.0,
        }
    }

    #[test]
    fn reachable_velocities_respect_max_speed() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let samples = model.reachable_velocities(state_at_rest(), 0.1);
        assert_eq!(samples.len(), SPEED_SAMPLES * YAW_SAMPLES);
        for s in &samples {
            assert!(s.v <= model.constraints().max_speed_mps + 1e-9);
            assert!(s.v >= model.constraints().min_speed_mps - 1e-9);
        }
    }

    #[test]
    fn gentle_turn_keeps_single_waypoint() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let wps = model.compute_turn_waypoints(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 1.0),
        );
        assert_eq!(wps.len(), 1);
    }

    #[test]
    fn sharp_turn_inserts_decel_accel_points() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let wps = model.compute_turn_waypoints(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        );
        assert_eq!(wps.len(), 3);
    }
}
