//! Vehicle model (C3): kinematic forward simulation, reachable-velocity
//! sets, path feasibility predicates. Grounded on the teacher's
//! `Drone` profile (`flight_path.rs`) for the data-model shape, and on
//! `examples/original_source/core/vehicles/{multirotor.py,fixed_wing.py}`
//! for the per-kind kinematics.

mod fixed_wing;
mod multirotor;

pub use fixed_wing::FixedWingModel;
pub use multirotor::MultirotorModel;

use crate::error::{PlanningError, PlanningResult};
use crate::geo::Point2;

/// A 3-D local-frame position: ENU metres plus altitude above ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Vehicle state (spec \S3): position, velocity, heading, yaw-rate and
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub position: Position3,
    pub velocity: Position3,
    pub heading_rad: f64,
    pub yaw_rate_rad_s: f64,
    pub timestamp_s: f64,
}

impl VehicleState {
    pub fn speed(&self) -> f64 {
        (self.velocity.x.powi(2) + self.velocity.y.powi(2)).sqrt()
    }
}

/// Vehicle kinematic/physical constraints (spec \S3). Invariant:
/// `max_speed > min_speed`, `max_accel > 0`, `min_turn_radius >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleConstraints {
    pub min_speed_mps: f64,
    pub max_speed_mps: f64,
    pub max_vertical_speed_mps: f64,
    pub max_accel_mps2: f64,
    pub max_decel_mps2: f64,
    pub max_yaw_rate_rad_s: f64,
    pub max_yaw_accel_rad_s2: f64,
    pub min_turn_radius_m: f64,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    pub safety_margin_m: f64,
    pub collision_radius_m: f64,
}

impl VehicleConstraints {
    pub fn validate(&self) -> PlanningResult<()> {
        if self.max_speed_mps <= self.min_speed_mps {
            return Err(PlanningError::InfeasibleConstraint(
                "max_speed must exceed min_speed".into(),
            ));
        }
        if self.max_accel_mps2 <= 0.0 {
            return Err(PlanningError::InfeasibleConstraint(
                "max_accel must be positive".into(),
            ));
        }
        if self.min_turn_radius_m < 0.0 {
            return Err(PlanningError::InfeasibleConstraint(
                "min_turn_radius must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// A multirotor profile: zero min speed and turn radius.
    pub fn multirotor_default() -> Self {
        Self {
            min_speed_mps: 0.0,
            max_speed_mps: 15.0,
            max_vertical_speed_mps: 3.0,
            max_accel_mps2: 2.0,
            max_decel_mps2: 2.0,
            max_yaw_rate_rad_s: std::f64::consts::FRAC_PI_2,
            max_yaw_accel_rad_s2: std::f64::consts::PI,
            min_turn_radius_m: 0.0,
            min_altitude_m: 5.0,
            max_altitude_m: 120.0,
            safety_margin_m: 5.0,
            collision_radius_m: 1.0,
        }
    }

    /// A fixed-wing profile: positive stall speed and turn radius.
    pub fn fixed_wing_default() -> Self {
        Self {
            min_speed_mps: 12.0,
            max_speed_mps: 25.0,
            max_vertical_speed_mps: 5.0,
            max_accel_mps2: 1.5,
            max_decel_mps2: 1.0,
            max_yaw_rate_rad_s: 0.3,
            max_yaw_accel_rad_s2: 0.2,
            min_turn_radius_m: 40.0,
            min_altitude_m: 30.0,
            max_altitude_m: 400.0,
            safety_margin_m: 10.0,
            collision_radius_m: 2.0,
        }
    }
}

/// A single sample out of `reachable_velocities`: a commandable
/// (linear speed, yaw rate) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocitySample {
    pub v: f64,
    pub omega: f64,
}

/// Capability set shared by multirotor and fixed-wing vehicle models
/// (spec \S4.3).
pub trait VehicleModel {
    fn constraints(&self) -> &VehicleConstraints;

    /// Samples the dynamic window at `dt`, clipped by acceleration and
    /// yaw-acceleration limits around `current`.
    fn reachable_velocities(&self, current: VehicleState, dt: f64) -> Vec<VelocitySample>;

    /// Integrates unicycle kinematics for `horizon` seconds at step `dt`
    /// under a fixed `(v, omega)` command, returning the rolled-out
    /// 3-D positions (pose-consistent: heading updates before position).
    fn predict_trajectory(
        &self,
        start: VehicleState,
        sample: VelocitySample,
        dt: f64,
        horizon: f64,
    ) -> Vec<Position3> {
        let steps = (horizon / dt).round().max(1.0) as usize;
        let mut out = Vec::with_capacity(steps);
        let mut x = start.position.x;
        let mut y = start.position.y;
        let mut theta = start.heading_rad;

        for _ in 0..steps {
            theta += sample.omega * dt;
            x += sample.v * theta.cos() * dt;
            y += sample.v * theta.sin() * dt;
            out.push(Position3::new(x, y, start.position.z));
        }
        out
    }

    /// Altitude-bound and climb-rate feasibility of a direct `start -> end`
    /// segment (spec \S4.3).
    fn is_feasible_path(&self, start: Position3, end: Position3, speed_mps: f64) -> bool {
        let c = self.constraints();
        if end.z < c.min_altitude_m || end.z > c.max_altitude_m {
            return false;
        }
        let planar = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
        if speed_mps <= 0.0 {
            return planar < 1e-9 && (end.z - start.z).abs() < 1e-9;
        }
        let time_s = planar / speed_mps;
        if time_s < 1e-9 {
            return (end.z - start.z).abs() < 1e-9;
        }
        let required_vertical = (end.z - start.z).abs() / time_s;
        required_vertical <= c.max_vertical_speed_mps
    }

    /// Inserts decel/accel waypoints either side of a turn vertex when
    /// the exterior angle exceeds the model's sharp-turn threshold.
    fn compute_turn_waypoints(&self, p1: Point2, p2: Point2, p3: Point2) -> Vec<Point2>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraints_validate_rejects_inverted_speed_bounds() {
        let mut c = VehicleConstraints::multirotor_default();
        c.max_speed_mps = c.min_speed_mps;
        assert!(c.validate().is_err());
    }

    #[test]
    fn feasible_path_respects_vertical_speed() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let start = Position3::new(0.0, 0.0, 50.0);
        let fast_ascent = Position3::new(10.0, 0.0, 200.0);
        assert!(!model.is_feasible_path(start, fast_ascent, 5.0));

        let gentle_ascent = Position3::new(1000.0, 0.0, 55.0);
        assert!(model.is_feasible_path(start, gentle_ascent, 5.0));
    }
}
