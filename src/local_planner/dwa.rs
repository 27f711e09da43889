//! Dynamic Window Approach local planner (C7, spec \S4.7). Grounded on
//! `examples/original_source/core/local_planner/dwa.py`'s `DWAConfig`
//! field names/defaults and overall `compute_velocity` structure.

use crate::geo::Point2;
use crate::obstacle::ObstacleIndex;
use crate::vehicle::{VehicleModel, VehicleState, VelocitySample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwaConfig {
    pub predict_time_s: f64,
    pub dt_s: f64,
    pub heading_weight: f64,
    pub velocity_weight: f64,
    pub obstacle_weight: f64,
    pub goal_weight: f64,
    pub path_weight: f64,
    pub obstacle_cost_gain: f64,
    pub goal_distance_threshold_m: f64,
    pub waypoint_lookahead: usize,
}

impl Default for DwaConfig {
    fn default() -> Self {
        Self {
            predict_time_s: 3.0,
            dt_s: 0.1,
            heading_weight: 1.0,
            velocity_weight: 1.0,
            obstacle_weight: 1.0,
            goal_weight: 1.0,
            path_weight: 0.5,
            obstacle_cost_gain: 1.0,
            goal_distance_threshold_m: 0.5,
            waypoint_lookahead: 3,
        }
    }
}

/// Result of a single `compute_velocity` tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DwaCommand {
    pub sample: VelocitySample,
    /// Set when every sampled velocity scored an infinite obstacle cost
    /// (spec \S7 `ObstacleSaturation`): the command is always `(0, 0)` in
    /// this case and the caller must decide whether to stop, replan, or
    /// escalate.
    pub stuck: bool,
}

/// Dynamic Window Approach planner (spec \S4.7). Not re-entrant: a
/// controller calling `compute_velocity` at a fixed rate must serialise
/// calls per vehicle (spec \S5).
pub struct DwaPlanner {
    config: DwaConfig,
    global_path: Vec<Point2>,
    waypoint_index: usize,
    cancelled: bool,
}

impl DwaPlanner {
    pub fn new(config: DwaConfig) -> Self {
        Self { config, global_path: Vec::new(), waypoint_index: 0, cancelled: false }
    }

    pub fn set_global_path(&mut self, path: Vec<Point2>) {
        self.global_path = path;
        self.waypoint_index = 0;
    }

    /// Setting the cancel flag causes the next `compute_velocity` call to
    /// return `(0, 0)` (spec \S4.7).
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn lookahead_goal(&mut self, current_pos: Point2) -> Option<Point2> {
        if self.global_path.is_empty() {
            return None;
        }
        while self.waypoint_index + 1 < self.global_path.len()
            && current_pos.distance_to(&self.global_path[self.waypoint_index])
                < self.config.goal_distance_threshold_m
        {
            self.waypoint_index += 1;
        }
        let target_index = (self.waypoint_index + self.config.waypoint_lookahead)
            .min(self.global_path.len() - 1);
        Some(self.global_path[target_index])
    }

    /// Computes one `(v, omega)` command given `vehicle`'s current
    /// `state` and active `obstacles` (spec \S4.7).
    pub fn compute_velocity(
        &mut self,
        vehicle: &dyn VehicleModel,
        state: VehicleState,
        obstacles: Option<&ObstacleIndex>,
    ) -> DwaCommand {
        if self.cancelled {
            return DwaCommand { sample: VelocitySample { v: 0.0, omega: 0.0 }, stuck: false };
        }

        let Some(goal) = self.lookahead_goal(state.position.xy()) else {
            // Bootstrap with an empty global path: distinct from "on
            // path" (spec \S9 Open Question) via the explicit `None`
            // rather than a cost of zero.
            return DwaCommand { sample: VelocitySample { v: 0.0, omega: 0.0 }, stuck: false };
        };

        let samples = vehicle.reachable_velocities(state, self.config.dt_s);
        let mut best: Option<(f64, VelocitySample)> = None;
        let mut all_saturated = true;

        for sample in samples {
            let rollout = vehicle.predict_trajectory(state, sample, self.config.dt_s, self.config.predict_time_s);
            let obstacle_cost = self.obstacle_cost(&rollout, vehicle.constraints().collision_radius_m, obstacles);
            if obstacle_cost.is_finite() {
                all_saturated = false;
            }

            let Some(terminal) = rollout.last() else { continue };
            let terminal_xy = terminal.xy();

            let heading_cost = heading_error(&rollout, goal);
            let velocity_cost = vehicle.constraints().max_speed_mps - sample.v;
            let goal_cost = terminal_xy.distance_to(&goal);
            let path_cost = mean_path_distance(&rollout, &self.global_path);

            let total = self.config.heading_weight * heading_cost
                + self.config.velocity_weight * velocity_cost
                + self.config.obstacle_weight * obstacle_cost
                + self.config.goal_weight * goal_cost
                + self.config.path_weight * path_cost;

            if best.map(|(best_cost, _)| total < best_cost).unwrap_or(true) {
                best = Some((total, sample));
            }
        }

        if all_saturated {
            return DwaCommand { sample: VelocitySample { v: 0.0, omega: 0.0 }, stuck: true };
        }

        match best {
            Some((_, sample)) => DwaCommand { sample, stuck: false },
            None => DwaCommand { sample: VelocitySample { v: 0.0, omega: 0.0 }, stuck: true },
        }
    }

    fn obstacle_cost(
        &self,
        rollout: &[crate::vehicle::Position3],
        robot_radius_m: f64,
        obstacles: Option<&ObstacleIndex>,
    ) -> f64 {
        let Some(index) = obstacles else { return 0.0 };

        let mut min_clearance = f64::INFINITY;
        for pose in rollout {
            let xy = pose.xy();
            if let Some((_, distance_to_surface)) = index.nearest_obstacle(xy) {
                let clearance = distance_to_surface - robot_radius_m;
                if clearance <= 0.0 {
                    return f64::INFINITY;
                }
                min_clearance = min_clearance.min(clearance);
            }
        }
        if min_clearance.is_finite() {
            self.config.obstacle_cost_gain / min_clearance
        } else {
            0.0
        }
    }
}

fn heading_error(rollout: &[crate::vehicle::Position3], goal: Point2) -> f64 {
    if rollout.len() < 2 {
        return 0.0;
    }
    let terminal = rollout[rollout.len() - 1].xy();
    let prior = rollout[rollout.len() - 2].xy();
    let forward = terminal - prior;
    let to_goal = goal - terminal;

    let forward_len = (forward.x.powi(2) + forward.y.powi(2)).sqrt();
    let goal_len = (to_goal.x.powi(2) + to_goal.y.powi(2)).sqrt();
    if forward_len < 1e-9 || goal_len < 1e-9 {
        return 0.0;
    }
    let cos_angle = ((forward.x * to_goal.x + forward.y * to_goal.y) / (forward_len * goal_len)).clamp(-1.0, 1.0);
    cos_angle.acos().abs()
}

fn mean_path_distance(rollout: &[crate::vehicle::Position3], path: &[Point2]) -> f64 {
    if path.is_empty() || rollout.is_empty() {
        return 0.0;
    }
    let total: f64 = rollout
        .iter()
        .map(|pose| {
            let xy = pose.xy();
            path.iter().map(|p| xy.distance_to(p)).fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / rollout.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{MultirotorModel, Position3, VehicleConstraints};

    fn state_at_origin() -> VehicleState {
        VehicleState {
            position: Position3::new(0.0, 0.0, 0.0),
            velocity: Position3::new(0.0, 0.0, 0.0),
            heading_rad: 0.0,
            yaw_rate_rad_s: 0.0,
            timestamp_s: 0.0,
        }
    }

    #[test]
    fn lane_following_makes_progress_toward_goal() {
        let mut constraints = VehicleConstraints::multirotor_default();
        constraints.max_speed_mps = 2.0;
        let model = MultirotorModel::new(constraints);

        let mut dwa = DwaPlanner::new(DwaConfig::default());
        dwa.set_global_path(vec![Point2::new(30.0, 0.0)]);

        let mut state = state_at_origin();
        for _ in 0..30 {
            let command = dwa.compute_velocity(&model, state, None);
            state = step_state(state, command.sample, 0.1);
        }
        assert!(state.position.xy().distance_to(&Point2::new(6.0, 0.0)) < 1.0);
    }

    #[test]
    fn empty_global_path_returns_zero_command_not_stuck() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let mut dwa = DwaPlanner::new(DwaConfig::default());
        let command = dwa.compute_velocity(&model, state_at_origin(), None);
        assert_eq!(command.sample.v, 0.0);
        assert!(!command.stuck);
    }

    #[test]
    fn cancel_flag_zeros_next_command() {
        let model = MultirotorModel::new(VehicleConstraints::multirotor_default());
        let mut dwa = DwaPlanner::new(DwaConfig::default());
        dwa.set_global_path(vec![Point2::new(30.0, 0.0)]);
        dwa.cancel();
        let command = dwa.compute_velocity(&model, state_at_origin(), None);
        assert_eq!(command.sample.v, 0.0);
        assert_eq!(command.sample.omega, 0.0);
    }

    fn step_state(state: VehicleState, sample: VelocitySample, dt: f64) -> VehicleState {
        let heading = state.heading_rad + sample.omega * dt;
        let x = state.position.x + sample.v * heading.cos() * dt;
        let y = state.position.y + sample.v * heading.sin() * dt;
        VehicleState {
            position: Position3::new(x, y, state.position.z),
            velocity: Position3::new(sample.v * heading.cos(), sample.v * heading.sin(), 0.0),
            heading_rad: heading,
            yaw_rate_rad_s: sample.omega,
            timestamp_s: state.timestamp_s + dt,
        }
    }
}
