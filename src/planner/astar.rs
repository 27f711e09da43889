//! A* global planner (C6): priority-queue search over a step-quantised
//! 2-D lattice with pluggable heuristic (spec \S4.6). The lazy-deletion
//! min-heap, `FloatOrd` ordering wrapper and `Reverse`-free `Ord`-on-cost
//! node struct are grounded on the other_examples `route_engine.rs`
//! A*-over-lanes implementation, generalised from a fixed lane grid to
//! free 8-connected + direct-to-goal movement.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

use crate::error::{PlanningError, PlanningResult};
use crate::geo::{point_in_polygon, Point2};
use crate::obstacle::ObstacleIndex;

/// Pluggable heuristic (spec \S4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Euclidean,
    Manhattan,
    Chebyshev,
    Diagonal,
}

impl Heuristic {
    fn estimate(&self, a: Point2, b: Point2) -> f64 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        match self {
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Manhattan => dx + dy,
            Heuristic::Chebyshev => dx.max(dy),
            Heuristic::Diagonal => 2.0_f64.sqrt() * dx.min(dy) + (dx - dy).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AStarConfig {
    pub step_size_m: f64,
    pub heuristic: Heuristic,
    /// Heuristic weight: `>= 1` is weighted-A* (faster, possibly
    /// suboptimal); `= 1` is standard A*; `< 1` approaches Dijkstra.
    /// Use `0.0` to run Dijkstra exactly (spec \S4 supplement).
    pub heuristic_weight: f64,
    pub goal_tolerance_m: f64,
    pub max_iterations: usize,
    pub timeout: Duration,
}

impl Default for AStarConfig {
    fn default() -> Self {
        Self {
            step_size_m: 5.0,
            heuristic: Heuristic::Euclidean,
            heuristic_weight: 1.0,
            goal_tolerance_m: 1.0,
            max_iterations: 10_000,
            timeout: Duration::from_secs(30),
        }
    }
}

impl AStarConfig {
    /// Dijkstra as a degenerate case of A*: the heuristic weight is
    /// forced to zero so `f = g` (spec \S4 supplement — the original's
    /// separate Dijkstra module is exposed this way instead of a second
    /// search loop).
    pub fn dijkstra(step_size_m: f64) -> Self {
        Self { heuristic_weight: 0.0, ..Self::default().with_step(step_size_m) }
    }

    fn with_step(mut self, step_size_m: f64) -> Self {
        self.step_size_m = step_size_m;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for FloatOrd {}
impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type CellKey = (i64, i64);

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    key: CellKey,
    position: Point2,
    g: FloatOrd,
    f: FloatOrd,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.f == other.f
    }
}
impl Eq for OpenNode {}
impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the lowest f_score pops first.
        other.f.cmp(&self.f).then_with(|| other.g.cmp(&self.g))
    }
}

fn cell_key(p: Point2, step: f64) -> CellKey {
    ((p.x / step).round() as i64, (p.y / step).round() as i64)
}

/// A* search over the local plane (spec \S4.6).
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    fn is_valid(&self, p: Point2, boundary: Option<&[Point2]>, obstacles: Option<&ObstacleIndex>) -> bool {
        if let Some(boundary) = boundary {
            if !point_in_polygon(p, boundary) {
                return false;
            }
        }
        if let Some(index) = obstacles {
            if index.point_in_obstacle(p) {
                return false;
            }
        }
        true
    }

    fn neighbours(&self, p: Point2, goal: Point2) -> Vec<Point2> {
        let step = self.config.step_size_m;
        let mut out = Vec::with_capacity(9);
        for k in 0..8 {
            let angle = (k as f64) * std::f64::consts::FRAC_PI_4;
            out.push(Point2::new(p.x + step * angle.cos(), p.y + step * angle.sin()));
        }
        let to_goal = goal - p;
        let dist = (to_goal.x * to_goal.x + to_goal.y * to_goal.y).sqrt();
        if dist > 1e-9 {
            let unit = Point2::new(to_goal.x / dist, to_goal.y / dist);
            out.push(p + unit * step);
        }
        out
    }

    /// Runs the search from `start` to `goal`, optionally constrained to
    /// `boundary` and validated against `obstacles`. `cancel`, if
    /// supplied, is polled every outer iteration (spec \S5).
    pub fn plan(
        &self,
        start: Point2,
        goal: Point2,
        boundary: Option<&[Point2]>,
        obstacles: Option<&ObstacleIndex>,
    ) -> PlanningResult<Vec<Point2>> {
        self.plan_cancellable(start, goal, boundary, obstacles, None)
    }

    pub fn plan_cancellable(
        &self,
        start: Point2,
        goal: Point2,
        boundary: Option<&[Point2]>,
        obstacles: Option<&ObstacleIndex>,
        cancel: Option<&AtomicBool>,
    ) -> PlanningResult<Vec<Point2>> {
        let started_at = Instant::now();
        let step = self.config.step_size_m;

        let mut open = BinaryHeap::new();
        let mut best_g: HashMap<CellKey, f64> = HashMap::new();
        let mut came_from: HashMap<CellKey, (CellKey, Point2)> = HashMap::new();
        let mut closed: HashSet<CellKey> = HashSet::new();

        let start_key = cell_key(start, step);
        best_g.insert(start_key, 0.0);
        open.push(OpenNode {
            key: start_key,
            position: start,
            g: FloatOrd(0.0),
            f: FloatOrd(self.config.heuristic.estimate(start, goal) * self.config.heuristic_weight),
        });

        let mut iterations = 0usize;

        while let Some(current) = open.pop() {
            if let Some(flag) = cancel {
                if flag.load(AtomicOrdering::Relaxed) {
                    return Err(PlanningError::Cancelled { elapsed_secs: started_at.elapsed().as_secs_f64() });
                }
            }
            if started_at.elapsed() > self.config.timeout {
                return Err(PlanningError::Timeout { elapsed_secs: started_at.elapsed().as_secs_f64() });
            }
            iterations += 1;
            if iterations > self.config.max_iterations {
                return Err(PlanningError::NoPathFound {
                    iterations,
                    elapsed_secs: started_at.elapsed().as_secs_f64(),
                });
            }

            // Lazy deletion: skip stale heap entries superseded by a better g.
            if let Some(&recorded_g) = best_g.get(&current.key) {
                if current.g.0 > recorded_g + 1e-9 {
                    continue;
                }
            }
            if closed.contains(&current.key) {
                continue;
            }
            closed.insert(current.key);

            if current.position.distance_to(&goal) <= step.max(self.config.goal_tolerance_m) {
                return Ok(reconstruct_path(&came_from, current.key, current.position, start));
            }

            for next_pos in self.neighbours(current.position, goal) {
                if !self.is_valid(next_pos, boundary, obstacles) {
                    continue;
                }
                let next_key = cell_key(next_pos, step);
                if closed.contains(&next_key) {
                    continue;
                }
                let tentative_g = current.g.0 + current.position.distance_to(&next_pos);
                let improves = best_g.get(&next_key).map(|&g| tentative_g < g - 1e-9).unwrap_or(true);
                if improves {
                    best_g.insert(next_key, tentative_g);
                    came_from.insert(next_key, (current.key, current.position));
                    let f = tentative_g + self.config.heuristic.estimate(next_pos, goal) * self.config.heuristic_weight;
                    open.push(OpenNode { key: next_key, position: next_pos, g: FloatOrd(tentative_g), f: FloatOrd(f) });
                }
            }
        }

        Err(PlanningError::NoPathFound { iterations, elapsed_secs: started_at.elapsed().as_secs_f64() })
    }
}

fn reconstruct_path(
    came_from: &HashMap<CellKey, (CellKey, Point2)>,
    mut key: CellKey,
    position: Point2,
    start: Point2,
) -> Vec<Point2> {
    let mut path = vec![position];
    while let Some(&(prev_key, prev_pos)) = came_from.get(&key) {
        path.push(prev_pos);
        key = prev_key;
    }
    path.push(start);
    path.reverse();
    path
}
