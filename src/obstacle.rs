//! Obstacle index (C2): circular & polygonal obstacles with uniform-grid
//! spatial lookup supporting point, segment, and region queries.
//!
//! Design note: obstacles are projected to the index's local ENU frame
//! once at insertion time (rather than re-deriving a cos(lat) scaling
//! factor on every query), so the grid cells are plain metre squares. This
//! keeps the hot query path exact and allocation-free without the
//! per-query floating-point drift that re-deriving the scaling factor
//! from lat/lon would introduce; C5's "project once, work in metres"
//! approach is the same move.

use std::collections::{HashMap, HashSet};

use crate::geo::{
    bounding_box, point_in_polygon, project, BoundingBox, GeoPoint, LocalPolygon, Point2,
    ProjectionOrigin,
};

pub const DEFAULT_CELL_SIZE_M: f64 = 100.0;

/// An obstacle variant (spec \S3).
#[derive(Debug, Clone)]
pub enum ObstacleShape {
    Circular { centre: GeoPoint, radius_m: f64, margin_m: f64 },
    Polygonal { vertices: Vec<GeoPoint>, margin_m: f64 },
}

impl ObstacleShape {
    pub fn effective_radius(&self) -> Option<f64> {
        match self {
            ObstacleShape::Circular { radius_m, margin_m, .. } => Some(radius_m + margin_m),
            ObstacleShape::Polygonal { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: String,
    pub shape: ObstacleShape,
    pub active: bool,
    pub metadata: HashMap<String, String>,
}

/// Local-frame cached geometry used for fast queries.
#[derive(Debug, Clone)]
enum LocalShape {
    Circle { centre: Point2, radius: f64 },
    Polygon(LocalPolygon),
}

struct IndexedObstacle {
    obstacle: Obstacle,
    local: LocalShape,
    bbox: BoundingBox,
}

#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub total: usize,
    pub circular: usize,
    pub polygonal: usize,
    pub active: usize,
    pub cells_used: usize,
}

type CellKey = (i64, i64);

/// Uniform-grid spatial index over obstacles (spec \S4.2).
pub struct ObstacleIndex {
    origin: ProjectionOrigin,
    cell_size_m: f64,
    next_auto_id: u64,
    obstacles: HashMap<String, IndexedObstacle>,
    grid: HashMap<CellKey, HashSet<String>>,
}

impl ObstacleIndex {
    pub fn new(origin: ProjectionOrigin) -> Self {
        Self::with_cell_size(origin, DEFAULT_CELL_SIZE_M)
    }

    pub fn with_cell_size(origin: ProjectionOrigin, cell_size_m: f64) -> Self {
        Self {
            origin,
            cell_size_m,
            next_auto_id: 0,
            obstacles: HashMap::new(),
            grid: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Adds an obstacle, auto-assigning an id if `id` is empty. Returns
    /// the id actually used.
    pub fn add(&mut self, mut obstacle: Obstacle) -> String {
        if obstacle.id.is_empty() {
            obstacle.id = format!("obstacle-{}", self.next_auto_id);
            self.next_auto_id += 1;
        }
        let id = obstacle.id.clone();

        let local = self.project_shape(&obstacle.shape);
        let bbox = local_bbox(&local);

        for cell in cells_covering(&bbox, self.cell_size_m) {
            self.grid.entry(cell).or_default().insert(id.clone());
        }

        self.obstacles.insert(id.clone(), IndexedObstacle { obstacle, local, bbox });
        id
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if let Some(entry) = self.obstacles.remove(id) {
            for cell in cells_covering(&entry.bbox, self.cell_size_m) {
                if let Some(set) = self.grid.get_mut(&cell) {
                    set.remove(id);
                    if set.is_empty() {
                        self.grid.remove(&cell);
                    }
                }
            }
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.grid.clear();
    }

    pub fn set_active(&mut self, id: &str, active: bool) -> bool {
        if let Some(entry) = self.obstacles.get_mut(id) {
            entry.obstacle.active = active;
            true
        } else {
            false
        }
    }

    fn project_shape(&self, shape: &ObstacleShape) -> LocalShape {
        match shape {
            ObstacleShape::Circular { centre, radius_m, margin_m } => LocalShape::Circle {
                centre: project(*centre, self.origin),
                radius: radius_m + margin_m,
            },
            ObstacleShape::Polygonal { vertices, margin_m } => {
                let local_vertices: Vec<Point2> =
                    vertices.iter().map(|v| project(*v, self.origin)).collect();
                let offset = if margin_m.abs() > 1e-9 {
                    crate::geo::offset_polygon(&local_vertices, *margin_m)
                } else {
                    local_vertices
                };
                LocalShape::Polygon(LocalPolygon::new(offset))
            }
        }
    }

    fn candidate_ids(&self, cell: CellKey) -> HashSet<String> {
        let mut out = HashSet::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cell.0 + dx, cell.1 + dy)) {
                    out.extend(ids.iter().cloned());
                }
            }
        }
        out
    }

    fn cell_of(&self, p: Point2) -> CellKey {
        cell_index(p, self.cell_size_m)
    }

    /// True if `point` (local frame) lies within any active obstacle's
    /// effective geometry.
    pub fn point_in_obstacle(&self, point: Point2) -> bool {
        let cell = self.cell_of(point);
        for id in self.candidate_ids(cell) {
            let entry = &self.obstacles[&id];
            if !entry.obstacle.active {
                continue;
            }
            if shape_contains(&entry.local, point) {
                return true;
            }
        }
        false
    }

    /// True if segment `(a, b)` (local frame) intersects any active
    /// obstacle. Approximate for segments spanning multiple cells: only
    /// the endpoint cell neighbourhoods are consulted (spec \S4.2 —
    /// callers needing exact results must sample intermediate points).
    pub fn segment_intersects_obstacle(&self, a: Point2, b: Point2) -> bool {
        let mut candidates = self.candidate_ids(self.cell_of(a));
        candidates.extend(self.candidate_ids(self.cell_of(b)));

        for id in candidates {
            let entry = &self.obstacles[&id];
            if !entry.obstacle.active {
                continue;
            }
            if shape_intersects_segment(&entry.local, a, b) {
                return true;
            }
        }
        false
    }

    /// True if the axis-aligned region overlaps any active obstacle's
    /// bounding box.
    pub fn region_overlaps_obstacle(&self, region: BoundingBox) -> bool {
        for cell in cells_covering(&region, self.cell_size_m) {
            if let Some(ids) = self.grid.get(&cell) {
                for id in ids {
                    let entry = &self.obstacles[id];
                    if entry.obstacle.active && entry.bbox.overlaps(&region) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Obstacles whose bounding box overlaps `region`.
    pub fn obstacles_in_region(&self, region: BoundingBox) -> Vec<&Obstacle> {
        let mut ids = HashSet::new();
        for cell in cells_covering(&region, self.cell_size_m) {
            if let Some(cell_ids) = self.grid.get(&cell) {
                ids.extend(cell_ids.iter().cloned());
            }
        }
        ids.into_iter()
            .filter_map(|id| self.obstacles.get(&id))
            .filter(|e| e.obstacle.active && e.bbox.overlaps(&region))
            .map(|e| &e.obstacle)
            .collect()
    }

    /// The nearest active obstacle to `point`, by distance to its local
    /// shape, and that distance in metres.
    pub fn nearest_obstacle(&self, point: Point2) -> Option<(&Obstacle, f64)> {
        self.obstacles
            .values()
            .filter(|e| e.obstacle.active)
            .map(|e| (&e.obstacle, distance_to_shape(&e.local, point)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats { total: self.obstacles.len(), cells_used: self.grid.len(), ..Default::default() };
        for entry in self.obstacles.values() {
            match entry.obstacle.shape {
                ObstacleShape::Circular { .. } => stats.circular += 1,
                ObstacleShape::Polygonal { .. } => stats.polygonal += 1,
            }
            if entry.obstacle.active {
                stats.active += 1;
            }
        }
        stats
    }
}

fn cell_index(p: Point2, cell_size_m: f64) -> CellKey {
    ((p.x / cell_size_m).floor() as i64, (p.y / cell_size_m).floor() as i64)
}

fn local_bbox(shape: &LocalShape) -> BoundingBox {
    match shape {
        LocalShape::Circle { centre, radius } => BoundingBox {
            min: Point2::new(centre.x - radius, centre.y - radius),
            max: Point2::new(centre.x + radius, centre.y + radius),
        },
        LocalShape::Polygon(poly) => bounding_box(&poly.vertices).unwrap_or(BoundingBox {
            min: Point2::new(0.0, 0.0),
            max: Point2::new(0.0, 0.0),
        }),
    }
}

fn cells_covering(bbox: &BoundingBox, cell_size_m: f64) -> Vec<CellKey> {
    let min_cell = cell_index(bbox.min, cell_size_m);
    let max_cell = cell_index(bbox.max, cell_size_m);
    let mut out = Vec::new();
    for cx in min_cell.0..=max_cell.0 {
        for cy in min_cell.1..=max_cell.1 {
            out.push((cx, cy));
        }
    }
    out
}

fn shape_contains(shape: &LocalShape, point: Point2) -> bool {
    match shape {
        LocalShape::Circle { centre, radius } => point.distance_to(centre) <= *radius,
        LocalShape::Polygon(poly) => point_in_polygon(point, &poly.vertices),
    }
}

fn shape_intersects_segment(shape: &LocalShape, a: Point2, b: Point2) -> bool {
    match shape {
        LocalShape::Circle { centre, radius } => {
            !crate::geo::segment_circle_intersect(a, b, *centre, *radius).is_empty()
                || shape_contains(shape, a)
                || shape_contains(shape, b)
        }
        LocalShape::Polygon(poly) => {
            !crate::geo::segment_polygon_intersect(a, b, poly).is_empty()
                || shape_contains(shape, a)
                || shape_contains(shape, b)
        }
    }
}

fn distance_to_shape(shape: &LocalShape, point: Point2) -> f64 {
    match shape {
        LocalShape::Circle { centre, radius } => (point.distance_to(centre) - radius).max(0.0),
        LocalShape::Polygon(poly) => {
            if point_in_polygon(point, &poly.vertices) {
                return 0.0;
            }
            poly.edges()
                .map(|(a, b)| point_segment_distance(point, a, b))
                .fold(f64::INFINITY, f64::min)
        }
    }
}

fn point_segment_distance(p: Point2, a: Point2, b: Point2) -> f64 {
    let ab = b - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 < 1e-18 {
        return p.distance_to(&a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len2).clamp(0.0, 1.0);
    let proj = Point2::new(a.x + t * ab.x, a.y + t * ab.y);
    p.distance_to(&proj)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> ProjectionOrigin {
        ProjectionOrigin::new(0.0, 0.0)
    }

    #[test]
    fn point_query_finds_circular_obstacle() {
        let mut idx = ObstacleIndex::new(origin());
        idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Circular {
                centre: GeoPoint::new(0.0, 0.0),
                radius_m: 50.0,
                margin_m: 0.0,
            },
            active: true,
            metadata: HashMap::new(),
        });

        assert!(idx.point_in_obstacle(Point2::new(0.0, 0.0)));
        assert!(!idx.point_in_obstacle(Point2::new(1000.0, 1000.0)));
    }

    #[test]
    fn inactive_obstacle_is_excluded_from_queries() {
        let mut idx = ObstacleIndex::new(origin());
        let id = idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Circular {
                centre: GeoPoint::new(0.0, 0.0),
                radius_m: 50.0,
                margin_m: 0.0,
            },
            active: true,
            metadata: HashMap::new(),
        });
        idx.set_active(&id, false);
        assert!(!idx.point_in_obstacle(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn segment_crossing_circle_is_detected() {
        let mut idx = ObstacleIndex::new(origin());
        idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Circular {
                centre: GeoPoint::new(0.0, 0.0),
                radius_m: 10.0,
                margin_m: 2.0,
            },
            active: true,
            metadata: HashMap::new(),
        });
        assert!(idx.segment_intersects_obstacle(Point2::new(-50.0, 0.0), Point2::new(50.0, 0.0)));
        assert!(!idx.segment_intersects_obstacle(
            Point2::new(-50.0, 100.0),
            Point2::new(50.0, 100.0)
        ));
    }

    #[test]
    fn remove_clears_obstacle_from_grid() {
        let mut idx = ObstacleIndex::new(origin());
        let id = idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Circular {
                centre: GeoPoint::new(0.0, 0.0),
                radius_m: 10.0,
                margin_m: 0.0,
            },
            active: true,
            metadata: HashMap::new(),
        });
        idx.remove(&id);
        assert!(idx.is_empty());
        assert!(!idx.point_in_obstacle(Point2::new(0.0, 0.0)));
    }

    #[test]
    fn stats_count_kinds() {
        let mut idx = ObstacleIndex::new(origin());
        idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Circular {
                centre: GeoPoint::new(0.0, 0.0),
                radius_m: 10.0,
                margin_m: 0.0,
            },
            active: true,
            metadata: HashMap::new(),
        });
        idx.add(Obstacle {
            id: String::new(),
            shape: ObstacleShape::Polygonal {
                vertices: vec![
                    GeoPoint::new(0.0, 0.0),
                    GeoPoint::new(0.0, 0.001),
                    GeoPoint::new(0.001, 0.001),
                ],
                margin_m: 0.0,
            },
            active: true,
            metadata: HashMap::new(),
        });
        let stats = idx.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.circular, 1);
        assert_eq!(stats.polygonal, 1);
    }
}
