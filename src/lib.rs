//! `surveyplan` — coverage-survey flight mission planning core: geometry
//! kernel, obstacle index, vehicle models, camera/optics, coverage grid
//! generation, global (A*) and local (DWA) planning, trajectory shaping,
//! swarm coordination, and mission assembly/export.
//!
//! Grounded on `slammywill-UAVSAR`'s flight-path generation pipeline,
//! generalised from a single-drone GDAL-slope-adjusted lawnmower pattern
//! into the full module set this crate documents in `DESIGN.md`.

pub mod camera;
pub mod coverage;
pub mod error;
pub mod geo;
pub mod local_planner;
pub mod mission;
pub mod obstacle;
pub mod planner;
pub mod swarm;
pub mod terrain;
pub mod trajectory;
pub mod vehicle;

pub use error::{PlanningError, PlanningResult};
