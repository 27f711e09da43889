//! Mission assembly and export (C10, spec \S3, \S4.10, \S6): the
//! waypoint vocabulary, the coverage-to-mission assembler, and the
//! primary/secondary output formats.

pub mod assembler;
pub mod export;
pub mod waypoint;

pub use assembler::{assemble_mission, AssemblyOptions};
pub use waypoint::{Command, Frame, Waypoint, WaypointSequence};
