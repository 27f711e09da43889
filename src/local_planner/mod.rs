//! Local planner (C7: Dynamic Window Approach) and its support types.

pub mod dwa;
