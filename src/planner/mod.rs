//! Global planner (C6: A* over a discretised plane) and its shared
//! support types.

pub mod astar;
