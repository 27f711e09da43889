//! Waypoint and waypoint-sequence types (spec \S3, \S6): the MAVLink QGC
//! WPL 110 command/frame vocabulary and the seq-reindexing invariant.

use serde::{Deserialize, Serialize};

/// MAVLink command codes emitted by the core (spec \S6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum Command {
    NavWaypoint = 16,
    LoiterUnlimited = 17,
    LoiterTime = 19,
    ReturnToLaunch = 20,
    Land = 21,
    Takeoff = 22,
    Delay = 112,
    ConditionYaw = 115,
    DoChangeSpeed = 178,
    DoSetHome = 179,
    DoSetRoi = 201,
    DoSetCamTriggDist = 206,
}

impl Command {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for Command {
    type Error = crate::error::PlanningError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            16 => Ok(Command::NavWaypoint),
            17 => Ok(Command::LoiterUnlimited),
            19 => Ok(Command::LoiterTime),
            20 => Ok(Command::ReturnToLaunch),
            21 => Ok(Command::Land),
            22 => Ok(Command::Takeoff),
            112 => Ok(Command::Delay),
            115 => Ok(Command::ConditionYaw),
            178 => Ok(Command::DoChangeSpeed),
            179 => Ok(Command::DoSetHome),
            201 => Ok(Command::DoSetRoi),
            206 => Ok(Command::DoSetCamTriggDist),
            other => Err(crate::error::PlanningError::SerializationError(format!(
                "unrecognised MAVLink command code {other}"
            ))),
        }
    }
}

/// Coordinate frame (spec \S6). `GlobalRelativeAlt` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Frame {
    Global = 0,
    GlobalRelativeAlt = 3,
    GlobalTerrainAlt = 10,
}

impl Default for Frame {
    fn default() -> Self {
        Frame::GlobalRelativeAlt
    }
}

impl Frame {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Frame {
    type Error = crate::error::PlanningError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Frame::Global),
            3 => Ok(Frame::GlobalRelativeAlt),
            10 => Ok(Frame::GlobalTerrainAlt),
            other => Err(crate::error::PlanningError::SerializationError(format!(
                "unrecognised coordinate frame code {other}"
            ))),
        }
    }
}

/// A single waypoint tuple (spec \S3): `<seq, command, frame, lat, lon,
/// alt, param1..4, current, autocontinue>`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub seq: usize,
    pub command: Command,
    pub frame: Frame,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub param1: f64,
    pub param2: f64,
    pub param3: f64,
    pub param4: f64,
    pub current: bool,
    pub autocontinue: bool,
}

impl Waypoint {
    /// Builds a waypoint with `seq = 0`, all params zero, autocontinue
    /// set; callers insert into a [`WaypointSequence`] which reindexes.
    pub fn new(command: Command, lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            seq: 0,
            command,
            frame: Frame::default(),
            lat,
            lon,
            alt,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            current: false,
            autocontinue: true,
        }
    }

    pub fn with_params(mut self, p1: f64, p2: f64, p3: f64, p4: f64) -> Self {
        self.param1 = p1;
        self.param2 = p2;
        self.param3 = p3;
        self.param4 = p4;
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }
}

/// Ordered mutable waypoint list. Invariant: `seq` equals index at all
/// times; any mutation re-indexes (spec \S3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointSequence {
    waypoints: Vec<Waypoint>,
}

impl WaypointSequence {
    pub fn new() -> Self {
        Self { waypoints: Vec::new() }
    }

    pub fn from_waypoints(mut waypoints: Vec<Waypoint>) -> Self {
        reindex(&mut waypoints);
        Self { waypoints }
    }

    pub fn push(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
        reindex(&mut self.waypoints);
    }

    pub fn insert(&mut self, index: usize, waypoint: Waypoint) {
        self.waypoints.insert(index, waypoint);
        reindex(&mut self.waypoints);
    }

    pub fn remove(&mut self, index: usize) -> Waypoint {
        let removed = self.waypoints.remove(index);
        reindex(&mut self.waypoints);
        removed
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    pub fn as_slice(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Navigation waypoints (`NavWaypoint`), the subset distance/time
    /// statistics are computed over (spec \S3).
    pub fn navigation_waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| w.command == Command::NavWaypoint)
    }
}

fn reindex(waypoints: &mut [Waypoint]) {
    for (i, w) in waypoints.iter_mut().enumerate() {
        w.seq = i;
        w.current = i == 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_reindexes_on_insert_and_remove() {
        let mut seq = WaypointSequence::new();
        seq.push(Waypoint::new(Command::Takeoff, 1.0, 2.0, 10.0));
        seq.push(Waypoint::new(Command::NavWaypoint, 1.1, 2.1, 20.0));
        seq.push(Waypoint::new(Command::NavWaypoint, 1.2, 2.2, 20.0));

        seq.insert(1, Waypoint::new(Command::DoChangeSpeed, 0.0, 0.0, 0.0));
        for (i, w) in seq.iter().enumerate() {
            assert_eq!(w.seq, i);
        }
        assert!(seq.as_slice()[0].current);
        assert!(!seq.as_slice()[1].current);

        seq.remove(0);
        for (i, w) in seq.iter().enumerate() {
            assert_eq!(w.seq, i);
        }
        assert!(seq.as_slice()[0].current);
    }

    #[test]
    fn navigation_waypoints_excludes_other_commands() {
        let seq = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 0.0, 0.0, 10.0),
            Waypoint::new(Command::NavWaypoint, 1.0, 1.0, 20.0),
            Waypoint::new(Command::ReturnToLaunch, 0.0, 0.0, 0.0),
        ]);
        assert_eq!(seq.navigation_waypoints().count(), 1);
    }
}
