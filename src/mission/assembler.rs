//! Mission assembler (C10, spec \S4.10): turns a coverage sweep plus
//! survey configuration into the ordered command-level waypoint
//! sequence `[home?, speed-set, (loiter?), takeoff?, nav1..navn,
//! speed-set-slow?, return-to-home-coord, rtl?]`.

use crate::coverage::{CoverageResult, SurveyConfig};
use crate::geo::GeoPoint;
use crate::mission::waypoint::{Command, Waypoint, WaypointSequence};

/// Optional extras the coverage generator and swarm coordinator hand
/// off to assembly (spec \S4.9's loiter injection, and an optional
/// slowed speed for the final approach leg).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AssemblyOptions {
    pub loiter_time_s: Option<f64>,
    pub slow_speed_mps: Option<f64>,
}

/// Assembles the full mission sequence (spec \S4.10). `home`, when
/// present, backs the optional `DO_SET_HOME`/takeoff/RTL bookends; its
/// absence silently skips them regardless of `config.add_takeoff` /
/// `config.add_rtl` (spec \S4.5, step 9: bookends require a home).
pub fn assemble_mission(
    coverage: &CoverageResult,
    config: &SurveyConfig,
    home: Option<GeoPoint>,
    options: AssemblyOptions,
) -> WaypointSequence {
    let mut waypoints = Vec::new();

    if let Some(home) = home {
        waypoints.push(Waypoint::new(Command::DoSetHome, home.lat, home.lon, home.alt.unwrap_or(0.0)));
    }

    waypoints.push(
        Waypoint::new(Command::DoChangeSpeed, 0.0, 0.0, 0.0)
            .with_params(1.0, config.speed_mps, -1.0, 0.0),
    );

    if let (Some(loiter_s), Some(home)) = (options.loiter_time_s, home) {
        waypoints.push(
            Waypoint::new(Command::LoiterTime, home.lat, home.lon, config.altitude_m)
                .with_params(loiter_s, 0.0, 0.0, 0.0),
        );
    }

    if config.add_takeoff {
        if let Some(home) = home {
            waypoints.push(Waypoint::new(Command::Takeoff, home.lat, home.lon, config.altitude_m));
        }
    }

    for nav in &coverage.nav_points {
        waypoints.push(Waypoint::new(
            Command::NavWaypoint,
            nav.lat,
            nav.lon,
            nav.alt.unwrap_or(config.altitude_m),
        ));
    }

    if let Some(slow_speed) = options.slow_speed_mps {
        waypoints.push(
            Waypoint::new(Command::DoChangeSpeed, 0.0, 0.0, 0.0)
                .with_params(1.0, slow_speed, -1.0, 0.0),
        );
    }

    if config.add_rtl {
        if let Some(home) = home {
            waypoints.push(Waypoint::new(
                Command::NavWaypoint,
                home.lat,
                home.lon,
                config.altitude_m,
            ));
            waypoints.push(Waypoint::new(Command::ReturnToLaunch, home.lat, home.lon, 0.0));
        }
    }

    WaypointSequence::from_waypoints(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraSpec;
    use crate::coverage::{CoverageStats, EntryLocation, ScanPattern};

    fn test_config() -> SurveyConfig {
        SurveyConfig {
            altitude_m: 100.0,
            speed_mps: 5.0,
            front_overlap_pct: 70.0,
            side_overlap_pct: 80.0,
            scan_angle_deg: 0.0,
            scan_pattern: ScanPattern::Zigzag,
            entry_location: EntryLocation::Auto,
            boundary_offset_m: 0.0,
            overshoot_m: 0.0,
            leadin_m: 0.0,
            camera: CameraSpec {
                sensor_width_mm: 10.0,
                sensor_height_mm: 10.0,
                focal_length_mm: 10.0,
                image_width_px: 1000,
                image_height_px: 1000,
            },
            add_takeoff: true,
            add_rtl: true,
        }
    }

    fn sample_coverage() -> CoverageResult {
        CoverageResult {
            nav_points: vec![GeoPoint::with_alt(1.0, 2.0, 100.0), GeoPoint::with_alt(1.001, 2.0, 100.0)],
            stats: CoverageStats::default(),
            diagnostic: None,
        }
    }

    #[test]
    fn full_bookends_present_with_home() {
        let home = GeoPoint::new(1.0, 2.0);
        let seq = assemble_mission(&sample_coverage(), &test_config(), Some(home), AssemblyOptions::default());
        let commands: Vec<Command> = seq.iter().map(|w| w.command).collect();
        assert_eq!(
            commands,
            vec![
                Command::DoSetHome,
                Command::DoChangeSpeed,
                Command::Takeoff,
                Command::NavWaypoint,
                Command::NavWaypoint,
                Command::NavWaypoint,
                Command::ReturnToLaunch,
            ]
        );
    }

    #[test]
    fn no_home_skips_bookends() {
        let seq = assemble_mission(&sample_coverage(), &test_config(), None, AssemblyOptions::default());
        let commands: Vec<Command> = seq.iter().map(|w| w.command).collect();
        assert_eq!(commands, vec![Command::DoChangeSpeed, Command::NavWaypoint, Command::NavWaypoint]);
    }

    #[test]
    fn loiter_injected_after_speed_set_before_takeoff() {
        let home = GeoPoint::new(1.0, 2.0);
        let options = AssemblyOptions { loiter_time_s: Some(12.0), slow_speed_mps: None };
        let seq = assemble_mission(&sample_coverage(), &test_config(), Some(home), options);
        let commands: Vec<Command> = seq.iter().map(|w| w.command).collect();
        let speed_idx = commands.iter().position(|c| *c == Command::DoChangeSpeed).unwrap();
        let loiter_idx = commands.iter().position(|c| *c == Command::LoiterTime).unwrap();
        let takeoff_idx = commands.iter().position(|c| *c == Command::Takeoff).unwrap();
        assert!(speed_idx < loiter_idx);
        assert!(loiter_idx < takeoff_idx);
    }
}
