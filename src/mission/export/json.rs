//! JSON secondary exporter (spec \S4.10, \S6): a round-trippable object
//! carrying the survey configuration fields from spec \S3 plus a
//! `waypoints` array that mirrors the QGC WPL 110 text as one string
//! per line, so a consumer that only understands WPL can still recover
//! the mission from the JSON body.

use serde::{Deserialize, Serialize};

use crate::coverage::SurveyConfig;
use crate::error::{PlanningError, PlanningResult};
use crate::mission::export::qgc;
use crate::mission::waypoint::WaypointSequence;

/// JSON document shape for a mission export (spec \S6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionDocument {
    pub config: SurveyConfig,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub waypoints: Vec<String>,
}

/// Renders `sequence` and its originating `config` as a JSON string: the
/// survey configuration verbatim, a generation timestamp, plus the WPL
/// 110 lines (sans header) as `waypoints`.
pub fn emit(sequence: &WaypointSequence, config: &SurveyConfig) -> PlanningResult<String> {
    let wpl = qgc::emit(sequence);
    let waypoints: Vec<String> = wpl.lines().skip(1).map(str::to_string).collect();
    let document =
        MissionDocument { config: *config, generated_at: chrono::Utc::now(), waypoints };
    serde_json::to_string_pretty(&document)
        .map_err(|e| PlanningError::SerializationError(format!("JSON write failed: {e}")))
}

/// Parses a JSON document produced by [`emit`] back into a waypoint
/// sequence, by re-parsing its `waypoints` lines as QGC WPL 110 (with
/// the header line re-synthesised).
pub fn parse(text: &str) -> PlanningResult<WaypointSequence> {
    let document: MissionDocument = serde_json::from_str(text)
        .map_err(|e| PlanningError::SerializationError(format!("JSON read failed: {e}")))?;
    let mut wpl = String::from("QGC WPL 110\n");
    for line in &document.waypoints {
        wpl.push_str(line);
        wpl.push('\n');
    }
    qgc::parse(&wpl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraSpec;
    use crate::coverage::{EntryLocation, ScanPattern};
    use crate::mission::waypoint::{Command, Waypoint};

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

    #[test]
    fn emits_config_and_one_line_per_waypoint() {
        let sequence = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 1.0, 2.0, 30.0),
            Waypoint::new(Command::NavWaypoint, 1.001, 2.001, 50.0),
        ]);
        let text = emit(&sequence, &test_config()).unwrap();
        assert!(text.contains("\"waypoints\""));
        assert!(text.contains("\"altitude_m\""));
        let document: MissionDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(document.waypoints.len(), 2);
    }

    #[test]
    fn round_trips_through_qgc() {
        let sequence = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 1.0, 2.0, 30.0),
            Waypoint::new(Command::NavWaypoint, 1.001, 2.001, 50.0),
            Waypoint::new(Command::ReturnToLaunch, 1.0, 2.0, 0.0),
        ]);
        let text = emit(&sequence, &test_config()).unwrap();
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, sequence);
    }
}
