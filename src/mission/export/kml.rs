//! KML 2.2 secondary exporter (spec \S4.10, \S6): one Placemark/Point
//! per navigation waypoint plus a single Placemark/LineString tracing
//! the full route. Built on the `kml` crate the teacher's Cargo.toml
//! carries but never exercises (`flight_path.rs` writes WPML/KML by
//! hand via `quick-xml`; this emitter uses the typed crate properly).

use std::collections::HashMap;

use kml::types::{AltitudeMode, Coord, Geometry, Kml, KmlDocument, LineString, Placemark, Point};
use kml::{KmlVersion, KmlWriter};

use crate::error::{PlanningError, PlanningResult};
use crate::mission::waypoint::WaypointSequence;

/// Renders `sequence` as a KML 2.2 document string.
pub fn emit(sequence: &WaypointSequence) -> PlanningResult<String> {
    let mut elements = Vec::with_capacity(sequence.len() + 1);

    for (i, w) in sequence.iter().enumerate() {
        let point = Point {
            coord: Coord { x: w.lon, y: w.lat, z: Some(w.alt) },
            extrude: false,
            altitude_mode: AltitudeMode::RelativeToGround,
        };
        elements.push(Kml::Placemark(Placemark {
            name: Some(format!("wp{i}")),
            description: Some(format!("{:?}", w.command)),
            geometry: Some(Geometry::Point(point)),
            attrs: HashMap::new(),
            children: Vec::new(),
        }));
    }

    let route = LineString {
        coords: sequence.iter().map(|w| Coord { x: w.lon, y: w.lat, z: Some(w.alt) }).collect(),
        extrude: false,
        tessellate: true,
        altitude_mode: AltitudeMode::RelativeToGround,
    };
    elements.push(Kml::Placemark(Placemark {
        name: Some("route".to_string()),
        description: None,
        geometry: Some(Geometry::LineString(route)),
        attrs: HashMap::new(),
        children: Vec::new(),
    }));

    let document = Kml::Document { attrs: HashMap::new(), elements };
    let root = Kml::KmlDocument(KmlDocument {
        version: KmlVersion::V22,
        attrs: HashMap::new(),
        elements: vec![document],
    });

    let mut buf = Vec::new();
    KmlWriter::from_writer(&mut buf)
        .write(&root)
        .map_err(|e| PlanningError::SerializationError(format!("KML write failed: {e}")))?;
    String::from_utf8(buf).map_err(|e| PlanningError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::waypoint::{Command, Waypoint};

    #[test]
    fn emits_one_placemark_point_per_waypoint_plus_route() {
        let sequence = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 1.0, 2.0, 30.0),
            Waypoint::new(Command::NavWaypoint, 1.001, 2.001, 50.0),
        ]);
        let text = emit(&sequence).unwrap();
        assert_eq!(text.matches("<Placemark>").count(), 3);
        assert!(text.contains("<LineString>"));
    }
}
