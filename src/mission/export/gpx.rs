//! GPX 1.1 secondary exporter (spec \S4.10, \S6): `metadata`, one `wpt`
//! per navigation waypoint, and a single `trk`/`trkseg`/`trkpt` track.
//! Grounded on the teacher's `generate_wpml` (`writer.rs`) for the
//! `quick_xml::Writer` event-by-event style, adapted to GPX's schema
//! instead of DJI WPML.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

use crate::error::{PlanningError, PlanningResult};
use crate::mission::waypoint::WaypointSequence;

/// Renders `sequence` as a GPX 1.1 document string.
pub fn emit(sequence: &WaypointSequence) -> PlanningResult<String> {
    write_gpx(sequence).map_err(|e| PlanningError::SerializationError(format!("GPX write failed: {e}")))
}

fn write_gpx(sequence: &WaypointSequence) -> Result<String, Box<dyn std::error::Error>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gpx_start = BytesStart::new("gpx");
    gpx_start.push_attribute(("version", "1.1"));
    gpx_start.push_attribute(("creator", "surveyplan"));
    gpx_start.push_attribute(("xmlns", "http://www.topografix.com/GPX/1/1"));
    writer.write_event(Event::Start(gpx_start))?;

    writer.write_event(Event::Start(BytesStart::new("metadata")))?;
    writer.write_event(Event::Start(BytesStart::new("name")))?;
    writer.write_event(Event::Text(BytesText::new("survey mission")))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;
    writer.write_event(Event::Start(BytesStart::new("time")))?;
    writer.write_event(Event::Text(BytesText::new(
        &chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    )))?;
    writer.write_event(Event::End(BytesEnd::new("time")))?;
    writer.write_event(Event::End(BytesEnd::new("metadata")))?;

    for (i, w) in sequence.iter().enumerate() {
        let mut wpt = BytesStart::new("wpt");
        let lat = format!("{:.8}", w.lat);
        let lon = format!("{:.8}", w.lon);
        wpt.push_attribute(("lat", lat.as_str()));
        wpt.push_attribute(("lon", lon.as_str()));
        writer.write_event(Event::Start(wpt))?;
        writer.write_event(Event::Start(BytesStart::new("ele")))?;
        writer.write_event(Event::Text(BytesText::new(&format!("{:.2}", w.alt))))?;
        writer.write_event(Event::End(BytesEnd::new("ele")))?;
        writer.write_event(Event::Start(BytesStart::new("name")))?;
        writer.write_event(Event::Text(BytesText::new(&format!("wp{i}"))))?;
        writer.write_event(Event::End(BytesEnd::new("name")))?;
        writer.write_event(Event::End(BytesEnd::new("wpt")))?;
    }

    writer.write_event(Event::Start(BytesStart::new("trk")))?;
    writer.write_event(Event::Start(BytesStart::new("name")))?;
    writer.write_event(Event::Text(BytesText::new("route")))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;
    writer.write_event(Event::Start(BytesStart::new("trkseg")))?;
    for w in sequence.iter() {
        let mut trkpt = BytesStart::new("trkpt");
        let lat = format!("{:.8}", w.lat);
        let lon = format!("{:.8}", w.lon);
        trkpt.push_attribute(("lat", lat.as_str()));
        trkpt.push_attribute(("lon", lon.as_str()));
        writer.write_event(Event::Start(trkpt))?;
        writer.write_event(Event::Start(BytesStart::new("ele")))?;
        writer.write_event(Event::Text(BytesText::new(&format!("{:.2}", w.alt))))?;
        writer.write_event(Event::End(BytesEnd::new("ele")))?;
        writer.write_event(Event::End(BytesEnd::new("trkpt")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    writer.write_event(Event::End(BytesEnd::new("trk")))?;

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    let result = writer.into_inner().into_inner();
    Ok(String::from_utf8(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::waypoint::{Command, Waypoint};

    #[test]
    fn emits_wpt_per_waypoint_and_one_track() {
        let sequence = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 1.0, 2.0, 30.0),
            Waypoint::new(Command::NavWaypoint, 1.001, 2.001, 50.0),
        ]);
        let text = emit(&sequence).unwrap();
        assert_eq!(text.matches("<wpt").count(), 2);
        assert_eq!(text.matches("<trkpt").count(), 2);
        assert!(text.contains("<trk>"));
    }
}
