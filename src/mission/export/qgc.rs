//! MAVLink QGC WPL 110 text exporter and parser (spec \S4.10, \S6). The
//! primary output format; round-trips per invariant 9
//! (`parse(emit(waypoints)) == waypoints` modulo print precision).

use crate::error::{PlanningError, PlanningResult};
use crate::mission::waypoint::{Command, Frame, Waypoint, WaypointSequence};

const HEADER: &str = "QGC WPL 110";

/// Emits `sequence` as QGC WPL 110 text: a header line followed by one
/// tab-separated line per waypoint, LF-terminated.
pub fn emit(sequence: &WaypointSequence) -> String {
    let mut out = String::with_capacity(32 + sequence.len() * 64);
    out.push_str(HEADER);
    out.push('\n');
    for waypoint in sequence.iter() {
        out.push_str(&format_line(waypoint));
        out.push('\n');
    }
    out
}

fn format_line(w: &Waypoint) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.8}\t{:.8}\t{:.2}\t{}",
        w.seq,
        w.current as u8,
        w.frame.code(),
        w.command.code(),
        format_param(w.param1),
        format_param(w.param2),
        format_param(w.param3),
        format_param(w.param4),
        w.lat,
        w.lon,
        w.alt,
        w.autocontinue as u8,
    )
}

/// Params print as bare integers when they carry no fractional part
/// (e.g. `0` rather than `0.00000000`), matching QGC WPL 110 files in
/// the wild.
fn format_param(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Parses QGC WPL 110 text back into a [`WaypointSequence`].
pub fn parse(text: &str) -> PlanningResult<WaypointSequence> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| PlanningError::SerializationError("empty QGC WPL file".into()))?;
    if !header.trim().starts_with("QGC WPL") {
        return Err(PlanningError::SerializationError(format!(
            "unrecognised QGC WPL header: {header}"
        )));
    }

    let mut waypoints = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        waypoints.push(parse_line(line)?);
    }
    Ok(WaypointSequence::from_waypoints(waypoints))
}

fn parse_line(line: &str) -> PlanningResult<Waypoint> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 12 {
        return Err(PlanningError::SerializationError(format!(
            "expected 12 tab-separated fields, found {}: {line}",
            fields.len()
        )));
    }

    let field = |i: usize| -> PlanningResult<f64> {
        fields[i]
            .trim()
            .parse::<f64>()
            .map_err(|e| PlanningError::SerializationError(format!("field {i} ({}): {e}", fields[i])))
    };

    let current = field(1)? != 0.0;
    let frame = Frame::try_from(field(2)? as u8)?;
    let command = Command::try_from(field(3)? as u16)?;

    Ok(Waypoint {
        seq: field(0)? as usize,
        command,
        frame,
        lat: field(8)?,
        lon: field(9)?,
        alt: field(10)?,
        param1: field(4)?,
        param2: field(5)?,
        param3: field(6)?,
        param4: field(7)?,
        current,
        autocontinue: field(11)? != 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_s6_exact_line() {
        // spec \S8 scenario S6, verbatim: seq=3, default frame (3),
        // NAV_WAYPOINT (16), not the first waypoint so current=0.
        let w = Waypoint {
            seq: 3,
            command: Command::NavWaypoint,
            frame: Frame::GlobalRelativeAlt,
            lat: 23.7,
            lon: 120.4,
            alt: 50.0,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            current: false,
            autocontinue: true,
        };
        assert_eq!(
            format_line(&w),
            "3\t0\t3\t16\t0\t0\t0\t0\t23.70000000\t120.40000000\t50.00\t1"
        );
    }

    #[test]
    fn single_waypoint_matches_exact_expected_line() {
        let sequence = WaypointSequence::from_waypoints(vec![Waypoint {
            seq: 3,
            command: Command::NavWaypoint,
            frame: Frame::Global,
            lat: 23.7,
            lon: 120.4,
            alt: 50.0,
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            current: false,
            autocontinue: true,
        }]);
        let text = emit(&sequence);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "QGC WPL 110");
        // reindex forces seq=0/current=true for the sole waypoint; this
        // checks the line shape against the documented single-line
        // example with the fields that are independent of reindexing.
        assert_eq!(
            lines[1],
            "0\t1\t0\t16\t0\t0\t0\t0\t23.70000000\t120.40000000\t50.00\t1"
        );
    }

    #[test]
    fn round_trip_preserves_waypoints() {
        let sequence = WaypointSequence::from_waypoints(vec![
            Waypoint::new(Command::Takeoff, 1.0, 2.0, 30.0),
            Waypoint::new(Command::NavWaypoint, 1.001, 2.001, 50.0).with_params(0.0, 0.0, 0.0, 0.0),
            Waypoint::new(Command::ReturnToLaunch, 1.0, 2.0, 0.0),
        ]);
        let text = emit(&sequence);
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, sequence);
    }

    #[test]
    fn rejects_malformed_header() {
        assert!(parse("not a qgc file\n").is_err());
    }
}
