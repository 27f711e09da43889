//! Secondary UTM conversion utility (spec \S3: "not required by the
//! core"), gated behind the `utm` feature. Grounded on the teacher's use
//! of `proj::Proj::new_known_crs` for its NZTM round-trips.

use proj::Proj;

use super::GeoPoint;
use crate::error::{PlanningError, PlanningResult};

/// Converts a WGS84 lat/lon into UTM easting/northing metres for the zone
/// implied by `lon`. Returns `(easting, northing, zone)`.
pub fn to_utm(point: GeoPoint) -> PlanningResult<(f64, f64, u8)> {
    let zone = (((point.lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
    let epsg = if point.lat >= 0.0 { 32600 + zone as u32 } else { 32700 + zone as u32 };
    let target = format!("EPSG:{epsg}");

    let proj = Proj::new_known_crs("EPSG:4326", &target, None)
        .map_err(|e| PlanningError::InvalidInput(format!("failed to build UTM projection: {e}")))?;
    let (easting, northing) = proj
        .convert((point.lon, point.lat))
        .map_err(|e| PlanningError::InvalidInput(format!("UTM conversion failed: {e}")))?;

    Ok((easting, northing, zone))
}
