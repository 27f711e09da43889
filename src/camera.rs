//! Camera/optics (C4): GSD, ground footprint, line spacing and photo
//! interval from overlap percentages (spec \S4.4). Grounded on the
//! teacher's `get_ground_coverage` (`flight_path.rs`), generalised from a
//! single derived coverage width into the full five-field camera spec.

use serde::{Deserialize, Serialize};

/// Camera spec (spec \S3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub sensor_width_mm: f64,
    pub sensor_height_mm: f64,
    pub focal_length_mm: f64,
    pub image_width_px: u32,
    pub image_height_px: u32,
}

impl CameraSpec {
    /// Ground sample distance, metres/pixel, at `altitude_m` (spec \S4.4).
    pub fn gsd(&self, altitude_m: f64) -> f64 {
        altitude_m * self.sensor_width_mm / (self.focal_length_mm * self.image_width_px as f64)
    }

    /// Ground footprint width at `altitude_m`.
    pub fn ground_width_m(&self, altitude_m: f64) -> f64 {
        altitude_m * self.sensor_width_mm / self.focal_length_mm
    }

    /// Ground footprint height at `altitude_m`.
    pub fn ground_height_m(&self, altitude_m: f64) -> f64 {
        altitude_m * self.sensor_height_mm / self.focal_length_mm
    }

    /// Spacing between adjacent scan lines given `side_overlap_pct`.
    pub fn line_spacing_m(&self, altitude_m: f64, side_overlap_pct: f64) -> f64 {
        self.ground_width_m(altitude_m) * (1.0 - side_overlap_pct / 100.0)
    }

    /// Along-track distance between consecutive photo triggers given
    /// `front_overlap_pct`.
    pub fn photo_interval_m(&self, altitude_m: f64, front_overlap_pct: f64) -> f64 {
        self.ground_height_m(altitude_m) * (1.0 - front_overlap_pct / 100.0)
    }

    /// Horizontal field of view, degrees.
    pub fn horizontal_fov_deg(&self) -> f64 {
        2.0 * (self.sensor_width_mm / (2.0 * self.focal_length_mm)).atan().to_degrees()
    }

    /// Vertical field of view, degrees.
    pub fn vertical_fov_deg(&self) -> f64 {
        2.0 * (self.sensor_height_mm / (2.0 * self.focal_length_mm)).atan().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dji_like() -> CameraSpec {
        CameraSpec {
            sensor_width_mm: 13.2,
            sensor_height_mm: 8.8,
            focal_length_mm: 8.8,
            image_width_px: 5472,
            image_height_px: 3648,
        }
    }

    #[test]
    fn gsd_scales_linearly_with_altitude() {
        let cam = dji_like();
        assert_relative_eq!(cam.gsd(200.0), 2.0 * cam.gsd(100.0), epsilon = 1e-9);
    }

    #[test]
    fn line_spacing_shrinks_with_more_overlap() {
        let cam = dji_like();
        let spacing_50 = cam.line_spacing_m(100.0, 50.0);
        let spacing_80 = cam.line_spacing_m(100.0, 80.0);
        assert!(spacing_80 < spacing_50);
    }

    #[test]
    fn fov_is_symmetric_for_square_sensor() {
        let cam = CameraSpec {
            sensor_width_mm: 10.0,
            sensor_height_mm: 10.0,
            focal_length_mm: 5.0,
            image_width_px: 1000,
            image_height_px: 1000,
        };
        assert_relative_eq!(cam.horizontal_fov_deg(), cam.vertical_fov_deg(), epsilon = 1e-9);
    }
}
