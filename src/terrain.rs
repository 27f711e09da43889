//! Terrain service (spec \S6): an optional external interface the core
//! consults for ground elevation and terrain-collision checks. The
//! default is a constant-elevation stub; `terrain-gdal` adds a concrete
//! raster-backed implementation grounded on `flight_path.rs`'s
//! `get_elevation_at_point`/`calculate_slope_at_point`.

/// Elevation and terrain-collision queries the core can optionally
/// consult (spec \S6): `elevation(lat,lon) -> metres`,
/// `collides(lat,lon,alt_amsl) -> bool`.
pub trait TerrainService {
    /// Ground elevation in metres AMSL at `(lat, lon)`.
    fn elevation(&self, lat: f64, lon: f64) -> f64;

    /// Whether a vehicle at `alt_amsl` metres AMSL over `(lat, lon)`
    /// would be below ground. Default: compares against `elevation`.
    fn collides(&self, lat: f64, lon: f64, alt_amsl: f64) -> bool {
        alt_amsl < self.elevation(lat, lon)
    }
}

/// The core's default terrain service (spec \S6): a flat world at a
/// fixed elevation, used whenever no real terrain data is supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantElevation {
    pub elevation_m: f64,
}

impl ConstantElevation {
    pub fn new(elevation_m: f64) -> Self {
        Self { elevation_m }
    }
}

impl Default for ConstantElevation {
    fn default() -> Self {
        Self { elevation_m: 0.0 }
    }
}

impl TerrainService for ConstantElevation {
    fn elevation(&self, _lat: f64, _lon: f64) -> f64 {
        self.elevation_m
    }
}

#[cfg(feature = "terrain-gdal")]
pub use gdal_service::GdalTerrainService;

#[cfg(feature = "terrain-gdal")]
mod gdal_service {
    use super::TerrainService;
    use crate::error::{PlanningError, PlanningResult};
    use gdal::Dataset;

    /// Raster-backed terrain service reading elevation from a GeoTIFF or
    /// VRT in EPSG:4326 (lat/lon), one band, nodata `-32767.0`. Grounded
    /// on the teacher's `get_elevation_at_point` (`flight_path.rs`):
    /// same geotransform-to-pixel math and nodata sentinel, adapted from
    /// a NZTM-projected raster to a plain lat/lon one since the core has
    /// no fixed regional CRS.
    pub struct GdalTerrainService {
        dataset: Dataset,
        geotransform: [f64; 6],
        raster_size: (usize, usize),
        nodata: f64,
    }

    impl GdalTerrainService {
        /// Opens the raster at `path`. Fails if GDAL cannot read it or
        /// it carries no geotransform.
        pub fn open(path: &str) -> PlanningResult<Self> {
            let dataset = Dataset::open(path)
                .map_err(|e| PlanningError::InvalidInput(format!("opening terrain raster {path}: {e}")))?;
            let geotransform = dataset
                .geo_transform()
                .map_err(|e| PlanningError::InvalidInput(format!("reading geotransform: {e}")))?;
            let raster_size = dataset.raster_size();
            Ok(Self { dataset, geotransform, raster_size, nodata: -32767.0 })
        }

        fn elevation_at(&self, lon: f64, lat: f64) -> Option<f64> {
            let gt = &self.geotransform;
            let pixel_x = ((lon - gt[0]) / gt[1]).floor() as isize;
            let pixel_y = ((lat - gt[3]) / gt[5]).floor() as isize;
            if pixel_x < 0
                || pixel_y < 0
                || pixel_x >= self.raster_size.0 as isize
                || pixel_y >= self.raster_size.1 as isize
            {
                return None;
            }
            let rasterband = self.dataset.rasterband(1).ok()?;
            let mut buffer = [0.0f32; 1];
            rasterband
                .read_into_slice::<f32>((pixel_x, pixel_y), (1, 1), (1, 1), &mut buffer, None)
                .ok()?;
            let elevation = buffer[0] as f64;
            if (elevation - self.nodata).abs() < 0.1 {
                None
            } else {
                Some(elevation)
            }
        }
    }

    impl TerrainService for GdalTerrainService {
        fn elevation(&self, lat: f64, lon: f64) -> f64 {
            self.elevation_at(lon, lat).unwrap_or(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_elevation_is_flat() {
        let svc = ConstantElevation::new(120.0);
        assert_eq!(svc.elevation(1.0, 2.0), 120.0);
        assert_eq!(svc.elevation(-5.0, 40.0), 120.0);
    }

    #[test]
    fn default_collides_below_elevation() {
        let svc = ConstantElevation::new(50.0);
        assert!(svc.collides(1.0, 2.0, 40.0));
        assert!(!svc.collides(1.0, 2.0, 60.0));
    }
}
