//! Mission export formats (spec \S4.10, \S6): QGC WPL 110 (primary),
//! KML 2.2, GPX 1.1 and JSON (secondary).

pub mod gpx;
pub mod json;
pub mod kml;
pub mod qgc;
