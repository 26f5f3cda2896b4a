//! # rsutils core
//!
//! Core types, errors and I/O for the rsutils remote sensing utilities.
//!
//! This crate provides:
//! - `GeoTransform` / `RasterGeometry`: affine georeferencing and raster extent
//! - `RasterElement`: numeric types accepted by the array routines
//! - `Feature` / `FeatureCollection`: in-memory vector attribute tables
//! - `io`: raster and vector data source traits with native and GDAL backends

pub mod error;
pub mod io;
pub mod raster;
pub mod vector;

pub use error::{Error, ErrorKind, Result};
pub use raster::{Extent, GeoTransform, RasterElement, RasterGeometry};
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::io::{RasterSource, VectorFormat, VectorSink, VectorSource};
    pub use crate::raster::{Extent, GeoTransform, RasterElement, RasterGeometry};
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
}
