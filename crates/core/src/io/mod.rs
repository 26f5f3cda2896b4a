//! Raster and vector data sources
//!
//! The operations in `rsutils-algorithms` reach data through the traits in
//! this module. Two backends implement them:
//!
//! - native (default): GeoTIFF via the `tiff` crate, GeoJSON via `serde_json`
//! - `gdal` feature: any GDAL raster and any OGR vector driver
//!
//! Handles are plain owned values; dropping one closes the underlying file.

#[cfg(feature = "gdal")]
mod gdal_io;
mod geojson;
mod native;

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterGeometry};
use crate::vector::FeatureCollection;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "gdal")]
pub use gdal_io::{GdalRaster, GdalVector};
pub use geojson::GeoJsonVector;
pub use native::{write_geotiff_bands, NativeRaster};

/// An open, georeferenced raster image.
pub trait RasterSource {
    /// Raster size as (width, height) in pixels
    fn raster_size(&self) -> (usize, usize);

    /// Number of bands
    fn band_count(&self) -> usize;

    /// Affine geotransform of the image
    fn geo_transform(&self) -> Result<GeoTransform>;

    /// Read a window of all bands decoded as `f32`.
    ///
    /// `offset` is (x, y) and `size` is (width, height) in pixels. The
    /// returned buffer is band-sequential: all pixels of band 1 in row-major
    /// order, then band 2, and so on.
    fn read_block_f32(&self, offset: (usize, usize), size: (usize, usize)) -> Result<Vec<f32>>;

    /// Geotransform and size together
    fn geometry(&self) -> Result<RasterGeometry> {
        let (width, height) = self.raster_size();
        Ok(RasterGeometry::new(self.geo_transform()?, width, height))
    }
}

/// Something that can read one layer of a vector dataset into memory.
pub trait VectorSource {
    fn read_layer(&self, path: &Path, layer: &str) -> Result<FeatureCollection>;
}

/// Something that can persist a feature table as a new vector dataset.
pub trait VectorSink {
    /// Write `features` to `path`. `layer` is the layer name for layered
    /// containers and `None` for single-layer formats.
    fn write_layer(
        &self,
        features: &FeatureCollection,
        path: &Path,
        layer: Option<&str>,
        format: &VectorFormat,
    ) -> Result<()>;
}

/// Output vector format, named after its OGR driver.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VectorFormat {
    /// GeoPackage, a layered container
    #[default]
    GeoPackage,
    GeoJson,
    /// Any other OGR driver by name
    Other(String),
}

impl VectorFormat {
    /// OGR driver short name
    pub fn driver_name(&self) -> &str {
        match self {
            VectorFormat::GeoPackage => "GPKG",
            VectorFormat::GeoJson => "GeoJSON",
            VectorFormat::Other(name) => name,
        }
    }

    /// Whether the format stores named layers
    pub fn is_layered(&self) -> bool {
        matches!(self, VectorFormat::GeoPackage)
    }
}

impl FromStr for VectorFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(Error::UnsupportedFormat(s.to_string())),
            "gpkg" | "geopackage" => Ok(VectorFormat::GeoPackage),
            "geojson" | "json" => Ok(VectorFormat::GeoJson),
            _ => Ok(VectorFormat::Other(s.trim().to_string())),
        }
    }
}

impl fmt::Display for VectorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.driver_name())
    }
}

/// Open a raster with the configured backend.
#[cfg(feature = "gdal")]
pub fn open_raster<P: AsRef<Path>>(path: P) -> Result<Box<dyn RasterSource>> {
    Ok(Box::new(GdalRaster::open(path)?))
}

/// Open a raster with the configured backend.
#[cfg(not(feature = "gdal"))]
pub fn open_raster<P: AsRef<Path>>(path: P) -> Result<Box<dyn RasterSource>> {
    Ok(Box::new(NativeRaster::open(path)?))
}

#[cfg(feature = "gdal")]
fn vector_backend() -> GdalVector {
    GdalVector
}

#[cfg(not(feature = "gdal"))]
fn vector_backend() -> GeoJsonVector {
    GeoJsonVector
}

/// Read a vector layer with the configured backend.
pub fn read_vector<P: AsRef<Path>>(path: P, layer: &str) -> Result<FeatureCollection> {
    vector_backend().read_layer(path.as_ref(), layer)
}

/// Write a vector layer with the configured backend.
pub fn write_vector<P: AsRef<Path>>(
    features: &FeatureCollection,
    path: P,
    layer: Option<&str>,
    format: &VectorFormat,
) -> Result<()> {
    vector_backend().write_layer(features, path.as_ref(), layer, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_format_parse() {
        assert_eq!("GPKG".parse::<VectorFormat>().unwrap(), VectorFormat::GeoPackage);
        assert_eq!("geojson".parse::<VectorFormat>().unwrap(), VectorFormat::GeoJson);
        assert_eq!(
            "ESRI Shapefile".parse::<VectorFormat>().unwrap(),
            VectorFormat::Other("ESRI Shapefile".into())
        );
        assert!("  ".parse::<VectorFormat>().is_err());
    }

    #[test]
    fn test_default_format_is_layered() {
        let format = VectorFormat::default();
        assert_eq!(format.driver_name(), "GPKG");
        assert!(format.is_layered());
        assert!(!VectorFormat::GeoJson.is_layered());
    }
}
