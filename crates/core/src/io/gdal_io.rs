//! Raster and vector access through GDAL/OGR

use crate::error::{Error, Result};
use crate::io::{RasterSource, VectorFormat, VectorSink, VectorSource};
use crate::raster::GeoTransform;
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use gdal::vector::{
    FieldValue, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType, ToGdal,
};
use gdal::{Dataset, DriverManager};
use std::path::Path;

/// A GDAL raster dataset opened read-only. Closed on drop.
pub struct GdalRaster {
    dataset: Dataset,
}

impl GdalRaster {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::open(path).map_err(|e| Error::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { dataset })
    }
}

impl RasterSource for GdalRaster {
    fn raster_size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    fn geo_transform(&self) -> Result<GeoTransform> {
        Ok(GeoTransform::from_gdal(self.dataset.geo_transform()?))
    }

    fn read_block_f32(&self, offset: (usize, usize), size: (usize, usize)) -> Result<Vec<f32>> {
        let window = (offset.0 as isize, offset.1 as isize);
        let mut out = Vec::with_capacity(size.0 * size.1 * self.band_count());

        for band_idx in 1..=self.band_count() {
            let band = self.dataset.rasterband(band_idx)?;
            let buffer = band.read_as::<f32>(window, size, size, None)?;
            out.extend_from_slice(buffer.data());
        }
        Ok(out)
    }
}

/// OGR-backed vector reader/writer
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalVector;

impl VectorSource for GdalVector {
    fn read_layer(&self, path: &Path, layer: &str) -> Result<FeatureCollection> {
        let dataset = Dataset::open(path).map_err(|e| Error::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut ogr_layer = dataset.layer_by_name(layer)?;

        let columns: Vec<String> = ogr_layer.defn().fields().map(|f| f.name()).collect();
        let mut collection = FeatureCollection::with_columns(columns);

        for ogr_feature in ogr_layer.features() {
            let mut feature = Feature::empty();
            feature.id = ogr_feature.fid().map(|fid| fid.to_string());
            feature.geometry = match ogr_feature.geometry() {
                Some(geom) => Some(geom.to_geo()?),
                None => None,
            };
            for (name, value) in ogr_feature.fields() {
                feature.set_property(name, attribute_from_field(value));
            }
            collection.features.push(feature);
        }

        Ok(collection)
    }
}

impl VectorSink for GdalVector {
    fn write_layer(
        &self,
        features: &FeatureCollection,
        path: &Path,
        layer: Option<&str>,
        format: &VectorFormat,
    ) -> Result<()> {
        let driver = DriverManager::get_driver_by_name(format.driver_name())?;
        let mut dataset = driver.create_vector_only(path)?;

        // Single-layer formats name the layer after the file
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = layer.unwrap_or(&stem);

        let ogr_layer = dataset.create_layer(LayerOptions {
            name,
            ty: OGRwkbGeometryType::wkbUnknown,
            ..Default::default()
        })?;

        let field_defs: Vec<(&str, u32)> = features
            .columns
            .iter()
            .map(|c| (c.as_str(), field_type(features, c)))
            .collect();
        ogr_layer.create_defn_fields(&field_defs)?;

        for feature in features.iter() {
            let mut ogr_feature = gdal::vector::Feature::new(ogr_layer.defn())?;
            if let Some(geom) = &feature.geometry {
                ogr_feature.set_geometry(geom.to_gdal()?)?;
            }
            for column in &features.columns {
                if let Some(value) = feature.get_property(column).and_then(field_from_attribute) {
                    ogr_feature.set_field(column, &value)?;
                }
            }
            ogr_feature.create(&ogr_layer)?;
        }

        Ok(())
    }
}

fn attribute_from_field(value: Option<FieldValue>) -> AttributeValue {
    match value {
        None => AttributeValue::Null,
        Some(FieldValue::IntegerValue(v)) => AttributeValue::Int(v as i64),
        Some(FieldValue::Integer64Value(v)) => AttributeValue::Int(v),
        Some(FieldValue::RealValue(v)) => AttributeValue::Float(v),
        Some(FieldValue::StringValue(v)) => AttributeValue::String(v),
        Some(other) => other
            .into_string()
            .map(AttributeValue::String)
            .unwrap_or(AttributeValue::Null),
    }
}

fn field_from_attribute(value: &AttributeValue) -> Option<FieldValue> {
    match value {
        AttributeValue::Null => None,
        AttributeValue::Bool(b) => Some(FieldValue::IntegerValue(*b as i32)),
        AttributeValue::Int(i) => Some(FieldValue::Integer64Value(*i)),
        AttributeValue::Float(f) => Some(FieldValue::RealValue(*f)),
        AttributeValue::String(s) => Some(FieldValue::StringValue(s.clone())),
    }
}

/// OGR field type from the first non-null value in a column
fn field_type(features: &FeatureCollection, column: &str) -> u32 {
    let first = features
        .iter()
        .filter_map(|f| f.get_property(column))
        .find(|v| !v.is_null());

    match first {
        Some(AttributeValue::Bool(_)) => OGRFieldType::OFTInteger,
        Some(AttributeValue::Int(_)) => OGRFieldType::OFTInteger64,
        Some(AttributeValue::Float(_)) => OGRFieldType::OFTReal,
        _ => OGRFieldType::OFTString,
    }
}
