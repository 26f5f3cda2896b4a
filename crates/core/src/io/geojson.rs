//! Native GeoJSON vector backend
//!
//! GeoJSON holds a single layer, so the layer name is ignored on read and
//! only written as the collection's `name` member.

use crate::error::{Error, Result};
use crate::io::{VectorFormat, VectorSink, VectorSource};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

type Position = Vec<f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<GeoJsonGeometry> },
}

#[derive(Debug, Serialize, Deserialize)]
struct GeoJsonFeature {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeoJsonDocument {
    #[serde(rename = "type")]
    type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    features: Vec<GeoJsonFeature>,
}

/// GeoJSON reader/writer
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonVector;

impl VectorSource for GeoJsonVector {
    fn read_layer(&self, path: &Path, _layer: &str) -> Result<FeatureCollection> {
        let file = File::open(path).map_err(|e| Error::OpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let doc: GeoJsonDocument = serde_json::from_reader(BufReader::new(file))?;
        if doc.type_ != "FeatureCollection" {
            return Err(Error::UnsupportedFormat(format!(
                "GeoJSON document of type {}",
                doc.type_
            )));
        }
        from_document(doc)
    }
}

impl VectorSink for GeoJsonVector {
    fn write_layer(
        &self,
        features: &FeatureCollection,
        path: &Path,
        layer: Option<&str>,
        format: &VectorFormat,
    ) -> Result<()> {
        if *format != VectorFormat::GeoJson {
            return Err(Error::UnsupportedFormat(format!(
                "{} (enable the `gdal` feature)",
                format
            )));
        }

        let doc = to_document(features, layer);
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &doc)?;
        writer.flush()?;
        Ok(())
    }
}

fn from_document(doc: GeoJsonDocument) -> Result<FeatureCollection> {
    let mut collection = FeatureCollection::new();

    for raw in doc.features {
        let mut feature = Feature::empty();
        feature.geometry = raw.geometry.map(to_geo).transpose()?;
        feature.id = raw.id.map(|id| match id {
            Value::String(s) => s,
            other => other.to_string(),
        });

        let properties = raw.properties.unwrap_or_default();
        for (key, value) in properties {
            if !collection.has_column(&key) {
                collection.columns.push(key.clone());
            }
            feature.set_property(key, attribute_from_json(value));
        }
        collection.features.push(feature);
    }

    Ok(collection)
}

fn to_document(collection: &FeatureCollection, layer: Option<&str>) -> GeoJsonDocument {
    let features = collection
        .iter()
        .map(|feature| {
            let mut properties = Map::new();
            for column in &collection.columns {
                let value = feature
                    .get_property(column)
                    .map(attribute_to_json)
                    .unwrap_or(Value::Null);
                properties.insert(column.clone(), value);
            }
            GeoJsonFeature {
                type_: "Feature".to_string(),
                id: feature.id.clone().map(Value::String),
                geometry: feature.geometry.as_ref().map(from_geo),
                properties: Some(properties),
            }
        })
        .collect();

    GeoJsonDocument {
        type_: "FeatureCollection".to_string(),
        name: layer.map(str::to_string),
        features,
    }
}

fn attribute_from_json(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => AttributeValue::String(s),
        // Nested values are kept as their JSON text
        other => AttributeValue::String(other.to_string()),
    }
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::from(*i),
        AttributeValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AttributeValue::String(s) => Value::String(s.clone()),
    }
}

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(Error::MalformedSource(
            "GeoJSON position needs at least two coordinates".to_string(),
        )),
    }
}

fn line(positions: &[Position]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|r| line(r));
    let exterior = rings.next().transpose()?.unwrap_or_else(|| LineString::new(vec![]));
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn to_geo(geometry: GeoJsonGeometry) -> Result<Geometry<f64>> {
    Ok(match geometry {
        GeoJsonGeometry::Point { coordinates } => Geometry::Point(Point(coord(&coordinates)?)),
        GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint::new(
            coordinates
                .iter()
                .map(|p| coord(p).map(Point))
                .collect::<Result<_>>()?,
        )),
        GeoJsonGeometry::LineString { coordinates } => Geometry::LineString(line(&coordinates)?),
        GeoJsonGeometry::MultiLineString { coordinates } => {
            Geometry::MultiLineString(MultiLineString::new(
                coordinates.iter().map(|l| line(l)).collect::<Result<_>>()?,
            ))
        }
        GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(&coordinates)?),
        GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(MultiPolygon::new(
            coordinates.iter().map(|p| polygon(p)).collect::<Result<_>>()?,
        )),
        GeoJsonGeometry::GeometryCollection { geometries } => {
            Geometry::GeometryCollection(GeometryCollection(
                geometries.into_iter().map(to_geo).collect::<Result<_>>()?,
            ))
        }
    })
}

fn position(c: &Coord<f64>) -> Position {
    vec![c.x, c.y]
}

fn positions(ls: &LineString<f64>) -> Vec<Position> {
    ls.0.iter().map(position).collect()
}

fn rings(p: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(p.exterior())
        .chain(p.interiors())
        .map(positions)
        .collect()
}

fn from_geo(geometry: &Geometry<f64>) -> GeoJsonGeometry {
    match geometry {
        Geometry::Point(p) => GeoJsonGeometry::Point {
            coordinates: position(&p.0),
        },
        Geometry::Line(l) => GeoJsonGeometry::LineString {
            coordinates: vec![position(&l.start), position(&l.end)],
        },
        Geometry::LineString(ls) => GeoJsonGeometry::LineString {
            coordinates: positions(ls),
        },
        Geometry::Polygon(p) => GeoJsonGeometry::Polygon {
            coordinates: rings(p),
        },
        Geometry::MultiPoint(mp) => GeoJsonGeometry::MultiPoint {
            coordinates: mp.0.iter().map(|p| position(&p.0)).collect(),
        },
        Geometry::MultiLineString(ml) => GeoJsonGeometry::MultiLineString {
            coordinates: ml.0.iter().map(positions).collect(),
        },
        Geometry::MultiPolygon(mp) => GeoJsonGeometry::MultiPolygon {
            coordinates: mp.0.iter().map(rings).collect(),
        },
        Geometry::GeometryCollection(gc) => GeoJsonGeometry::GeometryCollection {
            geometries: gc.0.iter().map(from_geo).collect(),
        },
        Geometry::Rect(r) => GeoJsonGeometry::Polygon {
            coordinates: rings(&r.to_polygon()),
        },
        Geometry::Triangle(t) => GeoJsonGeometry::Polygon {
            coordinates: rings(&t.to_polygon()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{point, polygon};
    use tempfile::TempDir;

    fn sample() -> FeatureCollection {
        let mut fc = FeatureCollection::with_columns(["class", "area"]);
        fc.push(
            Feature::new(Geometry::Point(point!(x: 1.0, y: 2.0)))
                .with_property("class", "water")
                .with_property("area", 10.5),
        );
        let mut poly = Feature::new(Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
        ]))
        .with_property("class", "forest");
        poly.id = Some("f2".to_string());
        fc.push(poly);
        fc
    }

    #[test]
    fn test_write_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.geojson");
        let fc = sample();

        GeoJsonVector
            .write_layer(&fc, &path, Some("classes"), &VectorFormat::GeoJson)
            .unwrap();
        let loaded = GeoJsonVector.read_layer(&path, "classes").unwrap();

        assert_eq!(loaded.columns, vec!["class", "area"]);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.features[0].geometry, fc.features[0].geometry);
        assert_eq!(loaded.features[1].geometry, fc.features[1].geometry);
        assert_eq!(loaded.features[1].id.as_deref(), Some("f2"));
        // Missing attributes are written as null
        assert_eq!(
            loaded.features[1].get_property("area"),
            Some(&AttributeValue::Null)
        );
    }

    #[test]
    fn test_rejects_other_formats() {
        let dir = TempDir::new().unwrap();
        let err = GeoJsonVector
            .write_layer(
                &sample(),
                &dir.path().join("out.gpkg"),
                Some("x"),
                &VectorFormat::GeoPackage,
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_property_types() {
        let json = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","id":7,"geometry":null,
             "properties":{"n":3,"f":2.5,"s":"a","b":true,"z":null}}]}"#;
        let doc: GeoJsonDocument = serde_json::from_str(json).unwrap();
        let fc = from_document(doc).unwrap();
        let f = &fc.features[0];

        assert_eq!(fc.columns, vec!["n", "f", "s", "b", "z"]);
        assert_eq!(f.id.as_deref(), Some("7"));
        assert!(f.geometry.is_none());
        assert_eq!(f.get_property("n"), Some(&AttributeValue::Int(3)));
        assert_eq!(f.get_property("f"), Some(&AttributeValue::Float(2.5)));
        assert_eq!(f.get_property("b"), Some(&AttributeValue::Bool(true)));
        assert!(f.get_property("z").unwrap().is_null());
    }

    #[test]
    fn test_read_missing_file() {
        let err = GeoJsonVector
            .read_layer(Path::new("/nonexistent/in.geojson"), "x")
            .unwrap_err();
        assert!(matches!(err, Error::OpenFailed { .. }));
    }
}
