//! Vector features and attribute tables

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Value equality as a dataframe column comparison sees it.
    ///
    /// Integers and floats compare numerically, so `Int(3)` matches
    /// `Float(3.0)`. `Null` only matches `Null`.
    pub fn matches(&self, other: &AttributeValue) -> bool {
        use AttributeValue::*;
        match (self, other) {
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (a, b) => a == b,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "NULL"),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature geometry
    pub geometry: Option<Geometry<f64>>,
    /// Feature attributes
    pub properties: HashMap<String, AttributeValue>,
    /// Optional feature ID
    pub id: Option<String>,
}

impl Feature {
    /// Create a new feature with geometry
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Create a feature with no geometry
    pub fn empty() -> Self {
        Self {
            geometry: None,
            properties: HashMap::new(),
            id: None,
        }
    }

    /// Builder-style attribute setter
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.set_property(key, value.into());
        self
    }

    /// Set an attribute
    pub fn set_property(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.properties.insert(key.into(), value);
    }

    /// Get an attribute
    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }
}

/// An ordered table of features sharing one attribute schema.
///
/// `columns` keeps the field order of the source layer so that writers can
/// reproduce it; features may omit a column, which reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub columns: Vec<String>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty collection with a fixed column order
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            features: Vec::new(),
        }
    }

    /// Append a feature, registering any attribute names not yet in `columns`
    pub fn push(&mut self, feature: Feature) {
        let mut new_keys: Vec<&String> = feature
            .properties
            .keys()
            .filter(|k| !self.columns.contains(k))
            .collect();
        new_keys.sort();
        let new_keys: Vec<String> = new_keys.into_iter().cloned().collect();
        self.columns.extend(new_keys);
        self.features.push(feature);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Keep only the features for which `keep` returns true, preserving order
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Feature) -> bool,
    {
        self.features.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_matches() {
        assert!(AttributeValue::Int(3).matches(&AttributeValue::Float(3.0)));
        assert!(AttributeValue::from("A").matches(&"A".into()));
        assert!(!AttributeValue::from("A").matches(&"a".into()));
        assert!(!AttributeValue::Null.matches(&AttributeValue::Int(0)));
        assert!(AttributeValue::Null.matches(&AttributeValue::Null));
    }

    #[test]
    fn test_push_registers_columns() {
        let mut fc = FeatureCollection::with_columns(["name"]);
        fc.push(Feature::empty().with_property("name", "x").with_property("b", 1i64));
        fc.push(Feature::empty().with_property("a", true));

        assert_eq!(fc.columns, vec!["name", "b", "a"]);
        assert_eq!(fc.len(), 2);
        assert!(fc.has_column("a"));
    }
}
