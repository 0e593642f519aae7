use crate::error::LoaderError;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use std::fmt;
use std::path::{Path, PathBuf};

pub type LoaderResult<T> = Result<T, LoaderError>;

// Unique identifiers
pub type LayerId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl GeoBounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        GeoBounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every coordinate, or `None` for an empty slice.
    pub fn from_coordinates(coordinates: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = coordinates.split_first()?;
        let mut bounds = GeoBounds::new(first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            bounds.extend(x, y);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }
}

// Geographic point (latitude, longitude)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        GeoPoint { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

/// Location of a GeoJSON document: a remote URL or a filesystem path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceRef {
    Http(String),
    Local(PathBuf),
}

impl ResourceRef {
    pub fn parse(reference: &str) -> LoaderResult<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(LoaderError::InvalidResource(
                "resource reference cannot be empty".to_string(),
            ));
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            Ok(ResourceRef::Http(reference.to_string()))
        } else {
            Ok(ResourceRef::Local(PathBuf::from(reference)))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ResourceRef::Http(_))
    }

    /// Resolves a relative path against `base_dir`; URLs and absolute paths
    /// are returned untouched.
    pub fn resolve_path(&self, base_dir: Option<&Path>) -> Option<PathBuf> {
        match self {
            ResourceRef::Http(_) => None,
            ResourceRef::Local(path) if path.is_absolute() => Some(path.clone()),
            ResourceRef::Local(path) => Some(
                base_dir
                    .map(|base| base.join(path))
                    .unwrap_or_else(|| path.clone()),
            ),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Http(url) => f.write_str(url),
            ResourceRef::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Converts a parsed JSON value into a feature collection.
///
/// A bare `Feature` or `Geometry` is wrapped into a one-element collection and
/// a top-level array is flattened member by member. Features lacking a
/// `geometry` member are kept with a null geometry. Anything that is not
/// GeoJSON is reported as a render error, since the renderer is the component
/// that interprets the document.
pub fn into_feature_collection(mut value: JsonValue) -> LoaderResult<FeatureCollection> {
    if let JsonValue::Array(members) = value {
        let mut features = Vec::new();
        for member in members {
            features.extend(into_feature_collection(member)?.features);
        }
        return Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        });
    }

    fill_missing_geometry(&mut value);
    let geojson = GeoJson::from_json_value(value)
        .map_err(|e| LoaderError::Render(format!("Invalid GeoJSON object. {}", e)))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        GeoJson::Geometry(geometry) => Ok(FeatureCollection {
            bbox: None,
            features: vec![Feature {
                bbox: None,
                geometry: Some(geometry),
                id: None,
                properties: None,
                foreign_members: None,
            }],
            foreign_members: None,
        }),
    }
}

fn fill_missing_geometry(value: &mut JsonValue) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    match object.get("type").and_then(JsonValue::as_str) {
        Some("Feature") => {
            object.entry("geometry").or_insert(JsonValue::Null);
        }
        Some("FeatureCollection") => {
            if let Some(JsonValue::Array(features)) = object.get_mut("features") {
                features.iter_mut().for_each(fill_missing_geometry);
            }
        }
        _ => {}
    }
}

/// Properties of a feature, or `None` when absent or empty.
pub fn non_empty_properties(feature: &Feature) -> Option<&JsonObject> {
    feature.properties.as_ref().filter(|props| !props.is_empty())
}

/// Display form of a property value.
pub fn format_property_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_float).unwrap_or_else(|| n.to_string())
            }
        }
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                other => format_property_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => value.to_string(),
    }
}

/// Shortest float form, switching to exponent notation below 1e-6 and from
/// 1e21 upward with an explicit sign on the exponent (`1e+21`, `1.5e-7`).
fn format_float(f: f64) -> String {
    let magnitude = f.abs();
    if f == 0.0 || !f.is_finite() || (1e-6..1e21).contains(&magnitude) {
        // f64's Display drops a zero fraction: 3.0 renders as "3"
        return f.to_string();
    }

    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exp,
    }
}
