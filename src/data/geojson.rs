use crate::core::geo::{LatLng, LatLngBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A GeoJSON position: longitude, latitude and an optional altitude/depth
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, serde_json::Value>>,
}

/// Root GeoJSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<GeoJsonFeature> },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn from_str(geojson_str: &str) -> crate::Result<Self> {
        serde_json::from_str(geojson_str)
            .map_err(|e| crate::Error::ParseError(format!("Invalid GeoJSON: {}", e)))
    }

    /// All features, whether the root is a single feature or a collection
    pub fn features(&self) -> Vec<&GeoJsonFeature> {
        match self {
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::FeatureCollection { features } => features.iter().collect(),
        }
    }

    /// Gets the bounding box of all features
    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.features()
            .into_iter()
            .filter_map(|feature| feature.geometry.as_ref())
            .filter_map(|geometry| LatLngBounds::from_points(&geometry.to_lat_lng_points()))
            .reduce(|a, b| a.union(&b))
    }
}

impl GeoJsonFeature {
    /// A property value, if present and not null
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.get(key))
            .filter(|value| !value.is_null())
    }

    /// The feature id rendered as a string
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(id) => Some(id.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

fn to_lat_lngs(positions: &[Position]) -> Vec<LatLng> {
    positions
        .iter()
        .filter_map(|p| LatLng::from_position(p))
        .collect()
}

impl GeoJsonGeometry {
    /// Converts coordinates to LatLng points (exterior rings only for polygons)
    pub fn to_lat_lng_points(&self) -> Vec<LatLng> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                LatLng::from_position(coordinates).into_iter().collect()
            }
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => to_lat_lngs(coordinates),
            GeoJsonGeometry::Polygon { coordinates } => coordinates
                .first()
                .map(|exterior| to_lat_lngs(exterior))
                .unwrap_or_default(),
            GeoJsonGeometry::MultiLineString { coordinates } => coordinates
                .iter()
                .flat_map(|line| to_lat_lngs(line))
                .collect(),
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|polygon| polygon.first())
                .flat_map(|exterior| to_lat_lngs(exterior))
                .collect(),
            GeoJsonGeometry::GeometryCollection { geometries } => geometries
                .iter()
                .flat_map(|geom| geom.to_lat_lng_points())
                .collect(),
        }
    }

    /// Line strings contained in the geometry, as LatLng paths
    pub fn to_lines(&self) -> Vec<Vec<LatLng>> {
        match self {
            GeoJsonGeometry::LineString { coordinates } => vec![to_lat_lngs(coordinates)],
            GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().map(|line| to_lat_lngs(line)).collect()
            }
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(|geom| geom.to_lines()).collect()
            }
            _ => Vec::new(),
        }
    }
}
