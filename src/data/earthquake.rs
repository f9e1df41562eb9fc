//! Typed views over the two feeds the map consumes

use crate::{
    core::geo::LatLng,
    data::geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry},
    MapError, Result,
};

/// Placeholder used when the feed has no place description
pub const UNKNOWN_PLACE: &str = "Unknown location";

/// One earthquake from the USGS summary feed
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeFeature {
    pub id: Option<String>,
    pub place: String,
    pub magnitude: f64,
    /// Longitude, latitude, depth (km)
    pub coordinates: [f64; 3],
}

impl EarthquakeFeature {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.coordinates[1], self.coordinates[0])
    }

    pub fn depth(&self) -> f64 {
        self.coordinates[2]
    }

    /// Extracts every usable earthquake from a feed document.
    /// Features without a point geometry or a magnitude are skipped.
    pub fn from_geojson(geojson: &GeoJson) -> Vec<Self> {
        geojson
            .features()
            .into_iter()
            .filter_map(|feature| match Self::try_from(feature) {
                Ok(quake) => Some(quake),
                Err(e) => {
                    log::debug!("Skipping earthquake feature: {}", e);
                    None
                }
            })
            .collect()
    }
}

impl TryFrom<&GeoJsonFeature> for EarthquakeFeature {
    type Error = MapError;

    fn try_from(feature: &GeoJsonFeature) -> Result<Self> {
        let id = feature.id_string();
        let label = id.clone().unwrap_or_else(|| "<no id>".to_string());

        let coordinates = match &feature.geometry {
            Some(GeoJsonGeometry::Point { coordinates }) => match coordinates.as_slice() {
                [lng, lat] => [*lng, *lat, 0.0],
                [lng, lat, depth, ..] => [*lng, *lat, *depth],
                _ => {
                    return Err(MapError::ParseError(format!(
                        "feature {} has a malformed position",
                        label
                    )))
                }
            },
            _ => {
                return Err(MapError::ParseError(format!(
                    "feature {} is not a point",
                    label
                )))
            }
        };

        let magnitude = feature
            .property("mag")
            .and_then(|value| value.as_f64())
            .ok_or_else(|| MapError::ParseError(format!("feature {} has no magnitude", label)))?;

        let place = feature
            .property("place")
            .and_then(|value| value.as_str())
            .unwrap_or(UNKNOWN_PLACE)
            .to_string();

        Ok(Self {
            id,
            place,
            magnitude,
            coordinates,
        })
    }
}

/// One plate boundary segment from the PB2002 dataset
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundaryFeature {
    pub name: Option<String>,
    pub lines: Vec<Vec<LatLng>>,
}

impl PlateBoundaryFeature {
    /// Extracts the line features of a boundary document; other geometries are skipped
    pub fn from_geojson(geojson: &GeoJson) -> Vec<Self> {
        geojson
            .features()
            .into_iter()
            .filter_map(|feature| {
                let lines: Vec<Vec<LatLng>> = feature
                    .geometry
                    .as_ref()?
                    .to_lines()
                    .into_iter()
                    .filter(|line| line.len() >= 2)
                    .collect();
                if lines.is_empty() {
                    return None;
                }

                let name = feature
                    .property("Name")
                    .or_else(|| feature.property("name"))
                    .and_then(|value| value.as_str())
                    .map(str::to_string);

                Some(Self { name, lines })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "id": "ak1",
              "properties": { "mag": 2.1, "place": "50 km W of Willow, Alaska" },
              "geometry": { "type": "Point", "coordinates": [-150.9, 61.7, 40.2] } },
            { "type": "Feature", "id": "nc2",
              "properties": { "mag": null, "place": "The Geysers, CA" },
              "geometry": { "type": "Point", "coordinates": [-122.8, 38.8, 1.5] } },
            { "type": "Feature", "id": "us3",
              "properties": { "mag": 5.6, "place": null },
              "geometry": { "type": "Point", "coordinates": [142.3, 38.1] } },
            { "type": "Feature", "id": "xx4",
              "properties": { "mag": 1.0 },
              "geometry": null }
        ]
    }"#;

    #[test]
    fn test_extracts_usable_earthquakes() {
        let geojson = GeoJson::from_str(FEED).unwrap();
        let quakes = EarthquakeFeature::from_geojson(&geojson);

        assert_eq!(quakes.len(), 2);
        assert_eq!(quakes[0].id.as_deref(), Some("ak1"));
        assert_eq!(quakes[0].place, "50 km W of Willow, Alaska");
        assert_eq!(quakes[0].magnitude, 2.1);
        assert_eq!(quakes[0].position(), LatLng::new(61.7, -150.9));
        assert_eq!(quakes[0].depth(), 40.2);
    }

    #[test]
    fn test_missing_place_and_depth_defaults() {
        let geojson = GeoJson::from_str(FEED).unwrap();
        let quakes = EarthquakeFeature::from_geojson(&geojson);

        assert_eq!(quakes[1].place, UNKNOWN_PLACE);
        assert_eq!(quakes[1].depth(), 0.0);
    }

    #[test]
    fn test_null_magnitude_is_rejected() {
        let geojson = GeoJson::from_str(FEED).unwrap();
        let features = geojson.features();
        let err = EarthquakeFeature::try_from(features[1]).unwrap_err();
        assert!(err.to_string().contains("nc2"));
    }

    #[test]
    fn test_plate_boundaries() {
        let geojson = GeoJson::from_str(
            r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature",
                  "properties": { "LAYER": "plate boundary", "Name": "AF-AN", "Source": "Mueller et al. [1987]" },
                  "geometry": { "type": "LineString", "coordinates": [[-0.4379, -54.8518], [-0.0383, -54.6772], [0.0131, -54.6703]] } },
                { "type": "Feature", "properties": { "Name": "dot" },
                  "geometry": { "type": "Point", "coordinates": [1.0, 2.0] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "MultiLineString", "coordinates": [[[10.0, 1.0], [11.0, 2.0]], [[12.0, 3.0]]] } }
            ]
        }"#,
        )
        .unwrap();

        let plates = PlateBoundaryFeature::from_geojson(&geojson);
        assert_eq!(plates.len(), 2);
        assert_eq!(plates[0].name.as_deref(), Some("AF-AN"));
        assert_eq!(plates[0].lines[0].len(), 3);
        assert_eq!(plates[1].name, None);
        // the single-vertex part of the multi-line is dropped
        assert_eq!(plates[1].lines.len(), 1);
    }
}
