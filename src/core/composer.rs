//! One-shot assembly of the earthquake map
//!
//! [`MapComposer`] is pure: it turns configuration plus already-loaded
//! features into layers and a [`Map`]. Fetching and the asynchronous arrival
//! of the plate boundaries are handled by the session.

use crate::{
    core::{config::MapConfig, geo::Point, map::Map},
    data::earthquake::{EarthquakeFeature, PlateBoundaryFeature},
    layers::{
        group::LayerGroup,
        tile::TileLayer,
        vector::{LineStyle, VectorFeature, VectorFeatureData},
    },
    style::styler::FeatureStyler,
    ui::controls::Legend,
    Result,
};

pub const EARTHQUAKES_LAYER_ID: &str = "earthquakes";
pub const EARTHQUAKES_LAYER_NAME: &str = "Earthquakes";
pub const PLATES_LAYER_ID: &str = "plates";
pub const PLATES_LAYER_NAME: &str = "Tectonic Plates";

pub struct MapComposer<'a> {
    config: &'a MapConfig,
}

impl<'a> MapComposer<'a> {
    pub fn new(config: &'a MapConfig) -> Self {
        Self { config }
    }

    /// Tile layers for every configured basemap, in display order
    pub fn basemaps(&self) -> Vec<TileLayer> {
        self.config
            .basemaps
            .iter()
            .map(|basemap| TileLayer::from_basemap(basemap, &self.config.access_token))
            .collect()
    }

    /// Empty earthquake overlay, filled by [`Self::earthquake_markers`]
    pub fn earthquake_group(&self) -> LayerGroup {
        LayerGroup::new(EARTHQUAKES_LAYER_ID.into(), EARTHQUAKES_LAYER_NAME.into())
    }

    /// Empty plate boundary overlay, filled by [`Self::plate_lines`]
    pub fn plate_group(&self) -> LayerGroup {
        LayerGroup::new(PLATES_LAYER_ID.into(), PLATES_LAYER_NAME.into())
    }

    /// One styled circle marker per earthquake, in feed order
    pub fn earthquake_markers(
        &self,
        earthquakes: &[EarthquakeFeature],
        styler: &dyn FeatureStyler,
    ) -> Vec<VectorFeatureData> {
        earthquakes
            .iter()
            .map(|quake| styler.marker_for_point(quake, quake.position()))
            .collect()
    }

    /// Plate boundaries as uniformly styled lines
    pub fn plate_lines(&self, plates: &[PlateBoundaryFeature]) -> Vec<VectorFeatureData> {
        let style = LineStyle {
            color: self.config.markers.plate_color,
            width: self.config.markers.plate_weight,
            opacity: 1.0,
        };

        plates
            .iter()
            .enumerate()
            .map(|(i, plate)| {
                let id = match &plate.name {
                    Some(name) => format!("plate-{}-{}", i, name),
                    None => format!("plate-{}", i),
                };
                let data = VectorFeatureData::new(
                    id,
                    VectorFeature::MultiLineString {
                        lines: plate.lines.clone(),
                        style: style.clone(),
                    },
                );
                match &plate.name {
                    Some(name) => data.with_property("name", name.clone()),
                    None => data,
                }
            })
            .collect()
    }

    /// Legend entries for the configured breakpoints
    pub fn legend(&self) -> Legend {
        Legend::from_breakpoints(
            &self.config.legend.breakpoints,
            &self.config.palette,
            self.config.legend.position,
        )
    }

    /// Assembles basemaps, both overlays, the layer control and the legend.
    /// The first basemap and both overlays start visible.
    pub fn compose(
        &self,
        earthquakes: LayerGroup,
        plates: LayerGroup,
        size: Point,
    ) -> Result<Map> {
        let mut map = Map::new(
            self.config.container_id.clone(),
            self.config.center,
            self.config.zoom,
            size,
        );

        for basemap in self.basemaps() {
            map.add_basemap(basemap)?;
        }
        map.add_overlay(Box::new(earthquakes))?;
        map.add_overlay(Box::new(plates))?;
        map.set_layer_control_collapsed(self.config.layer_control_collapsed);
        map.set_legend(self.legend());

        log::info!(
            "Composed map '{}' with layers {:?}",
            map.container_id(),
            map.list_layers()
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        layers::base::LayerTrait,
        style::styler::EarthquakeStyler,
        ui::controls::ControlPosition,
    };

    fn quakes() -> Vec<EarthquakeFeature> {
        vec![
            EarthquakeFeature {
                id: Some("a".into()),
                place: "Near A".into(),
                magnitude: 0.5,
                coordinates: [-118.0, 36.0, 4.0],
            },
            EarthquakeFeature {
                id: Some("b".into()),
                place: "Near B".into(),
                magnitude: 5.2,
                coordinates: [-96.0, 37.0, 10.0],
            },
        ]
    }

    #[test]
    fn test_compose_default_layout() {
        let config = MapConfig::default();
        let composer = MapComposer::new(&config);

        let map = composer
            .compose(
                composer.earthquake_group(),
                composer.plate_group(),
                Point::new(800.0, 600.0),
            )
            .unwrap();

        assert_eq!(map.container_id(), "map-id");
        assert_eq!(map.viewport().center, LatLng::new(37.09, -95.71));
        assert_eq!(map.viewport().zoom, 5.0);
        assert_eq!(map.active_basemap(), Some("light"));
        assert!(map.is_layer_visible(EARTHQUAKES_LAYER_ID));
        assert!(map.is_layer_visible(PLATES_LAYER_ID));
        assert!(!map.layer_control().collapsed);

        let overlays: Vec<&str> = map
            .layer_control()
            .overlays()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(overlays, vec!["Earthquakes", "Tectonic Plates"]);

        let legend = map.legend().unwrap();
        assert_eq!(legend.position, ControlPosition::BottomRight);
        assert_eq!(legend.entries.len(), 6);
    }

    #[test]
    fn test_markers_match_legend_colors() {
        let config = MapConfig::default();
        let composer = MapComposer::new(&config);
        let styler = EarthquakeStyler::from_config(&config);

        let markers = composer.earthquake_markers(&quakes(), &styler);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].id, "a");

        let legend = composer.legend();
        let fill = |index: usize| match &markers[index].feature {
            VectorFeature::Circle { style, .. } => style.fill_color,
            other => panic!("expected a circle, got {:?}", other),
        };

        // 0.5 sits in the "0–1" row and 5.2 in the "5+" row
        assert_eq!(legend.entries[0].label, "0–1");
        assert_eq!(fill(0), legend.entries[0].color);
        assert_eq!(legend.entries[5].label, "5+");
        assert_eq!(fill(1), legend.entries[5].color);

        match &markers[1].feature {
            VectorFeature::Circle { radius, .. } => assert_eq!(*radius, 5.2 * 20_000.0),
            other => panic!("expected a circle, got {:?}", other),
        }
    }

    #[test]
    fn test_plate_lines_use_configured_style() {
        let config = MapConfig::default();
        let composer = MapComposer::new(&config);
        let plates = vec![PlateBoundaryFeature {
            name: Some("NA-PA".into()),
            lines: vec![vec![LatLng::new(40.0, -125.0), LatLng::new(41.0, -124.0)]],
        }];

        let lines = composer.plate_lines(&plates);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].get_property("name"), Some(&serde_json::json!("NA-PA")));
        match &lines[0].feature {
            VectorFeature::MultiLineString { style, .. } => {
                assert_eq!(style.color.to_hex(), "#0000ff");
                assert_eq!(style.width, 2.0);
            }
            other => panic!("expected lines, got {:?}", other),
        }
    }

    #[test]
    fn test_group_filled_after_compose_shows_in_map() {
        let config = MapConfig::default();
        let composer = MapComposer::new(&config);
        let plates = composer.plate_group();
        let handle = plates.clone();

        let map = composer
            .compose(composer.earthquake_group(), plates, Point::new(800.0, 600.0))
            .unwrap();
        assert_eq!(map.get_layer(PLATES_LAYER_ID).unwrap().feature_count(), 0);

        handle.set_features(composer.plate_lines(&[PlateBoundaryFeature {
            name: None,
            lines: vec![vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]],
        }]));
        assert_eq!(map.get_layer(PLATES_LAYER_ID).unwrap().feature_count(), 1);
    }

    #[test]
    fn test_basemaps_carry_access_token() {
        let config = MapConfig {
            access_token: "pk.abc".into(),
            ..Default::default()
        };
        let basemaps = MapComposer::new(&config).basemaps();
        assert_eq!(basemaps.len(), 2);
        assert_eq!(basemaps[1].name(), "Satellite Map");
        assert_eq!(basemaps[1].tile_options().access_token, "pk.abc");
    }
}
