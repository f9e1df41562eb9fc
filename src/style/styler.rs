use crate::{
    core::{config::MapConfig, geo::LatLng},
    data::earthquake::EarthquakeFeature,
    layers::vector::{CircleStyle, VectorFeature, VectorFeatureData},
    style::{classifier::MagnitudePalette, color::Color, sizer::MarkerSizer},
    ui::popup::Popup,
};

/// Per-feature styling computed on every render pass
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    pub color: Color,
    /// Radius in metres
    pub radius: f64,
    pub popup_text: String,
}

/// Strategy the composer uses to turn earthquake features into map markers
pub trait FeatureStyler: Send + Sync {
    /// Colour, radius and popup text for a feature
    fn style_for_feature(&self, feature: &EarthquakeFeature) -> StyleDescriptor;

    /// Popup text shown when the feature's marker is selected
    fn popup_text_for_feature(&self, feature: &EarthquakeFeature) -> String;

    /// Marker placed at `position` for the feature
    fn marker_for_point(&self, feature: &EarthquakeFeature, position: LatLng) -> VectorFeatureData;
}

/// Magnitude-driven circle markers: palette colour, linear radius, place and
/// magnitude in the popup
#[derive(Debug, Clone)]
pub struct EarthquakeStyler {
    palette: MagnitudePalette,
    sizer: MarkerSizer,
    fill_opacity: f32,
    stroke: bool,
    stroke_weight: f32,
}

impl EarthquakeStyler {
    pub fn new(palette: MagnitudePalette, sizer: MarkerSizer) -> Self {
        Self {
            palette,
            sizer,
            fill_opacity: crate::constants::MARKER_FILL_OPACITY,
            stroke: true,
            stroke_weight: crate::constants::MARKER_STROKE_WEIGHT,
        }
    }

    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            sizer: MarkerSizer::new(config.markers.scale),
            fill_opacity: config.markers.fill_opacity,
            stroke: config.markers.stroke,
            stroke_weight: config.markers.stroke_weight,
        }
    }

    pub fn palette(&self) -> &MagnitudePalette {
        &self.palette
    }

    pub fn sizer(&self) -> MarkerSizer {
        self.sizer
    }
}

impl Default for EarthquakeStyler {
    fn default() -> Self {
        Self::new(MagnitudePalette::default(), MarkerSizer::default())
    }
}

impl FeatureStyler for EarthquakeStyler {
    fn style_for_feature(&self, feature: &EarthquakeFeature) -> StyleDescriptor {
        StyleDescriptor {
            color: self.palette.classify(feature.magnitude),
            radius: self.sizer.radius(feature.magnitude),
            popup_text: self.popup_text_for_feature(feature),
        }
    }

    fn popup_text_for_feature(&self, feature: &EarthquakeFeature) -> String {
        format!(
            "Location: {}\nMagnitude: {}",
            feature.place, feature.magnitude
        )
    }

    fn marker_for_point(&self, feature: &EarthquakeFeature, position: LatLng) -> VectorFeatureData {
        let descriptor = self.style_for_feature(feature);
        let style = CircleStyle {
            fill_color: descriptor.color,
            stroke_color: descriptor.color,
            stroke: self.stroke,
            stroke_width: self.stroke_weight,
            fill_opacity: self.fill_opacity,
            opacity: 1.0,
        };

        let id = feature
            .id
            .clone()
            .unwrap_or_else(|| format!("quake-{:.4}-{:.4}", position.lat, position.lng));

        VectorFeatureData::new(
            id,
            VectorFeature::Circle {
                center: position,
                radius: descriptor.radius,
                style,
            },
        )
        .with_popup(Popup::new(position, descriptor.popup_text))
        .with_property("mag", feature.magnitude)
        .with_property("place", feature.place.clone())
        .with_property("depth", feature.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quake(magnitude: f64) -> EarthquakeFeature {
        EarthquakeFeature {
            id: Some("ci1".into()),
            place: "10km SW of Ridgecrest, CA".into(),
            magnitude,
            coordinates: [-117.6, 35.7, 8.1],
        }
    }

    #[test]
    fn test_end_to_end_scenarios() {
        let styler = EarthquakeStyler::default();

        let small = styler.style_for_feature(&quake(0.5));
        assert_eq!(small.color.to_hex(), "#9bf442");
        assert_eq!(small.radius, 0.5 * 20_000.0);

        let boundary = styler.style_for_feature(&quake(2.0));
        assert_eq!(boundary.color.to_hex(), "#f9f104");
        assert_eq!(boundary.radius, 2.0 * 20_000.0);

        let large = styler.style_for_feature(&quake(6.0));
        assert_eq!(large.color.to_hex(), "#f92504");
    }

    #[test]
    fn test_popup_text_has_place_and_magnitude() {
        let text = EarthquakeStyler::default().popup_text_for_feature(&quake(4.4));
        assert_eq!(text, "Location: 10km SW of Ridgecrest, CA\nMagnitude: 4.4");
    }

    #[test]
    fn test_marker_for_point() {
        let styler = EarthquakeStyler::default();
        let feature = quake(3.5);
        let marker = styler.marker_for_point(&feature, feature.position());

        assert_eq!(marker.id, "ci1");
        match &marker.feature {
            VectorFeature::Circle {
                center,
                radius,
                style,
            } => {
                assert_eq!(*center, LatLng::new(35.7, -117.6));
                assert_eq!(*radius, 70_000.0);
                assert_eq!(style.fill_color.to_hex(), "#f9cd04");
                assert_eq!(style.fill_opacity, 0.7);
                assert_eq!(style.stroke_width, 0.5);
                assert!(style.stroke);
            }
            other => panic!("expected a circle, got {:?}", other),
        }
        assert!(marker.popup.as_ref().unwrap().content.contains("Magnitude: 3.5"));
        assert_eq!(marker.get_property("depth"), Some(&serde_json::json!(8.1)));
    }

    #[test]
    fn test_styling_does_not_mutate_feature() {
        let styler = EarthquakeStyler::default();
        let feature = quake(1.0);
        let before = feature.clone();
        let _ = styler.style_for_feature(&feature);
        let _ = styler.marker_for_point(&feature, feature.position());
        assert_eq!(feature, before);
    }

    #[test]
    fn test_from_config_uses_injected_scale() {
        let mut config = MapConfig::default();
        config.markers.scale = 1_000.0;
        let styler = EarthquakeStyler::from_config(&config);
        assert_eq!(styler.style_for_feature(&quake(3.0)).radius, 3_000.0);
    }
}
