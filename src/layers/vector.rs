use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{RenderContext, StyleConversion},
    spatial::index::{SpatialIndex, SpatialItem},
    style::color::Color,
    ui::popup::Popup,
    Result,
};

use crate::prelude::HashMap;
use serde::{Deserialize, Serialize};

/// Extra screen distance, in pixels, that still counts as a hit on a feature
pub const HIT_TOLERANCE_PX: f64 = 4.0;

/// Style for circle features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    /// Fill color
    pub fill_color: Color,
    /// Border color
    pub stroke_color: Color,
    /// Whether the border is drawn
    pub stroke: bool,
    /// Border width in pixels
    pub stroke_width: f32,
    /// Fill opacity (0.0 to 1.0)
    pub fill_opacity: f32,
    /// Border opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::BLUE,
            stroke_color: Color::BLUE,
            stroke: true,
            stroke_width: 3.0,
            fill_opacity: 0.2,
            opacity: 1.0,
        }
    }
}

/// Style for line features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color
    pub color: Color,
    /// Line width
    pub width: f32,
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            width: 2.0,
            opacity: 1.0,
        }
    }
}

/// Different types of vector features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorFeature {
    /// A circle whose radius is a ground distance in metres
    Circle {
        center: LatLng,
        radius: f64,
        style: CircleStyle,
    },
    /// A line string (path)
    LineString {
        points: Vec<LatLng>,
        style: LineStyle,
    },
    /// A multi-line collection
    MultiLineString {
        lines: Vec<Vec<LatLng>>,
        style: LineStyle,
    },
}

impl VectorFeature {
    /// Get the bounding box of this feature
    pub fn bounds(&self) -> LatLngBounds {
        match self {
            VectorFeature::Circle { center, radius, .. } => {
                let lat_delta = (radius.abs() / EARTH_RADIUS).to_degrees();
                let lng_delta = lat_delta / center.lat.to_radians().cos().abs().max(1e-6);
                LatLngBounds::from_coords(
                    center.lat - lat_delta,
                    center.lng - lng_delta,
                    center.lat + lat_delta,
                    center.lng + lng_delta,
                )
            }
            VectorFeature::LineString { points, .. } => Self::bounds_from_points(points),
            VectorFeature::MultiLineString { lines, .. } => lines
                .iter()
                .filter_map(|line| LatLngBounds::from_points(line))
                .reduce(|a, b| a.union(&b))
                .unwrap_or_else(Self::empty_bounds),
        }
    }

    fn bounds_from_points(points: &[LatLng]) -> LatLngBounds {
        LatLngBounds::from_points(points).unwrap_or_else(Self::empty_bounds)
    }

    fn empty_bounds() -> LatLngBounds {
        LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.0))
    }

    /// Check if this feature intersects with the given bounds
    pub fn intersects_bounds(&self, bounds: &LatLngBounds) -> bool {
        self.bounds().intersects(bounds)
    }

    /// Whether a container pixel lies on the rendered feature
    fn hit_test(&self, viewport: &Viewport, pixel: &Point, tolerance: f64) -> bool {
        match self {
            VectorFeature::Circle { center, radius, .. } => {
                let screen_center = viewport.lat_lng_to_pixel(center);
                let screen_radius = viewport.meters_to_pixels(*radius, center.lat);
                screen_center.distance_to(pixel) <= screen_radius + tolerance
            }
            VectorFeature::LineString { points, style } => {
                line_hit(viewport, points, pixel, tolerance + style.width as f64 / 2.0)
            }
            VectorFeature::MultiLineString { lines, style } => lines
                .iter()
                .any(|line| line_hit(viewport, line, pixel, tolerance + style.width as f64 / 2.0)),
        }
    }
}

fn line_hit(viewport: &Viewport, points: &[LatLng], pixel: &Point, reach: f64) -> bool {
    let screen: Vec<Point> = points.iter().map(|p| viewport.lat_lng_to_pixel(p)).collect();
    screen
        .windows(2)
        .any(|segment| distance_to_segment(pixel, &segment[0], &segment[1]) <= reach)
}

fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let ab = b.subtract(a);
    let length_sq = ab.x * ab.x + ab.y * ab.y;
    if length_sq == 0.0 {
        return p.distance_to(a);
    }
    let ap = p.subtract(a);
    let t = ((ap.x * ab.x + ap.y * ab.y) / length_sq).clamp(0.0, 1.0);
    p.distance_to(&a.add(&ab.multiply(t)))
}

/// A feature with associated data and unique ID
#[derive(Debug, Clone)]
pub struct VectorFeatureData {
    /// Unique identifier
    pub id: String,
    /// The geometric feature
    pub feature: VectorFeature,
    /// Popup shown when the feature is selected
    pub popup: Option<Popup>,
    /// Associated properties/data
    pub properties: HashMap<String, serde_json::Value>,
}

impl VectorFeatureData {
    /// Create a new feature with the given ID and geometry
    pub fn new(id: String, feature: VectorFeature) -> Self {
        Self {
            id,
            feature,
            popup: None,
            properties: HashMap::default(),
        }
    }

    /// Bind a popup to this feature
    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Add a property to this feature
    pub fn with_property<V: Into<serde_json::Value>>(
        mut self,
        key: impl Into<String>,
        value: V,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }
}

/// Vector layer for displaying geometric features.
/// Features render in insertion order, so later features draw on top.
pub struct VectorLayer {
    /// Base layer properties
    properties: LayerProperties,
    features: Vec<VectorFeatureData>,
    /// Feature bounds keyed by position in `features`
    spatial_index: SpatialIndex<usize>,
}

impl VectorLayer {
    /// Create a new vector layer
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector),
            features: Vec::new(),
            spatial_index: SpatialIndex::new(),
        }
    }

    /// Add a feature to the layer
    pub fn add_feature(&mut self, feature: VectorFeatureData) {
        let bounds = feature.feature.bounds();
        self.spatial_index
            .insert(SpatialItem::new(bounds, self.features.len()));
        self.features.push(feature);
    }

    /// Get a feature by ID
    pub fn get_feature(&self, id: &str) -> Option<&VectorFeatureData> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Get all features in draw order
    pub fn features(&self) -> &[VectorFeatureData] {
        &self.features
    }

    /// Get features that intersect with the given bounds, in draw order
    pub fn features_in_bounds(&self, bounds: &LatLngBounds) -> Vec<&VectorFeatureData> {
        let mut indices: Vec<usize> = self
            .spatial_index
            .query(bounds)
            .into_iter()
            .map(|item| item.data)
            .collect();
        indices.sort_unstable();
        indices
            .into_iter()
            .filter_map(|index| self.features.get(index))
            .collect()
    }

    /// Topmost feature drawn under a container pixel
    pub fn feature_at(
        &self,
        viewport: &Viewport,
        pixel: &Point,
        tolerance: f64,
    ) -> Option<&VectorFeatureData> {
        self.copy_at(viewport, pixel, tolerance).map(|(data, _)| data)
    }

    /// Like [`feature_at`](Self::feature_at), also returning the longitude
    /// offset of the world copy the feature was hit on
    fn copy_at(
        &self,
        viewport: &Viewport,
        pixel: &Point,
        tolerance: f64,
    ) -> Option<(&VectorFeatureData, f64)> {
        viewport.world_offsets().into_iter().find_map(|offset| {
            let local = pixel.subtract(&Point::new(viewport.world_copy_shift(offset), 0.0));
            let corner_a =
                viewport.pixel_to_lat_lng(&Point::new(local.x - tolerance, local.y - tolerance));
            let corner_b =
                viewport.pixel_to_lat_lng(&Point::new(local.x + tolerance, local.y + tolerance));
            let search = LatLngBounds::from_points(&[corner_a, corner_b])?;

            self.features_in_bounds(&search)
                .into_iter()
                .rev()
                .find(|data| data.feature.hit_test(viewport, &local, tolerance))
                .map(|data| (data, offset))
        })
    }

    /// Get feature count
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Clear all features
    pub fn clear(&mut self) {
        self.features.clear();
        self.spatial_index.clear();
    }

    /// Get the bounds of all features in this layer
    pub fn get_layer_bounds(&self) -> Option<LatLngBounds> {
        self.spatial_index.bounds()
    }

    /// Render a single feature, moved right by `shift` pixels
    fn render_feature(
        &self,
        context: &mut RenderContext,
        viewport: &Viewport,
        feature_data: &VectorFeatureData,
        shift: f64,
    ) {
        let opacity_multiplier = self.opacity();
        let to_screen = |p: &LatLng| {
            let pixel = viewport.lat_lng_to_pixel(p);
            Point::new(pixel.x + shift, pixel.y)
        };

        match &feature_data.feature {
            VectorFeature::Circle {
                center,
                radius,
                style,
            } => {
                let screen_center = to_screen(center);
                let screen_radius = viewport.meters_to_pixels(*radius, center.lat) as f32;
                context.render_circle(
                    &screen_center,
                    screen_radius,
                    &style.to_render_style(opacity_multiplier),
                );
            }
            VectorFeature::LineString { points, style } => {
                let screen_points: Vec<Point> = points.iter().map(to_screen).collect();
                context.render_line(&screen_points, &style.to_render_style(opacity_multiplier));
            }
            VectorFeature::MultiLineString { lines, style } => {
                let render_style = style.to_render_style(opacity_multiplier);
                for line in lines {
                    let screen_points: Vec<Point> = line.iter().map(to_screen).collect();
                    context.render_line(&screen_points, &render_style);
                }
            }
        }
    }
}

impl LayerTrait for VectorLayer {
    crate::impl_layer_trait!(VectorLayer, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.get_layer_bounds()
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        // features are stored once; each world copy in view gets its own pass
        let bounds = viewport.bounds();
        for offset in viewport.world_offsets() {
            let shift = viewport.world_copy_shift(offset);
            for feature_data in self.features_in_bounds(&bounds.shift_lng(-offset)) {
                self.render_feature(context, viewport, feature_data, shift);
            }
        }

        Ok(())
    }

    fn popup_at(&self, viewport: &Viewport, pixel: &Point) -> Option<Popup> {
        if !self.is_visible() {
            return None;
        }
        let (data, offset) = self.copy_at(viewport, pixel, HIT_TOLERANCE_PX)?;
        let mut popup = data.popup.clone()?;
        popup.position.lng += offset;
        Some(popup)
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }
}
