use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::{base::LayerTrait, group::LayerGroup, manager::LayerManager, tile::TileLayer},
    rendering::context::RenderContext,
    ui::{
        controls::{ControlKind, LayerControl, LayerControlRow, Legend},
        popup::Popup,
    },
    MapError, Result,
};

/// Basemap layers sit below every overlay
const BASEMAP_Z_INDEX: i32 = -1;

/// A composed, renderable map: the view, its layers, the layer control and
/// the legend, plus the popup of the currently selected feature.
pub struct Map {
    container_id: String,
    viewport: Viewport,
    layer_manager: LayerManager,
    layer_control: LayerControl,
    active_basemap: Option<String>,
    legend: Option<Legend>,
    selected_popup: Option<Popup>,
}

impl Map {
    pub fn new(container_id: impl Into<String>, center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            container_id: container_id.into(),
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            layer_control: LayerControl::new(false),
            active_basemap: None,
            legend: None,
            selected_popup: None,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_center(center);
        self.viewport.set_zoom(zoom);
    }

    /// Pans by a pixel offset, as produced by a drag
    pub fn pan(&mut self, delta: Point) {
        self.viewport.pan(delta);
    }

    /// Zooms, keeping the point under `focus_point` (container pixels) fixed
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        self.viewport.zoom_to(zoom, focus_point);
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Adds a layer that is not listed in the layer control
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.layer_manager.add_layer(layer)
    }

    /// Adds a base layer. The first one added becomes active; later ones
    /// start hidden until selected.
    pub fn add_basemap(&mut self, mut layer: TileLayer) -> Result<()> {
        let id = layer.id().to_string();
        let name = layer.name().to_string();

        layer.set_z_index(BASEMAP_Z_INDEX);
        layer.set_visible(self.active_basemap.is_none());
        self.layer_manager.add_layer(Box::new(layer))?;

        if self.active_basemap.is_none() {
            self.active_basemap = Some(id.clone());
        }
        self.layer_control.add_base_layer(id, name);
        Ok(())
    }

    /// Adds an overlay listed in the layer control, initially visible
    pub fn add_overlay(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let id = layer.id().to_string();
        let name = layer.name().to_string();
        self.layer_manager.add_layer(layer)?;
        self.layer_control.add_overlay(id, name);
        Ok(())
    }

    /// Makes `id` the only visible base layer
    pub fn select_basemap(&mut self, id: &str) -> Result<()> {
        if !self.layer_control.is_base_layer(id) {
            return Err(MapError::Layer(format!("'{}' is not a base layer", id)));
        }

        let base_ids: Vec<String> = self
            .layer_control
            .base_layers()
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
        for base_id in base_ids {
            let visible = base_id == id;
            self.layer_manager
                .with_layer_mut(&base_id, |layer| layer.set_visible(visible));
        }

        log::debug!("Basemap switched to {}", id);
        self.active_basemap = Some(id.to_string());
        Ok(())
    }

    pub fn active_basemap(&self) -> Option<&str> {
        self.active_basemap.as_deref()
    }

    /// Shows or hides an overlay; other overlays are unaffected
    pub fn set_overlay_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        if !self.layer_control.is_overlay(id) {
            return Err(MapError::Layer(format!("'{}' is not an overlay", id)));
        }
        self.layer_manager
            .with_layer_mut(id, |layer| layer.set_visible(visible));
        if !visible {
            self.selected_popup = None;
        }
        Ok(())
    }

    pub fn is_layer_visible(&self, id: &str) -> bool {
        self.layer_manager
            .get_layer(id)
            .is_some_and(|layer| layer.is_visible())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    /// Layer ids in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    /// The group behind an overlay, if the overlay is a [`LayerGroup`]
    pub fn group(&self, id: &str) -> Option<&LayerGroup> {
        self.layer_manager
            .get_layer(id)
            .and_then(|layer| layer.as_any().downcast_ref::<LayerGroup>())
    }

    pub fn layer_control(&self) -> &LayerControl {
        &self.layer_control
    }

    pub fn set_layer_control_collapsed(&mut self, collapsed: bool) {
        self.layer_control.collapsed = collapsed;
    }

    /// Layer control rows as they should be displayed right now
    pub fn layer_control_rows(&self) -> Vec<LayerControlRow> {
        let bases = self.layer_control.base_layers().iter().map(|entry| {
            let checked = self.active_basemap.as_deref() == Some(entry.id.as_str());
            LayerControlRow::new(entry, ControlKind::Base, checked)
        });

        let overlays = self.layer_control.overlays().iter().map(|entry| {
            let row = LayerControlRow::new(entry, ControlKind::Overlay, self.is_layer_visible(&entry.id));
            match self.group(&entry.id) {
                Some(group) => row.with_status(&group.status()),
                None => row,
            }
        });

        bases.chain(overlays).collect()
    }

    pub fn set_legend(&mut self, legend: Legend) {
        self.legend = Some(legend);
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Draws every visible layer into `context`
    pub fn render(&mut self, context: &mut RenderContext) -> Result<()> {
        context.begin_frame();
        self.layer_manager.render(context, &self.viewport)
    }

    /// Popup of the topmost visible feature under a container pixel
    pub fn popup_at(&self, pixel: &Point) -> Option<Popup> {
        self.layer_manager.popup_at(&self.viewport, pixel)
    }

    /// Selects the feature under a click, or clears the selection when the
    /// click hits nothing
    pub fn click(&mut self, pixel: &Point) -> Option<&Popup> {
        self.selected_popup = self.popup_at(pixel);
        self.selected_popup.as_ref()
    }

    pub fn selected_popup(&self) -> Option<&Popup> {
        self.selected_popup.as_ref()
    }

    pub fn close_popup(&mut self) {
        self.selected_popup = None;
    }

    /// Description of the composed map for logs and headless output
    pub fn summary(&self) -> serde_json::Value {
        let layers: Vec<serde_json::Value> = self
            .layer_manager
            .layers()
            .into_iter()
            .map(|layer| {
                let mut options = layer.options();
                options["feature_count"] = layer.feature_count().into();
                options
            })
            .collect();

        serde_json::json!({
            "container": self.container_id,
            "center": [self.viewport.center.lat, self.viewport.center.lng],
            "zoom": self.viewport.zoom,
            "active_basemap": self.active_basemap,
            "layers": layers,
            "layer_control": {
                "collapsed": self.layer_control.collapsed,
                "rows": self.layer_control_rows(),
            },
            "legend": self.legend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layers::vector::{CircleStyle, VectorFeature, VectorFeatureData},
        rendering::context::DrawCommand,
        style::classifier::MagnitudePalette,
        ui::controls::ControlPosition,
    };

    fn map() -> Map {
        let mut map = Map::new(
            "map-id",
            LatLng::new(37.09, -95.71),
            5.0,
            Point::new(800.0, 600.0),
        );
        map.add_basemap(TileLayer::new("light".into(), "Light Map".into()))
            .unwrap();
        map.add_basemap(TileLayer::new("satellite".into(), "Satellite Map".into()))
            .unwrap();
        map
    }

    fn quake_group() -> LayerGroup {
        let group = LayerGroup::new("earthquakes".into(), "Earthquakes".into());
        let center = LatLng::new(37.09, -95.71);
        group.set_features(vec![VectorFeatureData::new(
            "q1".into(),
            VectorFeature::Circle {
                center,
                radius: 60_000.0,
                style: CircleStyle::default(),
            },
        )
        .with_popup(Popup::new(center, "Location: Kansas\nMagnitude: 3"))]);
        group
    }

    #[test]
    fn test_map_creation() {
        let map = Map::new("map-id", LatLng::new(0.0, 0.0), 1.0, Point::new(800.0, 600.0));
        assert_eq!(map.container_id(), "map-id");
        assert_eq!(map.viewport().center, LatLng::new(0.0, 0.0));
        assert_eq!(map.viewport().zoom, 1.0);
        assert!(map.list_layers().is_empty());
    }

    #[test]
    fn test_exactly_one_basemap_visible() {
        let mut map = map();
        assert_eq!(map.active_basemap(), Some("light"));
        assert!(map.is_layer_visible("light"));
        assert!(!map.is_layer_visible("satellite"));

        map.select_basemap("satellite").unwrap();
        assert_eq!(map.active_basemap(), Some("satellite"));
        assert!(!map.is_layer_visible("light"));
        assert!(map.is_layer_visible("satellite"));

        assert!(map.select_basemap("terrain").is_err());
    }

    #[test]
    fn test_overlays_toggle_independently() {
        let mut map = map();
        map.add_overlay(Box::new(quake_group())).unwrap();
        map.add_overlay(Box::new(LayerGroup::new(
            "plates".into(),
            "Tectonic Plates".into(),
        )))
        .unwrap();

        map.set_overlay_visible("earthquakes", false).unwrap();
        assert!(!map.is_layer_visible("earthquakes"));
        assert!(map.is_layer_visible("plates"));

        map.set_overlay_visible("earthquakes", true).unwrap();
        assert!(map.is_layer_visible("earthquakes"));

        assert!(map.set_overlay_visible("light", false).is_err());
    }

    #[test]
    fn test_layer_control_rows() {
        let mut map = map();
        map.add_overlay(Box::new(quake_group())).unwrap();
        map.add_overlay(Box::new(LayerGroup::new(
            "plates".into(),
            "Tectonic Plates".into(),
        )))
        .unwrap();

        let rows = map.layer_control_rows();
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Light Map", "Satellite Map", "Earthquakes", "Tectonic Plates"]
        );
        assert!(rows[0].checked && !rows[1].checked);
        assert_eq!(rows[2].status.as_deref(), Some("1 features"));
        assert_eq!(rows[3].status.as_deref(), Some("loading"));
        assert_eq!(rows[0].kind, ControlKind::Base);
    }

    #[test]
    fn test_render_draws_basemap_then_overlays() {
        let mut map = map();
        map.add_overlay(Box::new(quake_group())).unwrap();

        let mut context = RenderContext::new(800, 600);
        map.render(&mut context).unwrap();

        let queue = context.get_drawing_queue();
        assert!(matches!(queue.first(), Some(DrawCommand::Tile { .. })));
        assert!(matches!(queue.last(), Some(DrawCommand::Circle { .. })));
        assert!(queue.iter().all(|cmd| match cmd {
            DrawCommand::Tile { url, .. } => url.contains("/5/"),
            _ => true,
        }));
    }

    #[test]
    fn test_click_selects_popup() {
        let mut map = map();
        map.add_overlay(Box::new(quake_group())).unwrap();

        let center = Point::new(400.0, 300.0);
        let popup = map.click(&center).cloned().unwrap();
        assert!(popup.content.contains("Magnitude: 3"));
        assert_eq!(map.selected_popup(), Some(&popup));

        map.set_overlay_visible("earthquakes", false).unwrap();
        assert!(map.selected_popup().is_none());
        assert!(map.click(&center).is_none());
    }

    #[test]
    fn test_pan_and_zoom() {
        let mut map = map();
        map.pan(Point::new(100.0, 0.0));
        assert!(map.viewport().center.lng < -95.71);

        map.zoom_to(7.0, Some(Point::new(400.0, 300.0)));
        assert_eq!(map.viewport().zoom, 7.0);

        map.set_view(LatLng::new(10.0, 20.0), 3.0);
        assert_eq!(map.viewport().center, LatLng::new(10.0, 20.0));
    }

    #[test]
    fn test_summary() {
        let mut map = map();
        map.add_overlay(Box::new(quake_group())).unwrap();
        map.set_legend(Legend::from_breakpoints(
            &[0.0, 1.0],
            &MagnitudePalette::default(),
            ControlPosition::BottomRight,
        ));

        let summary = map.summary();
        assert_eq!(summary["container"], "map-id");
        assert_eq!(summary["active_basemap"], "light");
        assert_eq!(summary["layers"].as_array().unwrap().len(), 3);
        assert_eq!(summary["layers"][2]["feature_count"], 1);
        assert_eq!(summary["legend"]["entries"][1]["label"], "1+");
        assert_eq!(summary["legend"]["position"], "bottomright");
    }
}
