use crate::{
    core::{geo::Point, viewport::Viewport},
    layers::base::LayerTrait,
    rendering::context::RenderContext,
    ui::popup::Popup,
    MapError, Result,
};

use crate::prelude::HashMap;

/// Manages layers for the map, handling ordering and rendering
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index, then insertion)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager. Ids must be unique.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("duplicate layer id '{}'", layer_id)));
        }
        let z_index = layer.z_index();

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.layers.insert(layer_id.clone(), layer);
        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Lists all layer IDs in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Renders all visible layers in order
    pub fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        let viewport_bounds = viewport.bounds();

        for layer_id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(layer_id) {
                // Only render visible layers that intersect with viewport
                if layer.is_visible() && layer.intersects_bounds(&viewport_bounds) {
                    layer.render(context, viewport)?;
                }
            }
        }
        Ok(())
    }

    /// Popup of the topmost visible feature under a container pixel
    pub fn popup_at(&self, viewport: &Viewport, pixel: &Point) -> Option<Popup> {
        self.render_order
            .iter()
            .rev()
            .filter_map(|id| self.layers.get(id))
            .filter(|layer| layer.is_visible())
            .find_map(|layer| layer.popup_at(viewport, pixel))
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{tile::TileLayer, vector::VectorLayer};

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(VectorLayer::new("quakes".into(), "Earthquakes".into())))
            .unwrap();

        let mut basemap = TileLayer::new("light".into(), "Light Map".into());
        basemap.set_z_index(-1);
        manager.add_layer(Box::new(basemap)).unwrap();

        manager
            .add_layer(Box::new(VectorLayer::new("plates".into(), "Plates".into())))
            .unwrap();

        assert_eq!(manager.list_layers(), vec!["light", "quakes", "plates"]);
        assert_eq!(manager.len(), 3);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(VectorLayer::new("a".into(), "A".into())))
            .unwrap();
        let result = manager.add_layer(Box::new(VectorLayer::new("a".into(), "A again".into())));
        assert!(matches!(result, Err(MapError::Layer(_))));
    }

    #[test]
    fn test_with_layer_mut_and_remove() {
        let mut manager = LayerManager::new();
        manager
            .add_layer(Box::new(VectorLayer::new("a".into(), "A".into())))
            .unwrap();

        manager.with_layer_mut("a", |layer| layer.set_visible(false));
        assert!(!manager.get_layer("a").unwrap().is_visible());

        assert!(manager.remove_layer("a").is_some());
        assert!(manager.is_empty());
        assert!(manager.list_layers().is_empty());
    }
}
