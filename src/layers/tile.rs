use crate::{
    core::{
        config::BasemapConfig,
        geo::{LatLng, Point, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::RenderContext,
    Result,
};

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Substituted for `{token}` in the template
    pub access_token: String,
    /// Attribution text
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            access_token: String::new(),
            attribution: "© OpenStreetMap contributors".to_string(),
            tile_size: crate::constants::TILE_SIZE,
            max_zoom: crate::constants::MAX_TILE_ZOOM,
            min_zoom: 0,
        }
    }
}

/// A tile-based layer that displays map tiles from a tile server.
///
/// The layer never downloads anything itself: it emits one
/// [`DrawCommand::Tile`](crate::rendering::context::DrawCommand::Tile) per
/// visible tile and leaves fetching and caching to the front end.
pub struct TileLayer {
    /// Base layer properties
    properties: LayerProperties,
    /// Tile layer specific options
    options: TileLayerOptions,
}

impl TileLayer {
    /// Create a new tile layer with default OpenStreetMap tiles
    pub fn new(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    /// Create a new tile layer with custom options
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options,
        }
    }

    /// Create a basemap layer from configuration
    pub fn from_basemap(basemap: &BasemapConfig, access_token: &str) -> Self {
        let options = TileLayerOptions {
            url_template: basemap.url_template.clone(),
            access_token: access_token.to_string(),
            attribution: basemap.attribution.clone(),
            max_zoom: basemap.max_zoom,
            ..Default::default()
        };
        Self::with_options(basemap.id.clone(), basemap.name.clone(), options)
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    /// URL of a single tile
    pub fn tile_url(&self, coord: &TileCoord) -> String {
        self.options
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
            .replace("{token}", &self.options.access_token)
    }

    /// Tile zoom used for a viewport zoom, within the layer limits
    fn tile_zoom(&self, viewport: &Viewport) -> u8 {
        (viewport.zoom.floor().max(0.0) as u8).clamp(self.options.min_zoom, self.options.max_zoom)
    }

    /// Tiles visible in the current viewport, each paired with the longitude
    /// offset of the world copy it is drawn in
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<(TileCoord, f64)> {
        let zoom = self.tile_zoom(viewport);
        let bounds = viewport.bounds();
        let columns = 2_i64.pow(zoom as u32);
        let column = |lng: f64| ((lng + 180.0) / 360.0 * columns as f64).floor() as i64;

        let top = TileCoord::from_lat_lng(&LatLng::new(bounds.north_east.lat, 0.0), zoom).y;
        let bottom = TileCoord::from_lat_lng(&LatLng::new(bounds.south_west.lat, 0.0), zoom).y;

        let mut tiles = Vec::new();
        for y in top..=bottom {
            for x in column(bounds.south_west.lng)..=column(bounds.north_east.lng) {
                let wrapped = x.rem_euclid(columns);
                let copy = (x - wrapped) / columns;
                tiles.push((TileCoord::new(wrapped as u32, y, zoom), copy as f64 * 360.0));
            }
        }
        tiles
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }

        let tiles = self.visible_tiles(viewport);
        log::trace!("Rendering {} tiles for {}", tiles.len(), self.id());

        for (coord, offset) in tiles {
            let shift = Point::new(viewport.world_copy_shift(offset), 0.0);
            let min = viewport.lat_lng_to_pixel(&coord.to_lat_lng()).add(&shift);
            let max = viewport
                .lat_lng_to_pixel(&TileCoord::new(coord.x + 1, coord.y + 1, coord.z).to_lat_lng())
                .add(&shift);
            context.render_tile(&self.tile_url(&coord), (min, max), self.opacity())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::config::MapConfig, rendering::context::DrawCommand};

    #[test]
    fn test_tile_url_substitution() {
        let config = MapConfig::default();
        let layer = TileLayer::from_basemap(&config.basemaps[0], "pk.test");

        let url = layer.tile_url(&TileCoord::new(7, 12, 5));
        assert_eq!(
            url,
            "https://api.mapbox.com/styles/v1/mapbox/light-v9/tiles/256/5/7/12?access_token=pk.test"
        );
        assert_eq!(layer.name(), "Light Map");
        assert_eq!(layer.tile_options().max_zoom, 18);
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 5.0, Point::new(800.0, 600.0));

        let tiles = layer.visible_tiles(&viewport);
        // 800x600 at 256px tiles spans at least 4x3 tiles
        assert!(tiles.len() >= 12);
        assert!(tiles.iter().all(|(t, offset)| t.z == 5 && t.is_valid() && *offset == 0.0));
        assert!(tiles.contains(&(TileCoord::from_lat_lng(&viewport.center, 5), 0.0)));
    }

    #[test]
    fn test_tile_zoom_respects_max_zoom() {
        let options = TileLayerOptions {
            max_zoom: 3,
            ..Default::default()
        };
        let layer = TileLayer::with_options("t".into(), "T".into(), options);
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 6.0, Point::new(256.0, 256.0));
        assert!(layer.visible_tiles(&viewport).iter().all(|(t, _)| t.z == 3));
    }

    #[test]
    fn test_tiles_wrap_across_antimeridian() {
        let layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        let viewport = Viewport::new(LatLng::new(0.0, 179.0), 3.0, Point::new(800.0, 600.0));

        let tiles = layer.visible_tiles(&viewport);
        assert!(tiles.iter().all(|(t, _)| t.is_valid()));
        // column 0 of the next world copy sits right of the antimeridian
        assert!(tiles.contains(&(TileCoord::new(0, 3, 3), 360.0)));
        assert!(tiles.contains(&(TileCoord::new(7, 3, 3), 0.0)));
    }

    #[test]
    fn test_render_emits_tile_commands() {
        let mut layer = TileLayer::new("osm".to_string(), "OSM".to_string());
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(512.0, 512.0));
        let mut context = RenderContext::new(512, 512);

        layer.render(&mut context, &viewport).unwrap();

        let queue = context.get_drawing_queue();
        assert!(!queue.is_empty());
        for command in queue {
            match command {
                DrawCommand::Tile { url, bounds, .. } => {
                    assert!(url.starts_with("https://tile.openstreetmap.org/2/"));
                    assert!((bounds.1.x - bounds.0.x - 256.0).abs() < 1e-6);
                }
                other => panic!("unexpected command {:?}", other),
            }
        }
    }
}
