//! # quakemap
//!
//! Recent earthquakes and tectonic plate boundaries on a tiled, Leaflet-style map.
//!
//! The crate is split the same way the map is assembled at startup:
//! `data` fetches and parses the two GeoJSON feeds, `style` turns each
//! earthquake into a coloured, sized circle with a popup, and `core::composer`
//! wires basemaps, overlays, the layer control and the legend into one
//! [`Map`]. [`session::MapSession`] runs that sequence and patches the plate
//! overlay in when its fetch resolves.

pub mod core;
pub mod data;
pub mod layers;
pub mod prelude;
pub mod rendering;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
#[cfg(feature = "tokio-runtime")]
pub mod session;
pub mod spatial;
pub mod style;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    composer::MapComposer,
    config::MapConfig,
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait, group::LayerGroup, tile::TileLayer, vector::VectorLayer,
};

pub use data::{
    earthquake::{EarthquakeFeature, PlateBoundaryFeature},
    geojson::GeoJson,
    loader::{FeedLoader, HttpFeedLoader},
};

pub use style::{
    classifier::MagnitudePalette, color::Color, sizer::MarkerSizer,
    styler::{EarthquakeStyler, FeatureStyler, StyleDescriptor},
};

pub use ui::{
    controls::{LayerControl, Legend, LegendEntry},
    popup::Popup,
};

pub use rendering::context::RenderContext;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
