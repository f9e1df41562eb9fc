//! Prelude module for common quakemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use quakemap::prelude::*;`

pub use crate::core::{
    composer::{MapComposer, EARTHQUAKES_LAYER_ID, PLATES_LAYER_ID},
    config::{BasemapConfig, FeedConfig, LegendConfig, MapConfig, MarkerConfig},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
    map::Map,
    viewport::Viewport,
};

pub use crate::layers::{
    base::LayerTrait,
    group::{LayerGroup, LoadStatus},
    manager::LayerManager,
    tile::TileLayer,
    vector::{VectorFeature, VectorFeatureData, VectorLayer},
};

pub use crate::data::{
    earthquake::{EarthquakeFeature, PlateBoundaryFeature},
    geojson::{GeoJson, GeoJsonFeature},
    loader::{FeedLoader, HttpFeedLoader},
};

pub use crate::style::{
    classifier::MagnitudePalette,
    color::Color,
    sizer::MarkerSizer,
    styler::{EarthquakeStyler, FeatureStyler},
};

pub use crate::spatial::index::{SpatialIndex, SpatialItem};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

#[cfg(feature = "tokio-runtime")]
pub use crate::session::MapSession;

pub use crate::rendering::context::{DrawCommand, RenderContext};

pub use crate::ui::{
    controls::{ControlPosition, LayerControl, Legend},
    popup::Popup,
};

#[cfg(feature = "egui")]
pub use crate::ui::widget::{MapView, MapViewConfig, UiMapExt};

pub use crate::{Error as MapError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};

pub use futures::future::BoxFuture;
pub use std::{future::Future, pin::Pin};
