#[macro_use]
pub mod macros;

pub mod base;
pub mod group;
pub mod manager;
pub mod tile;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use group::{LayerGroup, LoadStatus};
pub use manager::LayerManager;
pub use tile::{TileLayer, TileLayerOptions};
pub use vector::{CircleStyle, LineStyle, VectorFeature, VectorFeatureData, VectorLayer};
