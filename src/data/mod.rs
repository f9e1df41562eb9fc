pub mod earthquake;
pub mod geojson;
pub mod loader;

pub use earthquake::{EarthquakeFeature, PlateBoundaryFeature};
pub use geojson::{GeoJson, GeoJsonFeature, GeoJsonGeometry};
pub use loader::{load_earthquakes, load_plate_boundaries, FeedLoader, HttpFeedLoader};
