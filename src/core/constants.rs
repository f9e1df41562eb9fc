//! Defaults for the earthquake map, taken from the Leaflet setup the map
//! reproduces. Everything here can be overridden through [`MapConfig`].
//!
//! [`MapConfig`]: crate::core::config::MapConfig

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Highest zoom level served by the basemap tile provider.
pub const MAX_TILE_ZOOM: u8 = 18;

/// Identifier of the container the map is mounted into.
pub const DEFAULT_CONTAINER_ID: &str = "map-id";

/// Initial view: the contiguous United States.
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: f64 = 5.0;

/// USGS summary feed of every earthquake in the past seven days.
pub const EARTHQUAKE_FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 plate boundary model (Bird, 2003) as GeoJSON line features.
pub const PLATE_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Mapbox styles API tile template. `{style}` and `{token}` are filled from
/// configuration, `{z}/{x}/{y}` per tile.
pub const MAPBOX_TILE_TEMPLATE: &str =
    "https://api.mapbox.com/styles/v1/mapbox/{style}/tiles/256/{z}/{x}/{y}?access_token={token}";

/// Environment variable that overrides the configured tile access token.
pub const ACCESS_TOKEN_ENV: &str = "QUAKEMAP_ACCESS_TOKEN";

/// Marker radius in metres per unit of magnitude.
pub const MARKER_SCALE: f64 = 20_000.0;

/// Circle marker appearance.
pub const MARKER_FILL_OPACITY: f32 = 0.7;
pub const MARKER_STROKE_WEIGHT: f32 = 0.5;

/// Plate boundary line appearance.
pub const PLATE_LINE_COLOR: &str = "blue";
pub const PLATE_LINE_WEIGHT: f32 = 2.0;

/// Magnitude breakpoints listed in the legend.
pub const LEGEND_BREAKPOINTS: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

/// Seconds before a feed request is abandoned and the overlay marked unavailable.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
