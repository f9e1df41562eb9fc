//! Startup configuration for the earthquake map
//!
//! Every endpoint, colour and constant the map depends on lives in
//! [`MapConfig`]. The configuration is built once (defaults, then an optional
//! JSON file, then the access-token environment override) and handed to the
//! composer and the session by reference; nothing mutates it afterwards.

use crate::{
    core::{
        constants::{
            ACCESS_TOKEN_ENV, DEFAULT_CENTER, DEFAULT_CONTAINER_ID, DEFAULT_REQUEST_TIMEOUT_SECS,
            DEFAULT_ZOOM, EARTHQUAKE_FEED_URL, LEGEND_BREAKPOINTS, MAPBOX_TILE_TEMPLATE,
            MARKER_FILL_OPACITY, MARKER_SCALE, MARKER_STROKE_WEIGHT, MAX_TILE_ZOOM,
            PLATE_BOUNDARIES_URL, PLATE_LINE_COLOR, PLATE_LINE_WEIGHT,
        },
        geo::LatLng,
    },
    style::{classifier::MagnitudePalette, color::Color},
    ui::controls::ControlPosition,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Remote GeoJSON documents the map is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub earthquakes_url: String,
    pub plates_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            earthquakes_url: EARTHQUAKE_FEED_URL.to_string(),
            plates_url: PLATE_BOUNDARIES_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FeedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// One selectable background tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasemapConfig {
    pub id: String,
    pub name: String,
    /// Template with `{z}`, `{x}`, `{y}` and optionally `{token}` placeholders
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl BasemapConfig {
    fn mapbox(id: &str, name: &str, style: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url_template: MAPBOX_TILE_TEMPLATE.replace("{style}", style),
            max_zoom: MAX_TILE_ZOOM,
            attribution: "© Mapbox © OpenStreetMap".to_string(),
        }
    }
}

/// Appearance of earthquake circles and plate boundary lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Radius in metres per unit of magnitude
    pub scale: f64,
    pub fill_opacity: f32,
    pub stroke: bool,
    pub stroke_weight: f32,
    pub plate_color: Color,
    pub plate_weight: f32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            scale: MARKER_SCALE,
            fill_opacity: MARKER_FILL_OPACITY,
            stroke: true,
            stroke_weight: MARKER_STROKE_WEIGHT,
            plate_color: Color::parse(PLATE_LINE_COLOR).unwrap_or(Color::BLUE),
            plate_weight: PLATE_LINE_WEIGHT,
        }
    }
}

/// Legend placement and the magnitude breakpoints it enumerates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub position: ControlPosition,
    pub breakpoints: Vec<f64>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            position: ControlPosition::BottomRight,
            breakpoints: LEGEND_BREAKPOINTS.to_vec(),
        }
    }
}

/// Complete configuration of the earthquake map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Identifier of the container element the map is mounted into
    pub container_id: String,
    pub center: LatLng,
    pub zoom: f64,
    pub feeds: FeedConfig,
    /// Basemaps in display order; the first one starts active
    pub basemaps: Vec<BasemapConfig>,
    /// Substituted for `{token}` in basemap URL templates
    pub access_token: String,
    pub palette: MagnitudePalette,
    pub markers: MarkerConfig,
    pub legend: LegendConfig,
    /// Whether the layer control starts collapsed
    pub layer_control_collapsed: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_string(),
            center: LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            zoom: DEFAULT_ZOOM,
            feeds: FeedConfig::default(),
            basemaps: vec![
                BasemapConfig::mapbox("light", "Light Map", "light-v9"),
                BasemapConfig::mapbox("satellite", "Satellite Map", "satellite-v9"),
            ],
            access_token: String::new(),
            palette: MagnitudePalette::default(),
            markers: MarkerConfig::default(),
            legend: LegendConfig::default(),
            layer_control_collapsed: false,
        }
    }
}

impl MapConfig {
    /// Parses a configuration from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded map configuration from {}", path.as_ref().display());
        Self::from_json(&contents)
    }

    /// Applies the access token from the environment, if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            if !token.is_empty() {
                self.access_token = token;
            }
        }
        self
    }

    /// Checks the invariants the composer relies on
    pub fn validate(&self) -> Result<()> {
        if self.container_id.is_empty() {
            return Err(MapError::Config("container_id must not be empty".into()));
        }
        if self.basemaps.is_empty() {
            return Err(MapError::Config("at least one basemap is required".into()));
        }
        for basemap in &self.basemaps {
            let has_placeholders = ["{z}", "{x}", "{y}"]
                .iter()
                .all(|p| basemap.url_template.contains(p));
            if !has_placeholders {
                return Err(MapError::Config(format!(
                    "basemap '{}' url template needs {{z}}, {{x}} and {{y}}",
                    basemap.id
                )));
            }
        }
        if !self.markers.scale.is_finite() || self.markers.scale < 0.0 {
            return Err(MapError::Config("marker scale must be a non-negative number".into()));
        }
        if self.legend.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MapError::Config("legend breakpoints must be increasing".into()));
        }
        self.palette.validate()
    }
}
