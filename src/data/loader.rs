use crate::{
    data::{
        earthquake::{EarthquakeFeature, PlateBoundaryFeature},
        geojson::GeoJson,
    },
    MapError, Result,
};
use async_trait::async_trait;
use std::time::Duration;

/// Source of GeoJSON documents.
///
/// The session only ever talks to this trait, so tests and offline runs can
/// substitute canned documents for the live feeds.
#[async_trait]
pub trait FeedLoader: Send + Sync {
    /// Fetches and parses the document at `url`
    async fn fetch(&self, url: &str) -> Result<GeoJson>;
}

/// Loads feeds over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpFeedLoader {
    client: reqwest::Client,
}

impl HttpFeedLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedLoader for HttpFeedLoader {
    async fn fetch(&self, url: &str) -> Result<GeoJson> {
        log::info!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::error!("{} returned {}", url, status);
            return Err(MapError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        log::debug!("Downloaded {} bytes from {}", body.len(), url);
        GeoJson::from_str(&body)
    }
}

/// Fetches the earthquake feed and extracts its features.
pub async fn load_earthquakes(
    loader: &dyn FeedLoader,
    url: &str,
) -> Result<Vec<EarthquakeFeature>> {
    let geojson = loader.fetch(url).await?;
    let earthquakes = EarthquakeFeature::from_geojson(&geojson);
    log::info!(
        "Loaded {} earthquakes ({} features in feed)",
        earthquakes.len(),
        geojson.features().len()
    );
    log::debug!("Earthquake features: {:?}", earthquakes);
    Ok(earthquakes)
}

/// Fetches the plate boundary dataset and extracts its line features.
pub async fn load_plate_boundaries(
    loader: &dyn FeedLoader,
    url: &str,
) -> Result<Vec<PlateBoundaryFeature>> {
    let geojson = loader.fetch(url).await?;
    let plates = PlateBoundaryFeature::from_geojson(&geojson);
    log::info!("Loaded {} plate boundary features", plates.len());
    Ok(plates)
}
