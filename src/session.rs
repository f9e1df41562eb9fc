//! Startup sequence of the earthquake map
//!
//! The earthquake feed is awaited before the map is composed, so the
//! earthquake overlay is complete (or marked unavailable) on first paint. The
//! plate boundary feed is fetched in the background and fills its overlay
//! whenever it resolves; the map is usable in the meantime.

use crate::{
    core::{composer::MapComposer, config::MapConfig, geo::Point, map::Map},
    data::loader::{load_earthquakes, load_plate_boundaries, FeedLoader},
    layers::group::{LayerGroup, LoadStatus},
    runtime::{self, async_utils::async_delay, AsyncHandle},
    style::styler::EarthquakeStyler,
    Result,
};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

const PLATE_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A composed map plus handles to the overlays its feeds populate
pub struct MapSession {
    config: Arc<MapConfig>,
    map: Map,
    earthquakes: LayerGroup,
    plates: LayerGroup,
    plate_task: Option<Box<dyn AsyncHandle>>,
}

impl MapSession {
    /// Fetches the earthquakes, composes the map and starts the plate fetch.
    ///
    /// Feed failures never fail startup: the affected overlay stays in the
    /// layer control with an unavailable status. Errors come only from the
    /// configuration.
    pub async fn start(
        config: Arc<MapConfig>,
        loader: Arc<dyn FeedLoader>,
        size: Point,
    ) -> Result<Self> {
        config.validate()?;
        let composer = MapComposer::new(&config);
        let earthquakes = composer.earthquake_group();
        let plates = composer.plate_group();

        match load_earthquakes(loader.as_ref(), &config.feeds.earthquakes_url).await {
            Ok(features) => {
                let styler = EarthquakeStyler::from_config(&config);
                earthquakes.set_features(composer.earthquake_markers(&features, &styler));
            }
            Err(e) => earthquakes.mark_unavailable(e.to_string()),
        }

        let map = composer.compose(earthquakes.clone(), plates.clone(), size)?;
        let plate_task = Self::spawn_plate_fetch(config.clone(), loader, plates.clone());

        Ok(Self {
            config,
            map,
            earthquakes,
            plates,
            plate_task: Some(plate_task),
        })
    }

    fn spawn_plate_fetch(
        config: Arc<MapConfig>,
        loader: Arc<dyn FeedLoader>,
        plates: LayerGroup,
    ) -> Box<dyn AsyncHandle> {
        runtime::spawn(async move {
            match load_plate_boundaries(loader.as_ref(), &config.feeds.plates_url).await {
                Ok(features) => {
                    let lines = MapComposer::new(&config).plate_lines(&features);
                    plates.set_features(lines);
                }
                Err(e) => plates.mark_unavailable(e.to_string()),
            }
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn earthquakes(&self) -> &LayerGroup {
        &self.earthquakes
    }

    pub fn plates(&self) -> &LayerGroup {
        &self.plates
    }

    /// True until the plate fetch has either filled or failed its overlay
    pub fn plates_loading(&self) -> bool {
        self.plates.is_loading()
    }

    /// Waits up to `timeout` for the plate overlay to leave the loading
    /// state and returns the status it ended up in.
    pub async fn wait_for_plates(&self, timeout: Duration) -> LoadStatus {
        let started = Instant::now();
        while self.plates.is_loading() && started.elapsed() < timeout {
            async_delay(PLATE_POLL_INTERVAL).await;
        }
        self.plates.status()
    }

    /// Abandons a plate fetch that is still in flight. The overlay keeps
    /// whatever it holds, which is nothing if the fetch never finished.
    pub fn cancel_plate_fetch(&mut self) {
        if let Some(task) = self.plate_task.take() {
            if !task.is_finished() {
                log::debug!("Cancelling plate boundary fetch");
                task.cancel();
            }
        }
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.cancel_plate_fetch();
    }
}
