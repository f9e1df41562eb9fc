use crate::{
    core::{
        geo::{LatLngBounds, Point},
        viewport::Viewport,
    },
    layers::{
        base::{LayerProperties, LayerTrait, LayerType},
        vector::{VectorFeatureData, VectorLayer},
    },
    rendering::context::RenderContext,
    ui::popup::Popup,
    Result,
};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where a group's content stands with respect to its data feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The feed has not resolved yet; the group is empty
    Loading,
    /// The feed resolved with this many features
    Ready(usize),
    /// The feed failed; the group stays empty
    Unavailable(String),
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Loading => write!(f, "loading"),
            LoadStatus::Ready(count) => write!(f, "{} features", count),
            LoadStatus::Unavailable(reason) => write!(f, "unavailable: {}", reason),
        }
    }
}

struct GroupState {
    layer: VectorLayer,
    status: LoadStatus,
}

/// Overlay whose features can be filled in after it has been added to the map.
///
/// Cloning a group yields another handle to the same content, so a background
/// task can populate a group the map already holds. Visibility and z-index
/// belong to the handle the map owns.
#[derive(Clone)]
pub struct LayerGroup {
    properties: LayerProperties,
    state: Arc<RwLock<GroupState>>,
}

impl LayerGroup {
    /// Create an empty group in the `Loading` state
    pub fn new(id: String, name: String) -> Self {
        let layer = VectorLayer::new(format!("{}-features", id), name.clone());
        Self {
            properties: LayerProperties::new(id, name, LayerType::Group),
            state: Arc::new(RwLock::new(GroupState {
                layer,
                status: LoadStatus::Loading,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, GroupState> {
        // A writer that panicked leaves the features in a consistent state
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, GroupState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the group's content and mark it ready
    pub fn set_features(&self, features: Vec<VectorFeatureData>) {
        let mut state = self.write();
        state.layer.clear();
        for feature in features {
            state.layer.add_feature(feature);
        }
        let count = state.layer.feature_count();
        state.status = LoadStatus::Ready(count);
        log::debug!("{} now holds {} features", self.properties.name, count);
    }

    /// Mark the group unavailable, dropping any content
    pub fn mark_unavailable(&self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("{} unavailable: {}", self.properties.name, reason);
        let mut state = self.write();
        state.layer.clear();
        state.status = LoadStatus::Unavailable(reason);
    }

    pub fn status(&self) -> LoadStatus {
        self.read().status.clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.read().status, LoadStatus::Loading)
    }

    /// Run `f` against the group's current features
    pub fn with_features<R>(&self, f: impl FnOnce(&[VectorFeatureData]) -> R) -> R {
        f(self.read().layer.features())
    }
}

impl LayerTrait for LayerGroup {
    crate::impl_layer_trait!(LayerGroup, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.read().layer.bounds()
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if !self.is_visible() {
            return Ok(());
        }
        let opacity = self.opacity();
        let mut state = self.write();
        state.layer.set_opacity(opacity);
        state.layer.render(context, viewport)
    }

    fn popup_at(&self, viewport: &Viewport, pixel: &Point) -> Option<Popup> {
        if !self.is_visible() {
            return None;
        }
        self.read().layer.popup_at(viewport, pixel)
    }

    fn feature_count(&self) -> usize {
        self.read().layer.feature_count()
    }
}
