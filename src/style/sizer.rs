use crate::core::constants::MARKER_SCALE;
use serde::{Deserialize, Serialize};

/// Linear magnitude-to-radius scaling. Radii are ground distances in metres.
///
/// Zero or negative magnitudes produce a degenerate radius; callers are
/// expected to pass non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerSizer {
    pub scale: f64,
}

impl MarkerSizer {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }

    pub fn radius(&self, magnitude: f64) -> f64 {
        magnitude * self.scale
    }
}

impl Default for MarkerSizer {
    fn default() -> Self {
        Self::new(MARKER_SCALE)
    }
}
