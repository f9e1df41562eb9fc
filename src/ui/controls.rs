//! Map controls: the base layer / overlay switcher and the magnitude legend
//!
//! Both are plain data here. The map owns them and the egui widget paints
//! them; headless consumers read them through [`Map::layer_control_rows`] and
//! [`Map::legend`].
//!
//! [`Map::layer_control_rows`]: crate::core::map::Map::layer_control_rows
//! [`Map::legend`]: crate::core::map::Map::legend

use crate::{layers::group::LoadStatus, style::classifier::MagnitudePalette, style::color::Color};
use serde::{Deserialize, Serialize};

/// Corner of the map a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

/// One layer listed in the layer control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlEntry {
    pub id: String,
    pub name: String,
}

/// Whether a control row is an exclusive base layer or an independent overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Base,
    Overlay,
}

/// A row of the layer control as it should be displayed right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControlRow {
    pub id: String,
    pub name: String,
    pub kind: ControlKind,
    pub checked: bool,
    /// Loading state of overlays backed by a feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LayerControlRow {
    pub(crate) fn new(entry: &ControlEntry, kind: ControlKind, checked: bool) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            kind,
            checked,
            status: None,
        }
    }

    pub(crate) fn with_status(mut self, status: &LoadStatus) -> Self {
        self.status = Some(status.to_string());
        self
    }
}

/// Switcher listing base layers (exactly one active) and overlays (each toggled on its own)
#[derive(Debug, Clone, PartialEq)]
pub struct LayerControl {
    pub position: ControlPosition,
    pub collapsed: bool,
    base_layers: Vec<ControlEntry>,
    overlays: Vec<ControlEntry>,
}

impl LayerControl {
    pub fn new(collapsed: bool) -> Self {
        Self {
            position: ControlPosition::TopRight,
            collapsed,
            base_layers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn add_base_layer(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.base_layers.push(ControlEntry {
            id: id.into(),
            name: name.into(),
        });
    }

    pub fn add_overlay(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.overlays.push(ControlEntry {
            id: id.into(),
            name: name.into(),
        });
    }

    pub fn base_layers(&self) -> &[ControlEntry] {
        &self.base_layers
    }

    pub fn overlays(&self) -> &[ControlEntry] {
        &self.overlays
    }

    pub fn is_base_layer(&self, id: &str) -> bool {
        self.base_layers.iter().any(|entry| entry.id == id)
    }

    pub fn is_overlay(&self, id: &str) -> bool {
        self.overlays.iter().any(|entry| entry.id == id)
    }
}

/// One legend row: a colour swatch and its magnitude range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
}

/// Magnitude legend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: ControlPosition,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// One row per breakpoint. Each swatch is the colour markers get for
    /// magnitudes in `[a, b)`, and labels read `a–b` with the last one `a+`.
    pub fn from_breakpoints(
        breakpoints: &[f64],
        palette: &MagnitudePalette,
        position: ControlPosition,
    ) -> Self {
        let entries = breakpoints
            .iter()
            .enumerate()
            .map(|(i, from)| {
                let label = match breakpoints.get(i + 1) {
                    Some(to) => format!("{}\u{2013}{}", from, to),
                    None => format!("{}+", from),
                };
                LegendEntry {
                    color: palette.classify(*from),
                    label,
                }
            })
            .collect();

        Self { position, entries }
    }
}
