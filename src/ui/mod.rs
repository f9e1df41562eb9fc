pub mod controls;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{
    ControlEntry, ControlKind, ControlPosition, LayerControl, LayerControlRow, Legend, LegendEntry,
};

pub use popup::Popup;

#[cfg(feature = "egui")]
pub use popup::PopupStyle;

#[cfg(feature = "egui")]
pub use widget::{MapView, MapViewConfig, UiMapExt};
