//! Magnitude-driven styling of earthquake markers
//!
//! [`classifier`] and [`sizer`] are the two pure mappings from magnitude to
//! colour and radius; [`styler`] combines them with the popup template behind
//! the [`FeatureStyler`](styler::FeatureStyler) strategy the composer calls.

pub mod classifier;
pub mod color;
pub mod sizer;
pub mod styler;

pub use classifier::MagnitudePalette;
pub use color::Color;
pub use sizer::MarkerSizer;
pub use styler::{EarthquakeStyler, FeatureStyler, StyleDescriptor};
