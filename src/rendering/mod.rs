pub mod context;

// Re-export main types
pub use context::{
    CircleRenderStyle, DrawCommand, LineRenderStyle, RenderContext, StyleConversion,
};
