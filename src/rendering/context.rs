use crate::{core::geo::Point, style::color::Color, MapError, Result};

/// Unified style conversion trait for layer styles
pub trait StyleConversion<T> {
    fn to_render_style(&self, opacity_multiplier: f32) -> T;
}

/// Styles for different rendering primitives
#[derive(Debug, Clone, PartialEq)]
pub struct CircleRenderStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    /// Zero when the circle has no outline
    pub stroke_width: f32,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl StyleConversion<CircleRenderStyle> for crate::layers::vector::CircleStyle {
    fn to_render_style(&self, opacity_multiplier: f32) -> CircleRenderStyle {
        CircleRenderStyle {
            fill_color: self.fill_color,
            stroke_color: self.stroke_color,
            stroke_width: if self.stroke { self.stroke_width } else { 0.0 },
            fill_opacity: self.fill_opacity * opacity_multiplier,
            stroke_opacity: self.opacity * opacity_multiplier,
        }
    }
}

impl StyleConversion<LineRenderStyle> for crate::layers::vector::LineStyle {
    fn to_render_style(&self, opacity_multiplier: f32) -> LineRenderStyle {
        LineRenderStyle {
            color: self.color,
            width: self.width,
            opacity: self.opacity * opacity_multiplier,
        }
    }
}

/// Display list for one frame. Layers push commands in screen coordinates
/// and the front end (the egui widget, or a headless consumer) replays them.
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
    /// Viewport clipping bounds (min, max) in screen coordinates
    pub clip_bounds: Option<(Point, Point)>,
}

/// Commands that can be issued to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Raster tile fetched by the front end from `url`
    Tile {
        url: String,
        bounds: (Point, Point), // min, max screen coordinates
        opacity: f32,
    },
    Circle {
        center: Point,
        /// Radius in screen pixels
        radius: f32,
        style: CircleRenderStyle,
    },
    Line {
        points: Vec<Point>,
        style: LineRenderStyle,
    },
}

impl RenderContext {
    /// Create a new render context clipped to its own size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
            clip_bounds: Some((
                Point::new(0.0, 0.0),
                Point::new(width as f64, height as f64),
            )),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    /// Queue a tile. Tiles entirely outside the clip bounds are dropped.
    pub fn render_tile(&mut self, url: &str, bounds: (Point, Point), opacity: f32) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(MapError::Layer(format!("Invalid tile bounds for {}", url)));
        }

        if !(0.0..=1.0).contains(&opacity) {
            return Err(MapError::Layer("Opacity must be between 0.0 and 1.0".into()));
        }

        if self.is_outside_clip(bounds) {
            return Ok(());
        }

        self.drawing_queue.push(DrawCommand::Tile {
            url: url.to_string(),
            bounds,
            opacity,
        });
        Ok(())
    }

    /// Queue a filled circle
    pub fn render_circle(&mut self, center: &Point, radius: f32, style: &CircleRenderStyle) {
        let reach = radius as f64 + style.stroke_width as f64;
        let extent = (
            Point::new(center.x - reach, center.y - reach),
            Point::new(center.x + reach, center.y + reach),
        );
        if self.is_outside_clip(extent) {
            return;
        }

        self.drawing_queue.push(DrawCommand::Circle {
            center: *center,
            radius,
            style: style.clone(),
        });
    }

    /// Queue a polyline
    pub fn render_line(&mut self, points: &[Point], style: &LineRenderStyle) {
        if points.len() < 2 {
            return;
        }
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Set viewport clipping bounds
    pub fn set_clip_bounds(&mut self, min: Point, max: Point) {
        self.clip_bounds = Some((min, max));
    }

    /// Clear clipping bounds
    pub fn clear_clip_bounds(&mut self) {
        self.clip_bounds = None;
    }

    fn is_outside_clip(&self, (min, max): (Point, Point)) -> bool {
        match self.clip_bounds {
            Some((clip_min, clip_max)) => {
                max.x < clip_min.x || min.x > clip_max.x || max.y < clip_min.y || min.y > clip_max.y
            }
            None => false,
        }
    }
}
