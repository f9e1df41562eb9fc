use crate::core::geo::LatLng;
#[cfg(feature = "egui")]
use egui::{Color32, FontId, Rect, Response, Ui, Vec2};

/// Text anchored to a geographic position, shown when its feature is selected
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Popup {
    pub position: LatLng,
    pub content: String,
}

impl Popup {
    pub fn new(position: LatLng, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
        }
    }

    /// Content split into display lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }
}

#[cfg(feature = "egui")]
#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub background_color: Color32,
    pub border_color: Color32,
    pub border_width: f32,
    pub rounding: f32,
    pub padding: f32,
    pub font_id: FontId,
    pub text_color: Color32,
    pub max_width: f32,
}

#[cfg(feature = "egui")]
impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_color: Color32::GRAY,
            border_width: 1.0,
            rounding: 4.0,
            padding: 8.0,
            font_id: FontId::proportional(12.0),
            text_color: Color32::BLACK,
            max_width: 300.0,
        }
    }
}

#[cfg(feature = "egui")]
impl Popup {
    /// Paints the popup with its tip at `anchor`. Clicking the popup returns a
    /// clicked response so the caller can close it.
    pub fn paint(&self, ui: &mut Ui, anchor: egui::Pos2, style: &PopupStyle) -> Response {
        let galley = ui.fonts(|f| {
            f.layout(
                self.content.clone(),
                style.font_id.clone(),
                style.text_color,
                style.max_width - style.padding * 2.0,
            )
        });

        let size = galley.size() + Vec2::splat(style.padding * 2.0);
        let tip = 8.0;
        let rect = Rect::from_min_size(
            egui::pos2(anchor.x - size.x / 2.0, anchor.y - size.y - tip),
            size,
        );

        let painter = ui.painter();
        painter.rect_filled(rect, style.rounding, style.background_color);
        painter.rect_stroke(rect, style.rounding, (style.border_width, style.border_color));
        painter.add(egui::Shape::convex_polygon(
            vec![
                egui::pos2(anchor.x - tip, rect.max.y),
                egui::pos2(anchor.x + tip, rect.max.y),
                anchor,
            ],
            style.background_color,
            (style.border_width, style.border_color),
        ));
        painter.galley(rect.min + Vec2::splat(style.padding), galley, style.text_color);

        ui.allocate_rect(rect, egui::Sense::click())
    }
}
