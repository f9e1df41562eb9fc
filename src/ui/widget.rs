use crate::{
    core::{geo::Point, map::Map},
    layers::tile::TileLayer,
    rendering::context::{DrawCommand, RenderContext},
    ui::{
        controls::{ControlKind, ControlPosition, LayerControlRow, Legend},
        popup::PopupStyle,
    },
};
use egui::{Align2, Color32, CursorIcon, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Vec2, Widget};

/// Margin between a control and the map edge
const CONTROL_MARGIN: f32 = 10.0;

/// Display options for [`MapView`]
#[derive(Debug, Clone)]
pub struct MapViewConfig {
    pub interactive: bool,
    pub show_zoom_controls: bool,
    pub show_attribution: bool,
    pub background_color: Color32,
    /// Zoom levels per point of scroll
    pub zoom_sensitivity: f64,
    pub preferred_size: Option<Vec2>,
    pub popup_style: PopupStyle,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            show_zoom_controls: true,
            show_attribution: true,
            background_color: Color32::from_rgb(200, 200, 200),
            zoom_sensitivity: 0.01,
            preferred_size: None,
            popup_style: PopupStyle::default(),
        }
    }
}

/// egui widget painting a composed [`Map`]
///
/// The map keeps its own state between frames, so the widget only borrows it:
///
/// ```rust,ignore
/// ui.add(quakemap::ui::MapView::new(session.map_mut()));
/// ```
pub struct MapView<'a> {
    map: &'a mut Map,
    config: MapViewConfig,
}

/// A change requested through one of the on-map controls
#[derive(Debug, Clone, PartialEq)]
enum ControlAction {
    SelectBasemap(String),
    ToggleOverlay(String, bool),
    Zoom(f64),
}

impl<'a> MapView<'a> {
    pub fn new(map: &'a mut Map) -> Self {
        Self {
            map,
            config: MapViewConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MapViewConfig) -> Self {
        self.config = config;
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.config.interactive = interactive;
        self
    }

    pub fn size(mut self, size: Vec2) -> Self {
        self.config.preferred_size = Some(size);
        self
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &mut Response) {
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let focus = response
                    .hover_pos()
                    .map(|pos| to_map_point(rect, pos));
                let zoom = self.map.viewport().zoom + scroll as f64 * self.config.zoom_sensitivity;
                self.map.zoom_to(zoom, focus);
                response.mark_changed();
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.5 {
                self.map.pan(Point::new(delta.x as f64, delta.y as f64));
                response.mark_changed();
            }
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if response.hovered() {
            ui.ctx().set_cursor_icon(CursorIcon::Grab);
        }
    }

    fn paint_map(&mut self, ui: &mut Ui, rect: Rect) {
        ui.painter().rect_filled(rect, 0.0, self.config.background_color);

        let mut context = RenderContext::new(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);
        if let Err(e) = self.map.render(&mut context) {
            log::warn!("Map render failed: {}", e);
            return;
        }

        let previous_clip = ui.clip_rect();
        ui.set_clip_rect(rect.intersect(previous_clip));

        for command in context.get_drawing_queue() {
            match command {
                DrawCommand::Tile { url, bounds, opacity } => {
                    let tile_rect = Rect::from_min_max(
                        to_screen(rect, &bounds.0),
                        to_screen(rect, &bounds.1),
                    );
                    egui::Image::from_uri(url.clone())
                        .tint(Color32::from_white_alpha((opacity * 255.0).round() as u8))
                        .paint_at(ui, tile_rect);
                }
                DrawCommand::Circle { center, radius, style } => {
                    let stroke = if style.stroke_width > 0.0 {
                        Stroke::new(
                            style.stroke_width,
                            style.stroke_color.with_opacity(style.stroke_opacity),
                        )
                    } else {
                        Stroke::NONE
                    };
                    ui.painter().circle(
                        to_screen(rect, center),
                        *radius,
                        style.fill_color.with_opacity(style.fill_opacity),
                        stroke,
                    );
                }
                DrawCommand::Line { points, style } => {
                    let screen: Vec<Pos2> = points.iter().map(|p| to_screen(rect, p)).collect();
                    ui.painter().add(Shape::line(
                        screen,
                        Stroke::new(style.width, style.color.with_opacity(style.opacity)),
                    ));
                }
            }
        }

        ui.set_clip_rect(previous_clip);
    }

    /// Paints the selected popup. Returns the popup's rect so a click on it is
    /// not also treated as a click on the map.
    fn paint_popup(&mut self, ui: &mut Ui, rect: Rect) -> Option<Rect> {
        let popup = self.map.selected_popup()?.clone();
        let anchor = to_screen(rect, &self.map.viewport().lat_lng_to_pixel(&popup.position));
        if !rect.contains(anchor) {
            return None;
        }

        let popup_response = popup.paint(ui, anchor, &self.config.popup_style);
        if popup_response.clicked() {
            self.map.close_popup();
        }
        Some(popup_response.rect)
    }

    fn show_layer_control(&self, ui: &Ui, rect: Rect, actions: &mut Vec<ControlAction>) {
        let control = self.map.layer_control();
        let rows = self.map.layer_control_rows();
        let collapsed = control.collapsed;

        control_area(ui, rect, control.position, "layer_control").show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                egui::CollapsingHeader::new("Layers")
                    .default_open(!collapsed)
                    .show(ui, |ui| layer_control_contents(ui, &rows, actions));
            });
        });
    }

    fn show_legend(&self, ui: &Ui, rect: Rect, legend: &Legend) {
        control_area(ui, rect, legend.position, "legend").show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for entry in &legend.entries {
                    ui.horizontal(|ui| {
                        let (swatch, _) = ui.allocate_exact_size(Vec2::splat(14.0), Sense::hover());
                        ui.painter().rect_filled(swatch, 0.0, entry.color);
                        ui.label(&entry.label);
                    });
                }
            });
        });
    }

    fn show_zoom_controls(&self, ui: &Ui, rect: Rect, actions: &mut Vec<ControlAction>) {
        control_area(ui, rect, ControlPosition::TopLeft, "zoom_control").show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                if ui.button("+").clicked() {
                    actions.push(ControlAction::Zoom(1.0));
                }
                if ui.button("\u{2212}").clicked() {
                    actions.push(ControlAction::Zoom(-1.0));
                }
            });
        });
    }

    fn paint_attribution(&self, ui: &Ui, rect: Rect) {
        let attribution = self
            .map
            .active_basemap()
            .and_then(|id| self.map.get_layer(id))
            .and_then(|layer| layer.as_any().downcast_ref::<TileLayer>())
            .map(|tiles| tiles.tile_options().attribution.clone())
            .unwrap_or_default();
        if attribution.is_empty() {
            return;
        }

        ui.painter().text(
            rect.left_bottom() + Vec2::new(4.0, -4.0),
            Align2::LEFT_BOTTOM,
            attribution,
            egui::FontId::proportional(10.0),
            Color32::from_gray(60),
        );
    }
}

impl<'a> Widget for MapView<'a> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let desired_size = self.config.preferred_size.unwrap_or_else(|| ui.available_size());
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());

        self.map
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if self.config.interactive {
            self.handle_input(ui, rect, &mut response);
        }

        self.paint_map(ui, rect);
        let popup_rect = self.paint_popup(ui, rect);

        if self.config.interactive && response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let on_popup = popup_rect.map_or(false, |r| r.contains(pos));
                if !on_popup {
                    self.map.click(&to_map_point(rect, pos));
                    response.mark_changed();
                }
            }
        }

        let mut actions = Vec::new();
        self.show_layer_control(ui, rect, &mut actions);
        if let Some(legend) = self.map.legend().cloned() {
            self.show_legend(ui, rect, &legend);
        }
        if self.config.show_zoom_controls {
            self.show_zoom_controls(ui, rect, &mut actions);
        }
        if self.config.show_attribution {
            self.paint_attribution(ui, rect);
        }

        if !actions.is_empty() {
            for action in actions {
                apply_action(self.map, action);
            }
            response.mark_changed();
        }

        response
    }
}

fn layer_control_contents(ui: &mut Ui, rows: &[LayerControlRow], actions: &mut Vec<ControlAction>) {
    let mut separated = false;
    for row in rows {
        match row.kind {
            ControlKind::Base => {
                if ui.radio(row.checked, &row.name).clicked() && !row.checked {
                    actions.push(ControlAction::SelectBasemap(row.id.clone()));
                }
            }
            ControlKind::Overlay => {
                if !separated {
                    ui.separator();
                    separated = true;
                }
                ui.horizontal(|ui| {
                    let mut checked = row.checked;
                    if ui.checkbox(&mut checked, &row.name).changed() {
                        actions.push(ControlAction::ToggleOverlay(row.id.clone(), checked));
                    }
                    if let Some(status) = &row.status {
                        ui.weak(status);
                    }
                });
            }
        }
    }
}

fn apply_action(map: &mut Map, action: ControlAction) {
    let result = match action {
        ControlAction::SelectBasemap(id) => map.select_basemap(&id),
        ControlAction::ToggleOverlay(id, visible) => map.set_overlay_visible(&id, visible),
        ControlAction::Zoom(step) => {
            let zoom = map.viewport().zoom + step;
            map.zoom_to(zoom, None);
            Ok(())
        }
    };
    if let Err(e) = result {
        log::warn!("Control action failed: {}", e);
    }
}

/// Foreground area pinned to one corner of the map
fn control_area(ui: &Ui, rect: Rect, position: ControlPosition, name: &str) -> egui::Area {
    let (anchor, pivot) = match position {
        ControlPosition::TopLeft => (rect.left_top() + Vec2::splat(CONTROL_MARGIN), Align2::LEFT_TOP),
        ControlPosition::TopRight => (
            rect.right_top() + Vec2::new(-CONTROL_MARGIN, CONTROL_MARGIN),
            Align2::RIGHT_TOP,
        ),
        ControlPosition::BottomLeft => (
            rect.left_bottom() + Vec2::new(CONTROL_MARGIN, -CONTROL_MARGIN * 2.0),
            Align2::LEFT_BOTTOM,
        ),
        ControlPosition::BottomRight => (
            rect.right_bottom() - Vec2::new(CONTROL_MARGIN, CONTROL_MARGIN * 2.0),
            Align2::RIGHT_BOTTOM,
        ),
    };

    egui::Area::new(ui.id().with(name))
        .order(egui::Order::Foreground)
        .pivot(pivot)
        .fixed_pos(anchor)
}

fn to_screen(rect: Rect, point: &Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

fn to_map_point(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

/// Convenience for adding a [`MapView`] to a [`Ui`]
pub trait UiMapExt {
    fn map_view(&mut self, map: &mut Map) -> Response;
}

impl UiMapExt for Ui {
    fn map_view(&mut self, map: &mut Map) -> Response {
        self.add(MapView::new(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{composer::MapComposer, composer::PLATES_LAYER_ID, config::MapConfig};

    fn composed_map() -> Map {
        let config = MapConfig::default();
        let composer = MapComposer::new(&config);
        composer
            .compose(
                composer.earthquake_group(),
                composer.plate_group(),
                Point::new(800.0, 600.0),
            )
            .unwrap()
    }

    #[test]
    fn test_view_config_defaults() {
        let config = MapViewConfig::default();
        assert!(config.interactive);
        assert!(config.show_zoom_controls);
        assert!(config.preferred_size.is_none());
        assert!(config.zoom_sensitivity > 0.0);
    }

    #[test]
    fn test_screen_coordinates_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(20.0, 40.0), Vec2::new(800.0, 600.0));
        let pos = to_screen(rect, &Point::new(100.0, 50.0));
        assert_eq!(pos, Pos2::new(120.0, 90.0));
        assert_eq!(to_map_point(rect, pos), Point::new(100.0, 50.0));
    }

    #[test]
    fn test_control_actions() {
        let mut map = composed_map();

        apply_action(&mut map, ControlAction::SelectBasemap("satellite".into()));
        assert_eq!(map.active_basemap(), Some("satellite"));
        assert!(!map.is_layer_visible("light"));

        apply_action(&mut map, ControlAction::ToggleOverlay(PLATES_LAYER_ID.into(), false));
        assert!(!map.is_layer_visible(PLATES_LAYER_ID));

        let zoom = map.viewport().zoom;
        apply_action(&mut map, ControlAction::Zoom(1.0));
        assert_eq!(map.viewport().zoom, zoom + 1.0);
    }

    #[test]
    fn test_unknown_basemap_is_ignored() {
        let mut map = composed_map();
        apply_action(&mut map, ControlAction::SelectBasemap("nope".into()));
        assert_eq!(map.active_basemap(), Some("light"));
    }
}
