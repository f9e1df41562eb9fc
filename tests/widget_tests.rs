#![cfg(feature = "egui")]

//! Drives the map widget through headless egui frames

use egui::{Context, Event, PointerButton, Pos2, RawInput, Rect, Vec2};
use quakemap::{
    core::composer::{MapComposer, EARTHQUAKES_LAYER_ID},
    ui::widget::MapView,
    EarthquakeFeature, EarthquakeStyler, LatLng, Map, MapConfig, Point,
};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

fn composed_map() -> Map {
    let config = MapConfig::default();
    let composer = MapComposer::new(&config);
    let earthquakes = composer.earthquake_group();
    let styler = EarthquakeStyler::from_config(&config);
    earthquakes.set_features(composer.earthquake_markers(
        &[EarthquakeFeature {
            id: Some("ok1".into()),
            place: "10km S of Cushing, OK".into(),
            magnitude: 4.2,
            coordinates: [-96.77, 35.89, 5.0],
        }],
        &styler,
    ));

    composer
        .compose(earthquakes, composer.plate_group(), Point::new(SCREEN.x as f64, SCREEN.y as f64))
        .unwrap()
}

fn raw_input(events: Vec<Event>) -> RawInput {
    RawInput {
        screen_rect: Some(Rect::from_min_size(Pos2::ZERO, SCREEN)),
        events,
        ..Default::default()
    }
}

/// Runs one frame with the map filling the screen and returns the map rect
fn run_frame(ctx: &Context, map: &mut Map, events: Vec<Event>) -> Rect {
    let mut rect = Rect::NOTHING;
    let _ = ctx.run(raw_input(events), |ctx| {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                rect = ui.add(MapView::new(map)).rect;
            });
    });
    rect
}

fn click_at(pos: Pos2) -> Vec<Vec<Event>> {
    let press = |pressed| Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed,
        modifiers: Default::default(),
    };
    vec![
        vec![Event::PointerMoved(pos)],
        vec![press(true)],
        vec![press(false)],
    ]
}

#[test]
fn test_widget_sizes_map_to_its_rect() {
    let ctx = Context::default();
    let mut map = composed_map();
    map.set_size(Point::new(100.0, 100.0));

    let rect = run_frame(&ctx, &mut map, Vec::new());

    assert!(rect.width() > 0.0);
    assert_eq!(map.viewport().size, Point::new(rect.width() as f64, rect.height() as f64));
}

#[test]
fn test_click_on_marker_opens_popup() {
    let ctx = Context::default();
    let mut map = composed_map();
    map.set_view(LatLng::new(35.89, -96.77), 7.0);

    let rect = run_frame(&ctx, &mut map, Vec::new());
    let center = rect.center();

    for events in click_at(center) {
        run_frame(&ctx, &mut map, events);
    }

    let popup = map.selected_popup().expect("marker under the click");
    assert!(popup.content.contains("Cushing"));
}

#[test]
fn test_click_on_empty_map_clears_popup() {
    let ctx = Context::default();
    let mut map = composed_map();
    map.set_view(LatLng::new(35.89, -96.77), 7.0);
    let rect = run_frame(&ctx, &mut map, Vec::new());

    // select the marker directly, then click far away from it
    let center = Point::new(rect.width() as f64 / 2.0, rect.height() as f64 / 2.0);
    assert!(map.click(&center).is_some());

    for events in click_at(rect.left_top() + Vec2::new(300.0, 40.0)) {
        run_frame(&ctx, &mut map, events);
    }
    assert!(map.selected_popup().is_none());
}

#[test]
fn test_hidden_overlay_not_clickable() {
    let ctx = Context::default();
    let mut map = composed_map();
    map.set_view(LatLng::new(35.89, -96.77), 7.0);
    map.set_overlay_visible(EARTHQUAKES_LAYER_ID, false).unwrap();

    let rect = run_frame(&ctx, &mut map, Vec::new());
    for events in click_at(rect.center()) {
        run_frame(&ctx, &mut map, events);
    }
    assert!(map.selected_popup().is_none());
}

#[test]
fn test_non_interactive_view_ignores_clicks() {
    let ctx = Context::default();
    let mut map = composed_map();
    map.set_view(LatLng::new(35.89, -96.77), 7.0);

    let frame = |ctx: &Context, map: &mut Map, events: Vec<Event>| {
        let _ = ctx.run(raw_input(events), |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| {
                    ui.add(MapView::new(map).interactive(false));
                });
        });
    };

    frame(&ctx, &mut map, Vec::new());
    for events in click_at(Pos2::new(SCREEN.x / 2.0, SCREEN.y / 2.0)) {
        frame(&ctx, &mut map, events);
    }
    assert!(map.selected_popup().is_none());
}
