use crate::core::{
    constants::TILE_SIZE,
    geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(LatLng::clamp_lat(center.lat), wrap_lng(center.lng));
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Size of the whole world in pixels at the current zoom
    pub fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let scale = self.world_size();
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();

        let x = (lat_lng.lng + 180.0) / 360.0 * scale;
        let y = (1.0 - (PI / 4.0 + lat_rad / 2.0).tan().ln() / PI) / 2.0 * scale;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point) -> LatLng {
        let scale = self.world_size();

        let lng = pixel.x / scale * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / scale);
        let lat = n.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// World pixel coordinate of the container's top-left corner
    fn pixel_origin(&self) -> Point {
        self.project(&self.center)
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng).subtract(&self.pixel_origin())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.unproject(&pixel.add(&self.pixel_origin()))
    }

    /// Geographic bounds of the visible area. Longitudes are not wrapped, so
    /// near the antimeridian they run past ±180.
    pub fn bounds(&self) -> LatLngBounds {
        let north_west = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let south_east = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(
            LatLng::new(south_east.lat, north_west.lng),
            LatLng::new(north_west.lat, south_east.lng),
        )
    }

    /// Longitude offsets (multiples of 360) of every world copy the visible
    /// area overlaps, west to east
    pub fn world_offsets(&self) -> Vec<f64> {
        let bounds = self.bounds();
        let first = ((bounds.south_west.lng - 180.0) / 360.0).ceil() as i64;
        let last = ((bounds.north_east.lng + 180.0) / 360.0).floor() as i64;
        (first..=last).map(|copy| copy as f64 * 360.0).collect()
    }

    /// Horizontal pixel distance to the world copy `lng_offset` degrees east
    pub fn world_copy_shift(&self, lng_offset: f64) -> f64 {
        lng_offset / 360.0 * self.world_size()
    }

    /// Pans the viewport by a pixel offset (positive x drags the map right)
    pub fn pan(&mut self, delta: Point) {
        let center_pixel = self.project(&self.center).subtract(&delta);
        let new_center = self.unproject(&center_pixel);
        self.set_center(new_center);
    }

    /// Zooms to `zoom`, keeping the geographic point under `focus_point` fixed
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                let drift = self.lat_lng_to_pixel(&focus_lat_lng).subtract(&focus);
                self.pan(drift.multiply(-1.0));
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Converts a ground distance in metres at `lat` to screen pixels
    pub fn meters_to_pixels(&self, meters: f64, lat: f64) -> f64 {
        let circumference = 2.0 * PI * EARTH_RADIUS * LatLng::clamp_lat(lat).to_radians().cos();
        meters / circumference * self.world_size()
    }
}

/// Wraps longitude to the [-180, 180] range
fn wrap_lng(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}
