use crate::core::{
    bounds::Bounds,
    constants::{DEFAULT_ZOOM_SNAP, OSM_MAX_ZOOM, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const EARTH_RADIUS: f64 = 6378137.0;

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
    /// Zoom levels are snapped to multiples of this value (0 disables snapping)
    pub zoom_snap: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let max_zoom = OSM_MAX_ZOOM as f64;
        Self {
            center,
            zoom: zoom.clamp(0.0, max_zoom),
            size,
            min_zoom: 0.0,
            max_zoom,
            zoom_snap: DEFAULT_ZOOM_SNAP,
        }
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Snaps and clamps a zoom level the way `setView` does
    pub fn limit_zoom(&self, zoom: f64) -> f64 {
        let snapped = if self.zoom_snap > 0.0 {
            (zoom / self.zoom_snap).round() * self.zoom_snap
        } else {
            zoom
        };
        snapped.clamp(self.min_zoom, self.max_zoom)
    }

    /// Moves the view to `center` at `zoom`
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = self.limit_zoom(zoom);
    }

    /// Pixel scale of the whole world at `zoom`
    pub fn scale(zoom: f64) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(zoom)
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = Self::scale(zoom.unwrap_or(self.zoom));

        let lat = LatLng::clamp_lat(lat_lng.lat);
        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS;

        let half_world = PI * EARTH_RADIUS;
        Point::new(
            (x + half_world) / (2.0 * half_world) * scale,
            (half_world - y) / (2.0 * half_world) * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = Self::scale(zoom.unwrap_or(self.zoom));

        let half_world = PI * EARTH_RADIUS;
        let x = pixel.x / scale * (2.0 * half_world) - half_world;
        let y = half_world - pixel.y / scale * (2.0 * half_world);

        let lng = (x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        LatLng::new(lat, lng)
    }

    /// World pixel of the container's top-left corner
    fn pixel_origin(&self) -> Point {
        self.project(&self.center, None)
            .subtract(&self.size.divide(2.0))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, None).subtract(&self.pixel_origin())
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin()), None)
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.container_point_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.container_point_to_lat_lng(&self.size);
        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Pixel footprint of `bounds` inside the container at the current view
    pub fn container_bounds(&self, bounds: &LatLngBounds) -> Bounds {
        Bounds::from_corners(
            self.lat_lng_to_container_point(&bounds.north_west()),
            self.lat_lng_to_container_point(&bounds.south_east()),
        )
    }

    /// Highest zoom at which `bounds` fits the container minus `padding`
    /// (the summed top-left and bottom-right padding)
    pub fn bounds_zoom(&self, bounds: &LatLngBounds, padding: Point) -> f64 {
        let size = self.size.subtract(&padding);
        let nw = self.project(&bounds.north_west(), None);
        let se = self.project(&bounds.south_east(), None);
        let bounds_size = Bounds::from_corners(nw, se).size();

        let scale = (size.x / bounds_size.x).min(size.y / bounds_size.y);
        let mut zoom = self.zoom + scale.log2();

        if self.zoom_snap > 0.0 {
            // Absorb float noise before flooring to the snap grid
            let fine = self.zoom_snap / 100.0;
            zoom = (zoom / fine).round() * fine;
            zoom = (zoom / self.zoom_snap).floor() * self.zoom_snap;
        }

        if zoom.is_nan() {
            return self.min_zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Center and zoom that show `bounds` with the given pixel padding
    pub fn bounds_center_zoom(
        &self,
        bounds: &LatLngBounds,
        padding_top_left: Point,
        padding_bottom_right: Point,
    ) -> (LatLng, f64) {
        let zoom = self.bounds_zoom(bounds, padding_top_left.add(&padding_bottom_right));
        if zoom.is_infinite() {
            return (bounds.center(), zoom);
        }

        let padding_offset = padding_bottom_right
            .subtract(&padding_top_left)
            .divide(2.0);
        let sw = self.project(&bounds.south_west, Some(zoom));
        let ne = self.project(&bounds.north_east, Some(zoom));
        let center = self.unproject(&sw.add(&ne).divide(2.0).add(&padding_offset), Some(zoom));

        (center, zoom)
    }

    /// Fits the viewport to contain the given bounds with symmetric padding
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Point) {
        let (center, zoom) = self.bounds_center_zoom(bounds, padding, padding);
        log::debug!(
            "fit_bounds: {:?} -> center ({:.6}, {:.6}) zoom {}",
            bounds,
            center.lat,
            center.lng,
            zoom
        );
        self.set_view(center, zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(42.0, 12.0), 10.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 10.0);
        assert_eq!(viewport.center.lat, 42.0);
        assert_eq!(viewport.max_zoom, 19.0);
    }

    #[test]
    fn test_project_world_corners() {
        let viewport = Viewport::default();
        let origin = viewport.project(&LatLng::new(0.0, 0.0), Some(0.0));
        assert!((origin.x - 128.0).abs() < 1e-9);
        assert!((origin.y - 128.0).abs() < 1e-9);

        let back = viewport.unproject(&Point::new(64.0, 64.0), Some(0.0));
        let again = viewport.project(&back, Some(0.0));
        assert!((again.x - 64.0).abs() < 1e-9);
        assert!((again.y - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_container_point_round_trip() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center = viewport.container_point_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center.lat.abs() < 1e-9);
        assert!(center.lng.abs() < 1e-9);
    }

    #[test]
    fn test_zoom_limits_and_snap() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(2.0, 15.0);

        viewport.set_view(LatLng::default(), 1.0);
        assert_eq!(viewport.zoom, 2.0);

        viewport.set_view(LatLng::default(), 20.0);
        assert_eq!(viewport.zoom, 15.0);

        viewport.set_view(LatLng::default(), 7.4);
        assert_eq!(viewport.zoom, 7.0);
    }

    #[test]
    fn test_fit_bounds_keeps_padding() {
        let mut viewport = Viewport::new(LatLng::default(), 3.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::from_coords(41.8, 12.3, 42.0, 12.6);
        let padding = Point::new(30.0, 30.0);

        viewport.fit_bounds(&bounds, padding);

        let frame = Bounds::from_coords(0.0, 0.0, 800.0, 600.0);
        let footprint = viewport.container_bounds(&bounds);
        assert!(frame.contains_bounds(&footprint.padded(padding)));

        // One more zoom level would no longer fit
        let mut closer = viewport.clone();
        closer.zoom += 1.0;
        let too_big = closer.container_bounds(&bounds).padded(padding);
        assert!(!frame.contains_bounds(&too_big));
    }

    #[test]
    fn test_fit_single_point_goes_to_max_zoom() {
        let mut viewport = Viewport::default();
        let point = LatLng::new(42.0, 12.0);

        viewport.fit_bounds(&LatLngBounds::new(point, point), Point::new(30.0, 30.0));

        assert_eq!(viewport.zoom, 19.0);
        assert!((viewport.center.lat - 42.0).abs() < 1e-9);
        assert!((viewport.center.lng - 12.0).abs() < 1e-9);
    }
}
