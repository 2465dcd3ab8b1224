//! Configuration for the map model and the page it is wired into
//!
//! `MapOptions` is the Rust-side setup (viewport size, padding, tile source,
//! page element ids). `LeafletConfig` and `MapStatus` are the JSON blocks the
//! host page embeds and are re-read on every cycle.

use crate::core::{
    constants::{
        DEFAULT_VIEWPORT_SIZE, FIT_BOUNDS_PADDING, POPUP_MAX_WIDTH, POPUP_MIN_WIDTH,
    },
    geo::{LatLng, Point},
};
use crate::layers::tile::TileLayerOptions;
use serde::{Deserialize, Serialize};

/// Element ids the render cycle reads from and writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageIds {
    pub layer_data: String,
    pub marker_data: String,
    pub line_data: String,
    pub leaflet_config: String,
    pub map_status: String,
    pub lat_input: String,
    pub long_input: String,
    /// CSS selector of the region swapped by `open_drawing`
    pub swap_target: String,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            layer_data: "layer_data".to_string(),
            marker_data: "marker_data".to_string(),
            line_data: "line_data".to_string(),
            leaflet_config: "leaflet_config".to_string(),
            map_status: "map_status".to_string(),
            lat_input: "id_lat".to_string(),
            long_input: "id_long".to_string(),
            swap_target: "#nav-card".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    /// Container size in pixels
    pub size: Point,
    /// Padding kept around the markers by `fit_bounds`
    pub fit_padding: Point,
    pub popup_min_width: u32,
    pub popup_max_width: u32,
    pub tiles: TileLayerOptions,
    pub ids: PageIds,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            size: Point::new(DEFAULT_VIEWPORT_SIZE.0, DEFAULT_VIEWPORT_SIZE.1),
            fit_padding: Point::new(FIT_BOUNDS_PADDING, FIT_BOUNDS_PADDING),
            popup_min_width: POPUP_MIN_WIDTH,
            popup_max_width: POPUP_MAX_WIDTH,
            tiles: TileLayerOptions::default(),
            ids: PageIds::default(),
        }
    }
}

impl MapOptions {
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Point::new(width, height);
        self
    }

    pub fn with_ids(mut self, ids: PageIds) -> Self {
        self.ids = ids;
        self
    }
}

/// The `leaflet_config` block: default view plus optional zoom limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeafletConfig {
    /// `[lat, lng]`
    pub default_center: [f64; 2],
    pub default_zoom: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

impl LeafletConfig {
    pub fn new(default_center: LatLng, default_zoom: f64) -> Self {
        Self {
            default_center: [default_center.lat, default_center.lng],
            default_zoom,
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::from(self.default_center)
    }
}

/// The `map_status` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapStatus {
    /// Whether a click on the map registers a new point
    #[serde(default)]
    pub map_on_click: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaflet_config_keys() {
        let config: LeafletConfig =
            serde_json::from_str(r#"{"DEFAULT_CENTER": [41.9, 12.5], "DEFAULT_ZOOM": 6}"#)
                .unwrap();
        assert_eq!(config.center(), LatLng::new(41.9, 12.5));
        assert_eq!(config.default_zoom, 6.0);
        assert_eq!(config.max_zoom, None);

        let with_limits: LeafletConfig = serde_json::from_str(
            r#"{"DEFAULT_CENTER": [0, 0], "DEFAULT_ZOOM": 2, "MIN_ZOOM": 1, "MAX_ZOOM": 16}"#,
        )
        .unwrap();
        assert_eq!(with_limits.min_zoom, Some(1.0));
        assert_eq!(with_limits.max_zoom, Some(16.0));
    }

    #[test]
    fn test_map_status_defaults_off() {
        let status: MapStatus = serde_json::from_str("{}").unwrap();
        assert!(!status.map_on_click);
        let status: MapStatus = serde_json::from_str(r#"{"map_on_click": true}"#).unwrap();
        assert!(status.map_on_click);
    }

    #[test]
    fn test_default_ids() {
        let ids = PageIds::default();
        assert_eq!(ids.lat_input, "id_lat");
        assert_eq!(ids.long_input, "id_long");
        assert_eq!(ids.swap_target, "#nav-card");
    }
}
