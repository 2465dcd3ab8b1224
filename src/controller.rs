//! The render cycle: payloads in, overlays and view out
//!
//! [`RenderCycleController`] owns the [`Map`], its [`LayerControl`] and the
//! page. `refresh` rebuilds every overlay from the page payloads,
//! `handle_click` registers a point into the form, and `open_drawing`
//! fires a partial swap of the detail card.

use crate::{
    core::{
        config::MapOptions,
        geo::LatLng,
        map::{Map, MapSnapshot},
    },
    data::geojson::GeoJsonLayer,
    input::events::{InputEvent, MapEvent, PageEvent},
    layers::{base::LayerTrait, group::LayerGroup, marker::Marker, tile::TileLayer},
    page::PageHost,
    payload::{marker_popup, read_map_status, Payloads},
    prelude::HashMap,
    swap::{PartialSwap, SwapMethod},
    ui::{
        controls::LayerControl,
        popup::{Popup, PopupOptions},
    },
    MapError, Result,
};
use serde::Serialize;

pub const BASE_LAYER_ID: &str = "base";
pub const BASE_LAYER_NAME: &str = "OpenStreetMap";
pub const MARKER_LAYER_ID: &str = "markers";
pub const CLICK_MARKER_ID: &str = "click-marker";

/// Map id of the overlay group named `name`
pub fn overlay_id(name: &str) -> String {
    format!("overlay:{}", name)
}

/// Everything a host needs to draw the current state
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub map: MapSnapshot,
    pub control: LayerControl,
}

pub struct RenderCycleController<P: PageHost> {
    map: Map,
    control: LayerControl,
    page: P,
    options: MapOptions,
    /// Overlay name → map layer id, rebuilt every cycle
    overlays: HashMap<String, String>,
    swap: Option<Box<dyn PartialSwap>>,
    cycles: u64,
}

impl<P: PageHost> RenderCycleController<P> {
    /// A controller with an empty marker group attached and no cycle run yet
    pub fn new(page: P, options: MapOptions) -> Self {
        let mut map = Map::new(LatLng::default(), 0.0, options.size);
        map.add_layer(Box::new(Self::marker_group()));

        Self {
            map,
            control: LayerControl::new(),
            page,
            options,
            overlays: HashMap::default(),
            swap: None,
            cycles: 0,
        }
    }

    /// Creates the controller and runs the first render cycle
    pub fn load(page: P, options: MapOptions) -> Result<Self> {
        let mut controller = Self::new(page, options);
        controller.refresh()?;
        Ok(controller)
    }

    pub fn with_swap(mut self, swap: impl PartialSwap + 'static) -> Self {
        self.swap = Some(Box::new(swap));
        self
    }

    pub fn set_swap(&mut self, swap: Box<dyn PartialSwap>) {
        self.swap = Some(swap);
    }

    fn marker_group() -> LayerGroup {
        LayerGroup::new(MARKER_LAYER_ID.to_string(), "Markers".to_string())
    }

    fn popup_options(&self) -> PopupOptions {
        PopupOptions {
            min_width: self.options.popup_min_width,
            max_width: self.options.popup_max_width,
        }
    }

    /// Rebuilds every overlay from the page payloads and fits the view
    ///
    /// Payloads are read and every feature is built before the map changes:
    /// on error the previous overlays and view are left as they were.
    pub fn refresh(&mut self) -> Result<()> {
        let payloads = Payloads::read(&self.page, &self.options.ids)?;
        let popup_options = self.popup_options();

        let mut markers = Self::marker_group();
        let marker_builder = GeoJsonLayer::new().on_each_feature(|feature, layer| {
            if let Some(content) = marker_popup(feature) {
                layer.bind_popup(Popup::new(content).with_options(popup_options.clone()));
            }
        });
        for (index, feature) in payloads.markers.features.iter().enumerate() {
            let id = format!("{}/{}", MARKER_LAYER_ID, index);
            if let Some(layer) = marker_builder.build_feature(&id, feature)? {
                markers.add_layer(layer);
            }
        }

        let fit = if payloads.markers.is_empty() {
            None
        } else {
            Some(payloads.markers.bounds()?.ok_or_else(|| {
                MapError::InvalidCoordinates("marker features have no bounds".to_string())
            })?)
        };

        let mut lines: Vec<(String, Box<dyn LayerTrait>)> = Vec::with_capacity(payloads.lines.len());
        for (index, line) in payloads.lines.iter().enumerate() {
            let id = format!("{}/{}", overlay_id(&line.layer), index);
            let built = GeoJsonLayer::new()
                .set_style(line.style.clone())
                .build_feature(&id, &line.feature)?;
            if let Some(mut layer) = built {
                if let Some(content) = &line.popup {
                    layer.bind_popup(Popup::new(content.clone()).with_options(popup_options.clone()));
                }
                lines.push((line.layer.clone(), layer));
            }
        }

        // Nothing below can fail on payload content
        for layer in self.map.clear_layers() {
            self.control.remove_layer(layer.id());
        }
        self.overlays.clear();

        self.map.add_layer(Box::new(TileLayer::with_options(
            BASE_LAYER_ID.to_string(),
            BASE_LAYER_NAME.to_string(),
            self.options.tiles.clone(),
        )));

        for name in &payloads.layer_names {
            let id = overlay_id(name);
            self.map
                .add_layer(Box::new(LayerGroup::new(id.clone(), name.clone())));
            self.control.add_overlay(&id, name);
            self.overlays.insert(name.clone(), id);
        }

        let marker_count = markers.len();
        self.map.add_layer(Box::new(markers));

        match (&fit, &payloads.config) {
            (Some(bounds), config) => {
                match config {
                    Some(config) => self.map.set_zoom_bounds(config.min_zoom, config.max_zoom),
                    None => self.map.set_zoom_bounds(None, None),
                }
                self.map.fit_bounds(bounds, self.options.fit_padding);
            }
            (None, Some(config)) => {
                self.map.set_zoom_bounds(config.min_zoom, config.max_zoom);
                self.map.set_view(config.center(), config.default_zoom);
            }
            (None, None) => {
                return Err(MapError::MissingElement(self.options.ids.leaflet_config.clone()))
            }
        }

        let line_count = lines.len();
        for (name, layer) in lines {
            let id = self
                .overlays
                .get(&name)
                .ok_or_else(|| MapError::MissingLayer(name.clone()))?;
            self.map
                .with_layer_as::<LayerGroup, _, _>(id, |group| group.add_layer(layer))
                .ok_or_else(|| MapError::MissingLayer(name.clone()))?;
        }

        self.cycles += 1;
        log::info!(
            "render cycle {}: {} overlays, {} markers, {} lines, view ({:.6}, {:.6}) z{}",
            self.cycles,
            self.overlays.len(),
            marker_count,
            line_count,
            self.map.center().lat,
            self.map.center().lng,
            self.map.zoom()
        );
        Ok(())
    }

    /// Registers a clicked point when the page allows it
    ///
    /// Returns whether the form and the marker were updated.
    pub fn handle_click(&mut self, lat_lng: LatLng) -> Result<bool> {
        let status = read_map_status(&self.page, &self.options.ids)?;
        if !status.map_on_click {
            log::debug!("click at ({}, {}) ignored", lat_lng.lat, lat_lng.lng);
            return Ok(false);
        }

        if !lat_lng.is_valid() {
            log::warn!(
                "clicked point ({}, {}) is outside the range the form accepts",
                lat_lng.lat,
                lat_lng.lng
            );
        }

        let ids = &self.options.ids;
        for id in [&ids.lat_input, &ids.long_input] {
            if !self.page.has_element(id) {
                return Err(MapError::MissingElement(id.clone()));
            }
        }
        self.page
            .set_attribute(&ids.lat_input, "value", &lat_lng.lat.to_string())?;
        self.page
            .set_attribute(&ids.long_input, "value", &lat_lng.lng.to_string())?;

        if !self.map.has_layer(MARKER_LAYER_ID) {
            self.map.add_layer(Box::new(Self::marker_group()));
        }
        self.map
            .with_layer_as::<LayerGroup, _, _>(MARKER_LAYER_ID, |group| {
                group.clear_layers();
                group.add_layer(Box::new(Marker::new(CLICK_MARKER_ID.to_string(), lat_lng)))
            })
            .ok_or_else(|| MapError::Layer(format!("`{}` is not a layer group", MARKER_LAYER_ID)))?;

        log::debug!("registered point ({}, {})", lat_lng.lat, lat_lng.lng);
        Ok(true)
    }

    /// Feeds raw pointer input through the map; clicks become registrations
    pub fn handle_input(&mut self, input: &InputEvent) -> Result<bool> {
        match self.map.handle_input(input) {
            Some(event) => self.handle_map_event(&event),
            None => Ok(false),
        }
    }

    pub fn handle_map_event(&mut self, event: &MapEvent) -> Result<bool> {
        match event {
            MapEvent::Click { lat_lng, .. } => self.handle_click(*lat_lng),
        }
    }

    /// Reacts to a page event; returns whether it was handled
    pub fn dispatch(&mut self, event: &PageEvent) -> Result<bool> {
        match event {
            PageEvent::RefreshCollections => {
                self.refresh()?;
                Ok(true)
            }
            PageEvent::Custom(name) => {
                log::debug!("page event `{}` not handled", name);
                Ok(false)
            }
        }
    }

    /// Swaps the drawing detail at `path` into the page's card region
    pub fn open_drawing(&self, path: &str) -> Result<()> {
        let swap = self
            .swap
            .as_ref()
            .ok_or_else(|| MapError::Swap("no partial swap backend".to_string()))?;
        swap.ajax(SwapMethod::Get, path, &self.options.ids.swap_target)
    }

    /// Map layer id of the overlay named `name`
    pub fn overlay_id(&self, name: &str) -> Option<&str> {
        self.overlays.get(name).map(String::as_str)
    }

    pub fn overlay(&self, name: &str) -> Option<&LayerGroup> {
        self.overlay_id(name)
            .and_then(|id| self.map.layer_as::<LayerGroup>(id))
    }

    pub fn markers(&self) -> Option<&LayerGroup> {
        self.map.layer_as::<LayerGroup>(MARKER_LAYER_ID)
    }

    /// Shows or hides an overlay the way its switcher entry does
    pub fn toggle_overlay(&mut self, name: &str, visible: bool) -> Result<()> {
        self.control.toggle_overlay(&mut self.map, name, visible)
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    pub fn control(&self) -> &LayerControl {
        &self.control
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Number of completed render cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            map: self.map.snapshot(),
            control: self.control.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use serde_json::json;

    fn page() -> StaticPage {
        StaticPage::new()
            .with_json("layer_data", &json!(["Roads"]))
            .and_then(|p| {
                p.with_json(
                    "marker_data",
                    &json!({"type": "FeatureCollection", "features": []}),
                )
            })
            .and_then(|p| p.with_json("line_data", &json!(null)))
            .and_then(|p| {
                p.with_json(
                    "leaflet_config",
                    &json!({"DEFAULT_CENTER": [41.9, 12.5], "DEFAULT_ZOOM": 6}),
                )
            })
            .and_then(|p| p.with_json("map_status", &json!({"map_on_click": true})))
            .unwrap()
            .with_element("id_lat")
            .with_element("id_long")
    }

    #[test]
    fn test_new_has_marker_group_only() {
        let controller = RenderCycleController::new(page(), MapOptions::default());
        assert_eq!(controller.map().list_layers(), vec![MARKER_LAYER_ID]);
        assert_eq!(controller.cycles(), 0);
    }

    #[test]
    fn test_load_attaches_base_overlays_markers() {
        let controller = RenderCycleController::load(page(), MapOptions::default()).unwrap();
        assert_eq!(
            controller.map().list_layers(),
            vec![BASE_LAYER_ID, "overlay:Roads", MARKER_LAYER_ID]
        );
        assert_eq!(controller.overlay_id("Roads"), Some("overlay:Roads"));
        assert_eq!(controller.control().overlay_names(), vec!["Roads"]);
    }

    #[test]
    fn test_custom_events_are_ignored() {
        let mut controller = RenderCycleController::load(page(), MapOptions::default()).unwrap();
        assert!(!controller
            .dispatch(&PageEvent::Custom("htmx:afterSwap".to_string()))
            .unwrap());
        assert!(controller.dispatch(&PageEvent::RefreshCollections).unwrap());
        assert_eq!(controller.cycles(), 2);
    }

    #[test]
    fn test_open_drawing_without_backend() {
        let controller = RenderCycleController::new(page(), MapOptions::default());
        assert!(matches!(
            controller.open_drawing("/drawing/1/"),
            Err(MapError::Swap(_))
        ));
    }

    #[test]
    fn test_click_before_first_cycle() {
        let mut controller = RenderCycleController::new(page(), MapOptions::default());
        assert!(controller.handle_click(LatLng::new(41.0, 12.0)).unwrap());
        assert_eq!(controller.markers().unwrap().len(), 1);
    }
}
