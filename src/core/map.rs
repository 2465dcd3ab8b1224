use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    input::events::{InputEvent, MapEvent, MouseButton},
    layers::{base::LayerTrait, manager::LayerManager, tile::TileLayer},
};
use serde::Serialize;

/// Serializable picture of the map state, handed to hosts that draw it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub center: LatLng,
    pub zoom: f64,
    pub layers: Vec<serde_json::Value>,
}

/// The map: attached layers plus the viewport they are seen through
pub struct Map {
    viewport: Viewport,
    layer_manager: LayerManager,
    /// Explicit zoom limits; unset sides follow the attached tile layers
    zoom_override: (Option<f64>, Option<f64>),
}

impl Map {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            zoom_override: (None, None),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn center(&self) -> LatLng {
        self.viewport.center
    }

    pub fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    /// Centers the view; `zoom` is clamped to the current zoom range
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.viewport.set_view(center, zoom);
    }

    /// Shows `bounds` as large as possible, keeping `padding` pixels free
    /// on every side
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: Point) {
        let (center, zoom) = self.viewport.bounds_center_zoom(bounds, padding, padding);
        self.set_view(center, zoom);
    }

    /// Pins the zoom range; `None` sides fall back to the tile layers' range
    pub fn set_zoom_bounds(&mut self, min_zoom: Option<f64>, max_zoom: Option<f64>) {
        self.zoom_override = (min_zoom, max_zoom);
        self.update_zoom_levels();
    }

    fn update_zoom_levels(&mut self) {
        let mut tile_min: Option<f64> = None;
        let mut tile_max: Option<f64> = None;
        self.layer_manager.for_each_layer(|layer| {
            if let Some(tiles) = layer.as_any().downcast_ref::<TileLayer>() {
                let min = tiles.min_zoom() as f64;
                let max = tiles.max_zoom() as f64;
                tile_min = Some(tile_min.map_or(min, |m| m.min(min)));
                tile_max = Some(tile_max.map_or(max, |m| m.max(max)));
            }
        });

        let default = Viewport::default();
        let min_zoom = self.zoom_override.0.or(tile_min).unwrap_or(default.min_zoom);
        let max_zoom = self.zoom_override.1.or(tile_max).unwrap_or(default.max_zoom);
        self.viewport.set_zoom_limits(min_zoom, max_zoom);
    }

    /// Attaches a layer; attaching an id that is already on the map is a no-op
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> bool {
        let is_tiles = layer.as_any().is::<TileLayer>();
        let added = self.layer_manager.add_layer(layer);
        if added && is_tiles {
            self.update_zoom_levels();
        }
        added
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        let removed = self.layer_manager.remove_layer(layer_id);
        if removed.as_ref().is_some_and(|l| l.as_any().is::<TileLayer>()) {
            self.update_zoom_levels();
        }
        removed
    }

    /// Detaches every layer and hands them back in attach order
    pub fn clear_layers(&mut self) -> Vec<Box<dyn LayerTrait>> {
        let removed = self.layer_manager.clear();
        self.update_zoom_levels();
        removed
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layer_manager.contains(layer_id)
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    /// Runs `f` on the attached layer `layer_id` if it is a `T`
    pub fn with_layer_as<T, F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        T: LayerTrait,
        F: FnOnce(&mut T) -> R,
    {
        self.layer_manager
            .with_layer_mut(layer_id, |layer| layer.as_any_mut().downcast_mut::<T>().map(f))
            .flatten()
    }

    /// Typed read access to an attached layer
    pub fn layer_as<T: LayerTrait>(&self, layer_id: &str) -> Option<&T> {
        self.layer_manager
            .get_layer(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<T>())
    }

    pub fn for_each_layer<F>(&self, f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        self.layer_manager.for_each_layer(f);
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_manager.len()
    }

    /// Returns `false` when no such layer is attached
    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> bool {
        self.layer_manager
            .with_layer_mut(layer_id, |layer| layer.set_visible(visible))
            .is_some()
    }

    /// Resolves raw pointer input against the current view
    pub fn handle_input(&mut self, input: &InputEvent) -> Option<MapEvent> {
        match input {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => Some(MapEvent::Click {
                lat_lng: self.viewport.container_point_to_lat_lng(position),
                pixel: Some(*position),
            }),
            InputEvent::Click { .. } => None,
            InputEvent::Resize { size } => {
                self.set_size(*size);
                None
            }
        }
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
            layers: self
                .layer_manager
                .layers()
                .iter()
                .map(|layer| layer.options())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{group::LayerGroup, marker::Marker};

    fn map() -> Map {
        Map::new(LatLng::new(0.0, 0.0), 2.0, Point::new(800.0, 600.0))
    }

    #[test]
    fn test_add_and_remove_layers() {
        let mut map = map();
        assert!(map.add_layer(Box::new(Marker::new("m".to_string(), LatLng::new(1.0, 1.0)))));
        assert!(!map.add_layer(Box::new(Marker::new("m".to_string(), LatLng::new(2.0, 2.0)))));
        assert_eq!(map.layer_count(), 1);

        let removed = map.remove_layer("m").unwrap();
        assert_eq!(removed.id(), "m");
        assert!(!map.has_layer("m"));
    }

    #[test]
    fn test_zoom_levels_follow_tile_layers() {
        let mut map = map();
        map.add_layer(Box::new(TileLayer::openstreetmap(
            "base".to_string(),
            "OSM".to_string(),
        )));
        assert_eq!(map.viewport().max_zoom, 19.0);

        map.set_zoom_bounds(None, Some(16.0));
        assert_eq!(map.viewport().max_zoom, 16.0);

        map.set_view(LatLng::new(42.0, 12.0), 18.0);
        assert_eq!(map.zoom(), 16.0);
    }

    #[test]
    fn test_with_layer_as_downcasts() {
        let mut map = map();
        map.add_layer(Box::new(LayerGroup::new("g".to_string(), "G".to_string())));

        let added = map.with_layer_as::<LayerGroup, _, _>("g", |group| {
            group.add_layer(Box::new(Marker::new("m".to_string(), LatLng::new(1.0, 1.0))))
        });
        assert_eq!(added, Some(true));
        assert_eq!(map.layer_as::<LayerGroup>("g").unwrap().len(), 1);
        assert!(map.with_layer_as::<Marker, _, _>("g", |_| ()).is_none());
    }

    #[test]
    fn test_click_resolves_to_coordinate() {
        let mut map = Map::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let event = map
            .handle_input(&InputEvent::Click {
                position: Point::new(256.0, 256.0),
                button: MouseButton::Left,
            })
            .unwrap();

        let MapEvent::Click { lat_lng, pixel } = event;
        assert!(lat_lng.lat.abs() < 1e-9);
        assert!(lat_lng.lng.abs() < 1e-9);
        assert_eq!(pixel, Some(Point::new(256.0, 256.0)));

        let right = InputEvent::Click {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
        };
        assert!(map.handle_input(&right).is_none());
    }

    #[test]
    fn test_resize_keeps_view() {
        let mut map = map();
        map.set_view(LatLng::new(42.0, 12.0), 6.0);
        let event = map.handle_input(&InputEvent::Resize {
            size: Point::new(1024.0, 768.0),
        });

        assert!(event.is_none());
        assert_eq!(map.viewport().size, Point::new(1024.0, 768.0));
        assert_eq!(map.center(), LatLng::new(42.0, 12.0));
        assert_eq!(map.zoom(), 6.0);
    }
}
