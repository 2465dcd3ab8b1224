use crate::{core::map::Map, MapError, Result};
use serde::Serialize;

/// One row of the layer switcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlEntry {
    pub layer_id: String,
    pub name: String,
}

/// The layer switcher: overlays only, each toggled independently
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayerControl {
    overlays: Vec<ControlEntry>,
}

impl LayerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an overlay; re-registering the same layer renames it
    pub fn add_overlay(&mut self, layer_id: &str, name: &str) {
        match self.overlays.iter_mut().find(|e| e.layer_id == layer_id) {
            Some(entry) => entry.name = name.to_string(),
            None => self.overlays.push(ControlEntry {
                layer_id: layer_id.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Drops a layer from the switcher, returns whether it was listed
    pub fn remove_layer(&mut self, layer_id: &str) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|e| e.layer_id != layer_id);
        before != self.overlays.len()
    }

    pub fn overlays(&self) -> &[ControlEntry] {
        &self.overlays
    }

    pub fn overlay_names(&self) -> Vec<&str> {
        self.overlays.iter().map(|e| e.name.as_str()).collect()
    }

    /// Layer id of the overlay listed under `name`
    pub fn find_overlay(&self, name: &str) -> Option<&str> {
        self.overlays
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.layer_id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Shows or hides the overlay listed under `name`
    pub fn toggle_overlay(&self, map: &mut Map, name: &str, visible: bool) -> Result<()> {
        let layer_id = self
            .find_overlay(name)
            .ok_or_else(|| MapError::MissingLayer(name.to_string()))?;

        if map.set_layer_visible(layer_id, visible) {
            log::debug!("overlay `{}` visible: {}", name, visible);
            Ok(())
        } else {
            Err(MapError::Layer(format!(
                "overlay `{}` is listed but not attached",
                name
            )))
        }
    }
}
