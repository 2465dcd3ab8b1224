use crate::{layers::base::LayerTrait, prelude::HashMap};

/// Owns a set of layers keyed by id, remembering insertion order
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Layer IDs in the order they were added
    order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            order: Vec::new(),
        }
    }

    /// Adds a layer; returns `false` and drops it if the id is already present
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> bool {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return false;
        }

        self.layers.insert(layer_id.clone(), layer);
        self.order.push(layer_id);
        true
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Removes every layer, returning them in insertion order
    pub fn clear(&mut self) -> Vec<Box<dyn LayerTrait>> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.layers.remove(&id))
            .collect()
    }

    pub fn contains(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Lists all layer IDs in insertion order
    pub fn list_layers(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Gets all layers in insertion order
    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Applies a function to each layer immutably in insertion order
    pub fn for_each_layer<F>(&self, mut f: F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        for id in &self.order {
            if let Some(layer) = self.layers.get(id) {
                f(layer.as_ref());
            }
        }
    }

    /// Applies a function to each layer mutably in insertion order
    pub fn for_each_layer_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn LayerTrait),
    {
        for id in &self.order {
            if let Some(layer) = self.layers.get_mut(id) {
                f(layer.as_mut());
            }
        }
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLng, layers::marker::Marker};

    fn marker(id: &str) -> Box<dyn LayerTrait> {
        Box::new(Marker::new(id.to_string(), LatLng::new(42.0, 12.0)))
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut manager = LayerManager::new();
        manager.add_layer(marker("b"));
        manager.add_layer(marker("a"));
        manager.add_layer(marker("c"));

        assert_eq!(manager.list_layers(), vec!["b", "a", "c"]);

        manager.remove_layer("a");
        assert_eq!(manager.list_layers(), vec!["b", "c"]);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_duplicate_id_is_ignored() {
        let mut manager = LayerManager::new();
        assert!(manager.add_layer(marker("a")));
        assert!(!manager.add_layer(marker("a")));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_clear_returns_layers_in_order() {
        let mut manager = LayerManager::new();
        manager.add_layer(marker("x"));
        manager.add_layer(marker("y"));

        let removed: Vec<String> = manager
            .clear()
            .iter()
            .map(|l| l.id().to_string())
            .collect();

        assert_eq!(removed, vec!["x", "y"]);
        assert!(manager.is_empty());
        assert!(!manager.contains("x"));
    }
}
