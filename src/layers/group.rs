use crate::{
    core::geo::LatLngBounds,
    layers::{
        base::{describe_with, LayerProperties, LayerTrait, LayerType},
        manager::LayerManager,
    },
    ui::popup::Popup,
};

/// A togglable bundle of layers that is attached and removed as one unit
pub struct LayerGroup {
    properties: LayerProperties,
    children: LayerManager,
}

impl LayerGroup {
    pub fn new(id: String, name: String) -> Self {
        Self::with_type(id, name, LayerType::Group)
    }

    pub(crate) fn with_type(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            properties: LayerProperties::new(id, name, layer_type),
            children: LayerManager::new(),
        }
    }

    /// Adds a child layer; a child with the same id is kept and the new one dropped
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> bool {
        self.children.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.children.remove_layer(layer_id)
    }

    /// Drops every child
    pub fn clear_layers(&mut self) {
        self.children.clear();
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.children.contains(layer_id)
    }

    pub fn layers(&self) -> Vec<&dyn LayerTrait> {
        self.children.layers()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Visits every leaf layer, descending into nested groups
    pub fn for_each_leaf<F>(&self, f: &mut F)
    where
        F: FnMut(&dyn LayerTrait),
    {
        self.children.for_each_layer(|layer| {
            match layer.as_any().downcast_ref::<LayerGroup>() {
                Some(group) => group.for_each_leaf(&mut *f),
                None => f(layer),
            }
        });
    }

    /// Number of leaf layers below this group
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each_leaf(&mut |_: &dyn LayerTrait| count += 1);
        count
    }
}

impl LayerTrait for LayerGroup {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        let mut bounds: Option<LatLngBounds> = None;
        self.children.for_each_layer(|layer| {
            if let Some(child) = layer.bounds() {
                bounds = Some(match bounds.take() {
                    Some(b) => b.union(&child),
                    None => child,
                });
            }
        });
        bounds
    }

    /// Binds the popup to every child, as a feature group does
    fn bind_popup(&mut self, popup: Popup) {
        self.children
            .for_each_layer_mut(|layer| layer.bind_popup(popup.clone()));
    }

    fn options(&self) -> serde_json::Value {
        let children: Vec<serde_json::Value> =
            self.children.layers().iter().map(|l| l.options()).collect();
        describe_with(&self.properties, serde_json::json!({ "layers": children }))
    }
}
