use crate::{core::geo::LatLngBounds, ui::popup::Popup};
use std::any::Any;

/// Anything that can be attached to a [`Map`](crate::core::map::Map) or
/// nested inside a [`LayerGroup`](crate::layers::group::LayerGroup)
pub trait LayerTrait: Any {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Attach a popup; layers without a clickable shape ignore it
    fn bind_popup(&mut self, _popup: Popup) {}

    /// The bound popup, if any
    fn popup(&self) -> Option<&Popup> {
        None
    }

    /// Serializable description of the layer, used for snapshots
    fn options(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Group,
    GeoJson,
    Marker,
    Vector,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Group => write!(f, "group"),
            LayerType::GeoJson => write!(f, "geojson"),
            LayerType::Marker => write!(f, "marker"),
            LayerType::Vector => write!(f, "vector"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            visible: true,
        }
    }

    /// Common fields every layer puts in its `options()` object
    pub fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "layer_type": self.layer_type.to_string(),
            "visible": self.visible,
        })
    }
}

/// Merges `extra` into the common description of a layer
pub(crate) fn describe_with(
    properties: &LayerProperties,
    extra: serde_json::Value,
) -> serde_json::Value {
    let mut value = properties.describe();
    if let (Some(target), serde_json::Value::Object(source)) = (value.as_object_mut(), extra) {
        target.extend(source);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_properties() {
        let props = LayerProperties::new(
            "overlay:Roads".to_string(),
            "Roads".to_string(),
            LayerType::Group,
        );

        assert_eq!(props.id, "overlay:Roads");
        assert_eq!(props.name, "Roads");
        assert_eq!(props.layer_type, LayerType::Group);
        assert!(props.visible);
    }

    #[test]
    fn test_describe_with_merges_fields() {
        let props = LayerProperties::new("m".to_string(), "Marker".to_string(), LayerType::Marker);
        let value = describe_with(&props, serde_json::json!({"lat": 42.0}));

        assert_eq!(value["id"], "m");
        assert_eq!(value["layer_type"], "marker");
        assert_eq!(value["lat"], 42.0);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Tile.to_string(), "tile");
        assert_eq!(LayerType::Group.to_string(), "group");
        assert_eq!(LayerType::Vector.to_string(), "vector");
    }
}
