use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{describe_with, LayerProperties, LayerTrait, LayerType},
    ui::popup::Popup,
};

pub struct Marker {
    properties: LayerProperties,
    position: LatLng,
    popup: Option<Popup>,
}

impl Marker {
    pub fn new(id: String, position: LatLng) -> Self {
        let properties = LayerProperties::new(id, "Marker".to_string(), LayerType::Marker);
        Self {
            properties,
            position,
            popup: None,
        }
    }

    pub fn with_popup(mut self, popup: Popup) -> Self {
        self.popup = Some(popup);
        self
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn set_position(&mut self, position: LatLng) {
        self.position = position;
    }
}

impl LayerTrait for Marker {
    crate::impl_layer_trait!(properties);
    crate::impl_popup_binding!(popup);

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::new(self.position, self.position))
    }

    fn options(&self) -> serde_json::Value {
        describe_with(
            &self.properties,
            serde_json::json!({
                "position": {
                    "lat": self.position.lat,
                    "lng": self.position.lng
                },
                "popup": self.popup.as_ref().map(Popup::options),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_options() {
        let marker = Marker::new("m".to_string(), LatLng::new(42.0, 12.0))
            .with_popup(Popup::new("Drawing 1".to_string()));

        let options = marker.options();
        assert_eq!(options["position"]["lat"], 42.0);
        assert_eq!(options["popup"]["content"], "Drawing 1");
        assert_eq!(marker.bounds().unwrap().center(), LatLng::new(42.0, 12.0));
    }
}
