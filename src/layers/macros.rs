//! Macros to reduce boilerplate in layer implementations

/// Implements the `LayerTrait` accessors backed by a `LayerProperties` field
///
/// This generates implementations for:
/// - id(), name(), layer_type()
/// - is_visible(), set_visible()
/// - as_any(), as_any_mut()
///
/// Usage:
/// ```ignore
/// impl LayerTrait for MyLayer {
///     impl_layer_trait!(properties);
///     fn options(&self) -> serde_json::Value { self.properties.describe() }
/// }
/// ```
#[macro_export]
macro_rules! impl_layer_trait {
    ($properties_field:ident) => {
        fn id(&self) -> &str {
            &self.$properties_field.id
        }

        fn name(&self) -> &str {
            &self.$properties_field.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$properties_field.layer_type
        }

        fn is_visible(&self) -> bool {
            self.$properties_field.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$properties_field.visible = visible;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

/// Implements popup binding for layers that keep an `Option<Popup>` field
#[macro_export]
macro_rules! impl_popup_binding {
    ($popup_field:ident) => {
        fn bind_popup(&mut self, popup: $crate::ui::popup::Popup) {
            self.$popup_field = Some(popup);
        }

        fn popup(&self) -> Option<&$crate::ui::popup::Popup> {
            self.$popup_field.as_ref()
        }
    };
}
