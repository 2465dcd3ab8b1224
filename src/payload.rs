//! Typed reading of the JSON blocks embedded in the page
//!
//! A render cycle reads every payload and checks every line feature before
//! anything on the map changes, so a bad payload fails the whole cycle.

use crate::{
    core::{
        config::{LeafletConfig, MapStatus, PageIds},
        constants::{DASHED_LINE_PATTERN, LINE_WEIGHT},
    },
    data::geojson::{FeatureCollection, GeoJsonFeature},
    layers::vector::PathStyle,
    page::PageHost,
    MapError, Result,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

/// Key of the feature property holding popup and style data
pub const POPUP_CONTENT: &str = "popupContent";

/// `properties.popupContent` of a feature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    /// Popup HTML
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Overlay a line feature belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    /// Truthy for a continuous line
    #[serde(default)]
    pub linetype: Value,
}

impl PopupContent {
    pub fn of(feature: &GeoJsonFeature) -> Option<Result<Self>> {
        feature
            .property(POPUP_CONTENT)
            .map(|value| Self::deserialize(value).map_err(MapError::from))
    }

    /// Stroke color as CSS text; non-string colors are passed on verbatim
    pub fn color_css(&self) -> Option<String> {
        match self.color.as_ref()? {
            Value::String(color) => Some(color.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    pub fn is_continuous(&self) -> bool {
        is_truthy(&self.linetype)
    }
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Weight 3 in the feature's color, dashed `10, 10` unless the linetype is
/// continuous
///
/// Without a color the line keeps the default path color.
pub fn line_style(color: Option<&str>, continuous: bool) -> PathStyle {
    let color = color.map_or_else(|| PathStyle::default().color, str::to_string);
    if continuous {
        PathStyle::solid(color, LINE_WEIGHT)
    } else {
        PathStyle::dashed(color, LINE_WEIGHT, DASHED_LINE_PATTERN)
    }
}

/// Popup HTML of a marker feature, if it carries one
pub fn marker_popup(feature: &GeoJsonFeature) -> Option<String> {
    feature
        .property(POPUP_CONTENT)?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

/// A line feature with its overlay and style resolved
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeature {
    pub layer: String,
    pub style: PathStyle,
    pub popup: Option<String>,
    pub feature: GeoJsonFeature,
}

impl LineFeature {
    fn resolve(element: &str, index: usize, feature: &GeoJsonFeature) -> Result<Self> {
        let missing = |property: &'static str| MapError::MissingProperty {
            element: element.to_string(),
            index,
            property,
        };

        let content = PopupContent::of(feature)
            .ok_or_else(|| missing(POPUP_CONTENT))?
            .map_err(|source| match source {
                MapError::Serialization(source) => MapError::Payload {
                    element: element.to_string(),
                    source,
                },
                other => other,
            })?;
        let layer = content.layer.clone().ok_or_else(|| missing("layer"))?;
        let color = content.color_css();

        Ok(Self {
            style: line_style(color.as_deref(), content.is_continuous()),
            layer,
            popup: content.content,
            feature: feature.clone(),
        })
    }
}

/// Everything one render cycle draws
#[derive(Debug, Clone, PartialEq)]
pub struct Payloads {
    /// Overlay names in declaration order
    pub layer_names: Vec<String>,
    pub markers: FeatureCollection,
    pub lines: Vec<LineFeature>,
    /// Absent when the page has no config block and there are markers to fit
    pub config: Option<LeafletConfig>,
}

impl Payloads {
    pub fn read(page: &impl PageHost, ids: &PageIds) -> Result<Self> {
        let layer_names: Option<Vec<String>> = read_json(page, &ids.layer_data)?;
        let layer_names = layer_names.unwrap_or_default();

        let markers: FeatureCollection = read_json(page, &ids.marker_data)?;

        let config = if markers.is_empty() || page.has_element(&ids.leaflet_config) {
            Some(read_json::<LeafletConfig>(page, &ids.leaflet_config)?)
        } else {
            None
        };

        let line_data: Option<FeatureCollection> = read_json(page, &ids.line_data)?;
        let lines = line_data
            .unwrap_or_default()
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| LineFeature::resolve(&ids.line_data, index, feature))
            .collect::<Result<Vec<_>>>()?;

        if let Some(line) = lines.iter().find(|l| !layer_names.contains(&l.layer)) {
            return Err(MapError::MissingLayer(line.layer.clone()));
        }

        log::debug!(
            "payloads: {} overlays, {} markers, {} lines",
            layer_names.len(),
            markers.len(),
            lines.len()
        );

        Ok(Self {
            layer_names,
            markers,
            lines,
            config,
        })
    }
}

/// Parses the JSON text of the element `id`
pub fn read_json<T: DeserializeOwned>(page: &impl PageHost, id: &str) -> Result<T> {
    let text = page.text_content(id)?;
    serde_json::from_str(&text).map_err(|source| MapError::Payload {
        element: id.to_string(),
        source,
    })
}

pub fn read_map_status(page: &impl PageHost, ids: &PageIds) -> Result<MapStatus> {
    read_json(page, &ids.map_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;
    use serde_json::json;

    fn line(popup_content: Value) -> Value {
        json!({
            "type": "Feature",
            "properties": {"popupContent": popup_content},
            "geometry": {"type": "LineString", "coordinates": [[12.0, 41.0], [12.1, 41.1]]}
        })
    }

    fn page(layers: Value, lines: Value) -> StaticPage {
        StaticPage::new()
            .with_json("layer_data", &layers)
            .and_then(|p| {
                p.with_json(
                    "marker_data",
                    &json!({"type": "FeatureCollection", "features": []}),
                )
            })
            .and_then(|p| p.with_json("line_data", &lines))
            .and_then(|p| {
                p.with_json(
                    "leaflet_config",
                    &json!({"DEFAULT_CENTER": [41.9, 12.5], "DEFAULT_ZOOM": 6}),
                )
            })
            .unwrap()
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("CONTINUOUS")));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_line_styles() {
        let solid = line_style(Some("red"), true);
        assert_eq!(solid.weight, 3.0);
        assert_eq!(solid.dash_array, None);

        let dashed = line_style(Some("red"), false);
        assert_eq!(dashed.color, "red");
        assert_eq!(dashed.dash_array.as_deref(), Some("10, 10"));

        let uncolored = line_style(None, false);
        assert_eq!(uncolored.color, PathStyle::default().color);
        assert!(uncolored.is_dashed());
    }

    #[test]
    fn test_line_without_color_keeps_default() {
        let page = page(
            json!(["Roads"]),
            json!({"type": "FeatureCollection", "features": [
                line(json!({"layer": "Roads", "linetype": true, "content": "x"})),
                line(json!({"layer": "Roads", "color": null, "linetype": false}))
            ]}),
        );
        let payloads = Payloads::read(&page, &PageIds::default()).unwrap();

        assert_eq!(payloads.lines[0].style, PathStyle::solid("#3388ff", 3.0));
        assert_eq!(
            payloads.lines[1].style,
            PathStyle::dashed("#3388ff", 3.0, "10, 10")
        );
    }

    #[test]
    fn test_null_payloads_are_empty() {
        let page = page(json!(null), json!(null));
        let payloads = Payloads::read(&page, &PageIds::default()).unwrap();
        assert!(payloads.layer_names.is_empty());
        assert!(payloads.lines.is_empty());
        assert_eq!(payloads.config.unwrap().default_zoom, 6.0);
    }

    #[test]
    fn test_resolves_line_features() {
        let page = page(
            json!(["Roads"]),
            json!({"type": "FeatureCollection", "features": [
                line(json!({"layer": "Roads", "color": "red", "linetype": false, "content": "<p>Roads</p>"}))
            ]}),
        );
        let payloads = Payloads::read(&page, &PageIds::default()).unwrap();

        let line = &payloads.lines[0];
        assert_eq!(line.layer, "Roads");
        assert_eq!(line.style, PathStyle::dashed("red", 3.0, "10, 10"));
        assert_eq!(line.popup.as_deref(), Some("<p>Roads</p>"));
    }

    #[test]
    fn test_undeclared_layer() {
        let page = page(
            json!(["Roads"]),
            json!({"type": "FeatureCollection", "features": [
                line(json!({"layer": "Rivers", "color": "blue", "linetype": true}))
            ]}),
        );
        assert!(matches!(
            Payloads::read(&page, &PageIds::default()),
            Err(MapError::MissingLayer(name)) if name == "Rivers"
        ));
    }

    #[test]
    fn test_missing_line_properties() {
        let page = page(
            json!(["Roads"]),
            json!({"type": "FeatureCollection", "features": [
                line(json!({"layer": "Roads", "color": "red"})),
                line(json!({"color": "red", "linetype": true}))
            ]}),
        );
        match Payloads::read(&page, &PageIds::default()) {
            Err(MapError::MissingProperty {
                element,
                index,
                property,
            }) => {
                assert_eq!(element, "line_data");
                assert_eq!(index, 1);
                assert_eq!(property, "layer");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let mut page = page(json!(["Roads"]), json!(null));
        page.set_text("marker_data", "{not json");
        assert!(matches!(
            Payloads::read(&page, &PageIds::default()),
            Err(MapError::Payload { element, .. }) if element == "marker_data"
        ));
    }

    #[test]
    fn test_marker_popup() {
        let feature: GeoJsonFeature = serde_json::from_value(json!({
            "type": "Feature",
            "properties": {"popupContent": {"content": "<b>Site</b>"}},
            "geometry": {"type": "Point", "coordinates": [12.5, 41.9]}
        }))
        .unwrap();
        assert_eq!(marker_popup(&feature).as_deref(), Some("<b>Site</b>"));

        let bare: GeoJsonFeature = serde_json::from_value(json!({
            "type": "Feature",
            "properties": null,
            "geometry": {"type": "Point", "coordinates": [12.5, 41.9]}
        }))
        .unwrap();
        assert_eq!(marker_popup(&bare), None);
    }
}
