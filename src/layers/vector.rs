use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::base::{describe_with, LayerProperties, LayerTrait, LayerType},
    ui::popup::Popup,
};
use serde::{Deserialize, Serialize};

/// Stroke and fill options of a vector path, mirroring Leaflet's `Path` options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    /// CSS color of the stroke
    pub color: String,
    /// Stroke width in pixels
    pub weight: f64,
    /// Stroke opacity (0.0 to 1.0)
    pub opacity: f64,
    /// SVG dash array, `None` for a continuous line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    pub fill: bool,
    /// Defaults to the stroke color when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    pub fill_opacity: f64,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: "#3388ff".to_string(),
            weight: 3.0,
            opacity: 1.0,
            dash_array: None,
            fill: false,
            fill_color: None,
            fill_opacity: 0.2,
        }
    }
}

impl PathStyle {
    /// Continuous stroke of the given color and weight
    pub fn solid(color: impl Into<String>, weight: f64) -> Self {
        Self {
            color: color.into(),
            weight,
            ..Self::default()
        }
    }

    /// Same stroke, dashed with `dash_array`
    pub fn dashed(color: impl Into<String>, weight: f64, dash_array: impl Into<String>) -> Self {
        Self {
            dash_array: Some(dash_array.into()),
            ..Self::solid(color, weight)
        }
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash_pattern().is_empty()
    }

    /// Dash lengths parsed from the dash array (`"10, 10"` → `[10.0, 10.0]`)
    pub fn dash_pattern(&self) -> Vec<f64> {
        self.dash_array
            .as_deref()
            .map(|dashes| {
                dashes
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter_map(|part| part.trim().parse::<f64>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The same style with polygon fill switched on
    pub fn filled(mut self) -> Self {
        self.fill = true;
        self
    }
}

/// One or more connected line strings drawn with a single style
pub struct Polyline {
    properties: LayerProperties,
    lines: Vec<Vec<LatLng>>,
    style: PathStyle,
    popup: Option<Popup>,
}

impl Polyline {
    pub fn new(id: String, points: Vec<LatLng>) -> Self {
        Self::multi(id, vec![points])
    }

    pub fn multi(id: String, lines: Vec<Vec<LatLng>>) -> Self {
        Self {
            properties: LayerProperties::new(id, "Polyline".to_string(), LayerType::Vector),
            lines,
            style: PathStyle::default(),
            popup: None,
        }
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: PathStyle) {
        self.style = style;
    }

    pub fn lines(&self) -> &[Vec<LatLng>] {
        &self.lines
    }
}

impl LayerTrait for Polyline {
    crate::impl_layer_trait!(properties);
    crate::impl_popup_binding!(popup);

    fn bounds(&self) -> Option<LatLngBounds> {
        let points: Vec<LatLng> = self.lines.iter().flatten().copied().collect();
        LatLngBounds::from_points(&points)
    }

    fn options(&self) -> serde_json::Value {
        describe_with(
            &self.properties,
            serde_json::json!({
                "lines": lines_json(&self.lines),
                "style": self.style,
                "popup": self.popup.as_ref().map(Popup::options),
            }),
        )
    }
}

/// A polygon: the first ring is the outline, the others are holes
pub struct Polygon {
    properties: LayerProperties,
    rings: Vec<Vec<LatLng>>,
    style: PathStyle,
    popup: Option<Popup>,
}

impl Polygon {
    pub fn new(id: String, rings: Vec<Vec<LatLng>>) -> Self {
        Self {
            properties: LayerProperties::new(id, "Polygon".to_string(), LayerType::Vector),
            rings,
            style: PathStyle::default().filled(),
            popup: None,
        }
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> &PathStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: PathStyle) {
        self.style = style;
    }

    pub fn rings(&self) -> &[Vec<LatLng>] {
        &self.rings
    }
}

impl LayerTrait for Polygon {
    crate::impl_layer_trait!(properties);
    crate::impl_popup_binding!(popup);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.rings
            .first()
            .and_then(|outline| LatLngBounds::from_points(outline))
    }

    fn options(&self) -> serde_json::Value {
        describe_with(
            &self.properties,
            serde_json::json!({
                "rings": lines_json(&self.rings),
                "style": self.style,
                "popup": self.popup.as_ref().map(Popup::options),
            }),
        )
    }
}

fn lines_json(lines: &[Vec<LatLng>]) -> serde_json::Value {
    lines
        .iter()
        .map(|line| line.iter().map(|p| vec![p.lat, p.lng]).collect::<Vec<_>>())
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_pattern() {
        let dashed = PathStyle::dashed("red", 3.0, "10, 10");
        assert!(dashed.is_dashed());
        assert_eq!(dashed.dash_pattern(), vec![10.0, 10.0]);
        assert_eq!(dashed.color, "red");
        assert_eq!(dashed.weight, 3.0);

        let solid = PathStyle::solid("#00ff00", 3.0);
        assert!(!solid.is_dashed());
        assert!(solid.dash_pattern().is_empty());
    }

    #[test]
    fn test_style_serializes_like_leaflet() {
        let value = serde_json::to_value(PathStyle::dashed("red", 3.0, "10, 10")).unwrap();
        assert_eq!(value["dashArray"], "10, 10");
        assert_eq!(value["color"], "red");
        assert!(value.get("fillColor").is_none());
    }

    #[test]
    fn test_polyline_bounds() {
        let line = Polyline::multi(
            "l".to_string(),
            vec![
                vec![LatLng::new(42.0, 12.0), LatLng::new(42.1, 12.1)],
                vec![LatLng::new(41.9, 12.3)],
            ],
        );
        let bounds = line.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(41.9, 12.0));
        assert_eq!(bounds.north_east, LatLng::new(42.1, 12.3));
    }

    #[test]
    fn test_polygon_is_filled() {
        let polygon = Polygon::new(
            "p".to_string(),
            vec![vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(1.0, 1.0),
                LatLng::new(0.0, 0.0),
            ]],
        );
        assert!(polygon.style().fill);
        assert_eq!(polygon.bounds().unwrap().north_east, LatLng::new(1.0, 1.0));
    }
}
