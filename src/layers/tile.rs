use crate::{
    core::constants::{OSM_ATTRIBUTION, OSM_MAX_ZOOM, OSM_URL_TEMPLATE, TILE_SIZE},
    layers::base::{describe_with, LayerProperties, LayerTrait, LayerType},
};

/// Configuration for a tile layer
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TileLayerOptions {
    /// URL template for tiles (e.g., "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")
    pub url_template: String,
    /// Available subdomains for load balancing
    pub subdomains: Vec<String>,
    /// Attribution HTML
    pub attribution: String,
    /// Tile size in pixels
    pub tile_size: u32,
    /// Maximum zoom level for this tile source
    pub max_zoom: u8,
    /// Minimum zoom level for this tile source
    pub min_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: OSM_URL_TEMPLATE.to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: OSM_ATTRIBUTION.to_string(),
            tile_size: TILE_SIZE,
            max_zoom: OSM_MAX_ZOOM,
            min_zoom: 0,
        }
    }
}

/// The base map: tiles are fetched and drawn by the host, this layer only
/// carries the source description and zoom range
pub struct TileLayer {
    properties: LayerProperties,
    options: TileLayerOptions,
}

impl TileLayer {
    /// Create a tile layer with custom options
    pub fn with_options(id: String, name: String, options: TileLayerOptions) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Tile),
            options,
        }
    }

    /// Create a tile layer for OpenStreetMap
    pub fn openstreetmap(id: String, name: String) -> Self {
        Self::with_options(id, name, TileLayerOptions::default())
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn max_zoom(&self) -> u8 {
        self.options.max_zoom
    }

    pub fn min_zoom(&self) -> u8 {
        self.options.min_zoom
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(properties);

    fn options(&self) -> serde_json::Value {
        describe_with(
            &self.properties,
            serde_json::json!({
                "url_template": self.options.url_template,
                "subdomains": self.options.subdomains,
                "tile_size": self.options.tile_size,
                "attribution": self.options.attribution,
                "max_zoom": self.options.max_zoom,
                "min_zoom": self.options.min_zoom,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openstreetmap_defaults() {
        let layer = TileLayer::openstreetmap("base".to_string(), "OpenStreetMap".to_string());
        assert_eq!(layer.max_zoom(), 19);
        assert!(layer.tile_options().attribution.contains("OpenStreetMap"));
        assert_eq!(layer.layer_type(), LayerType::Tile);
    }

    #[test]
    fn test_options_describe_tile_source() {
        let layer = TileLayer::openstreetmap("base".to_string(), "OpenStreetMap".to_string());
        let options = layer.options();
        assert_eq!(
            options["url_template"],
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
        );
        assert_eq!(options["subdomains"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(options["max_zoom"], 19);
    }
}
