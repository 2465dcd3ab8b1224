//! # geocad-map
//!
//! A Leaflet-style overlay model for geolocated DXF drawings.
//!
//! The crate reads the GeoJSON payloads a host page embeds (drawing
//! markers, per-layer line work, overlay names and view defaults), builds
//! them into togglable overlay groups on a [`Map`], fits the viewport, and
//! turns map clicks into coordinates written back into a form.
//!
//! The page itself sits behind [`page::PageHost`], so the same
//! [`RenderCycleController`] drives a real DOM (feature `wasm`) or an
//! in-memory [`page::StaticPage`].

pub mod controller;
pub mod core;
pub mod data;
pub mod drawing;
pub mod input;
pub mod layers;
pub mod page;
pub mod payload;
pub mod prelude;
pub mod swap;
pub mod ui;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{LeafletConfig, MapOptions, MapStatus, PageIds},
    geo::{LatLng, LatLngBounds, Point},
    map::Map,
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait, group::LayerGroup, manager::LayerManager, marker::Marker, tile::TileLayer,
    vector::{PathStyle, Polygon, Polyline},
};

pub use data::geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer};

pub use input::events::{InputEvent, MapEvent, PageEvent};

pub use ui::{controls::LayerControl, popup::Popup};

pub use page::{PageHost, StaticPage};

pub use swap::{PartialSwap, SwapMethod};

pub use controller::RenderCycleController;

/// Installs `env_logger`, defaulting to debug output for this crate
///
/// `RUST_LOG` still takes precedence. Calling it twice is harmless.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("geocad_map=debug");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Page element `{0}` not found")]
    MissingElement(String),

    #[error("Invalid JSON in `{element}`: {source}")]
    Payload {
        element: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Line feature references undeclared layer `{0}`")]
    MissingLayer(String),

    #[error("Feature {index} in `{element}` has no `{property}` property")]
    MissingProperty {
        element: String,
        index: usize,
        property: &'static str,
    },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Color error: {0}")]
    Color(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Swap error: {0}")]
    Swap(String),

    #[error("Page error: {0}")]
    Page(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
