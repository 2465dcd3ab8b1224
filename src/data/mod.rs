//! GeoJSON payloads and their conversion into map layers

pub mod conversion;
pub mod geojson;

pub use geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer};
