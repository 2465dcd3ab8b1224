#[macro_use]
pub mod macros;

pub mod base;
pub mod group;
pub mod manager;
pub mod marker;
pub mod tile;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use group::LayerGroup;
pub use manager::LayerManager;
pub use marker::Marker;
pub use tile::{TileLayer, TileLayerOptions};
pub use vector::{PathStyle, Polygon, Polyline};
