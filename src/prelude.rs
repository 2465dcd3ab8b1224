//! Prelude module for common geocad-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use geocad_map::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{LeafletConfig, MapOptions, MapStatus, PageIds},
    geo::{LatLng, LatLngBounds, Point},
    map::{Map, MapSnapshot},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    group::LayerGroup,
    manager::LayerManager,
    marker::Marker,
    tile::{TileLayer, TileLayerOptions},
    vector::{PathStyle, Polygon, Polyline},
};

pub use crate::data::geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, GeoJsonLayer};

pub use crate::input::events::{InputEvent, MapEvent, MouseButton, PageEvent};

pub use crate::ui::{
    controls::LayerControl,
    popup::{Popup, PopupOptions},
};

pub use crate::page::{PageHost, StaticPage};

pub use crate::swap::{ChannelSwap, PartialSwap, SwapMethod};

pub use crate::controller::RenderCycleController;

pub use crate::drawing::{Drawing, DrawingLayer, Entity, PayloadBuilder};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
