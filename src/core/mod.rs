pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod viewport;

pub use self::config::{LeafletConfig, MapOptions, MapStatus, PageIds};
pub use self::geo::{LatLng, LatLngBounds, Point};
pub use self::map::Map;
pub use self::viewport::Viewport;
