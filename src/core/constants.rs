//! Fixed numbers of the render cycle, mostly Leaflet defaults and the
//! values the drawing list page has always used.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Snap zoom levels to these quanta (1 → integer zooms).
pub const DEFAULT_ZOOM_SNAP: f64 = 1.0;

/// Highest zoom the OpenStreetMap tile server renders.
pub const OSM_MAX_ZOOM: u8 = 19;

/// OpenStreetMap tile endpoint.
pub const OSM_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Attribution shown for the OpenStreetMap base layer.
pub const OSM_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Padding in pixels kept around the drawing markers when fitting the view.
pub const FIT_BOUNDS_PADDING: f64 = 30.0;

/// Minimum popup width in pixels for feature popups.
pub const POPUP_MIN_WIDTH: u32 = 256;

/// Leaflet's default maximum popup width.
pub const POPUP_MAX_WIDTH: u32 = 300;

/// Stroke weight of drawing line work.
pub const LINE_WEIGHT: f64 = 3.0;

/// Dash pattern for layers without a continuous linetype.
pub const DASHED_LINE_PATTERN: &str = "10, 10";

/// Custom page event that triggers a new render cycle.
pub const REFRESH_EVENT: &str = "refreshCollections";

/// Fallback viewport size when the host does not report one.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (800.0, 600.0);
