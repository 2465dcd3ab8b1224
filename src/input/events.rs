use crate::core::{
    constants::REFRESH_EVENT,
    geo::{LatLng, Point},
};
use serde::{Deserialize, Serialize};

/// Raw pointer input in container pixels, as a host reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Single click/tap
    Click {
        position: Point,
        button: MouseButton,
    },
    /// Viewport/window resize
    Resize { size: Point },
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. } => Some(*position),
            InputEvent::Resize { .. } => None,
        }
    }
}

/// Events emitted by the map once input has been resolved to coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Primary click on the map; `pixel` is absent when the host only
    /// reported a coordinate
    Click {
        lat_lng: LatLng,
        pixel: Option<Point>,
    },
}

impl MapEvent {
    /// A click the host already resolved to a coordinate
    pub fn click(lat_lng: LatLng) -> Self {
        MapEvent::Click {
            lat_lng,
            pixel: None,
        }
    }
}

/// Events dispatched on the page itself rather than on the map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// `refreshCollections`: payloads changed, run a new render cycle
    RefreshCollections,
    Custom(String),
}

impl PageEvent {
    pub fn from_name(name: &str) -> Self {
        if name == REFRESH_EVENT {
            PageEvent::RefreshCollections
        } else {
            PageEvent::Custom(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PageEvent::RefreshCollections => REFRESH_EVENT,
            PageEvent::Custom(name) => name,
        }
    }
}
