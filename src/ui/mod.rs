pub mod controls;
pub mod popup;

pub use controls::{ControlEntry, LayerControl};
pub use popup::{Popup, PopupOptions};
