//! Browser entry point: a controller bound to the live document
//!
//! The host page loads the module, creates a [`WasmController`] once the
//! payload blocks are in the DOM and forwards Leaflet clicks to
//! [`WasmController::click`]. `refreshCollections` events on the window are
//! picked up automatically.

use crate::{
    controller::RenderCycleController,
    core::{config::MapOptions, constants::REFRESH_EVENT, geo::LatLng},
    page::DomPage,
    swap::{HtmxSwap, PartialSwap, SwapMethod},
    MapError, PageIds,
};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// `openDrawing(path)` for popup links
#[wasm_bindgen(js_name = openDrawing)]
pub fn open_drawing(path: &str) -> Result<(), JsValue> {
    HtmxSwap.ajax(SwapMethod::Get, path, &PageIds::default().swap_target)?;
    Ok(())
}

type Shared = Rc<RefCell<RenderCycleController<DomPage>>>;

#[wasm_bindgen]
pub struct WasmController {
    inner: Shared,
    _refresh_listener: Closure<dyn FnMut(web_sys::Event)>,
}

#[wasm_bindgen]
impl WasmController {
    /// Runs the first render cycle and starts listening for refreshes
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<WasmController, JsValue> {
        let page = DomPage::current()?;
        let options = MapOptions::default().with_size(width, height);
        let controller = RenderCycleController::load(page, options)?.with_swap(HtmxSwap);
        let inner: Shared = Rc::new(RefCell::new(controller));

        let listener_target = Rc::clone(&inner);
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            if let Err(e) = listener_target.borrow_mut().refresh() {
                web_sys::console::warn_1(&JsValue::from(e));
            }
        });
        web_sys::window()
            .ok_or_else(|| MapError::Page("no window".to_string()))?
            .add_event_listener_with_callback(REFRESH_EVENT, listener.as_ref().unchecked_ref())?;

        Ok(WasmController {
            inner,
            _refresh_listener: listener,
        })
    }

    pub fn refresh(&self) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().refresh()?)
    }

    /// Leaflet `click` handler body; returns whether a point was registered
    pub fn click(&self, lat: f64, lng: f64) -> Result<bool, JsValue> {
        Ok(self.inner.borrow_mut().handle_click(LatLng::new(lat, lng))?)
    }

    #[wasm_bindgen(js_name = openDrawing)]
    pub fn open_drawing(&self, path: &str) -> Result<(), JsValue> {
        Ok(self.inner.borrow().open_drawing(path)?)
    }

    #[wasm_bindgen(js_name = toggleOverlay)]
    pub fn toggle_overlay(&self, name: &str, visible: bool) -> Result<(), JsValue> {
        Ok(self.inner.borrow_mut().toggle_overlay(name, visible)?)
    }

    /// JSON description of the overlays, markers and view for the host to draw
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let snapshot = self.inner.borrow().snapshot();
        Ok(serde_json::to_string(&snapshot).map_err(MapError::from)?)
    }
}
