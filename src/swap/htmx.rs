use crate::{
    page::dom::js_error,
    swap::{PartialSwap, SwapMethod},
    Result,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = htmx, js_name = ajax, catch)]
    fn htmx_ajax(verb: &str, path: &str, target: &str) -> std::result::Result<JsValue, JsValue>;
}

/// Delegates the swap to the page's htmx
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmxSwap;

impl PartialSwap for HtmxSwap {
    fn ajax(&self, method: SwapMethod, path: &str, target: &str) -> Result<()> {
        // htmx.ajax returns a promise; the swap is not awaited
        htmx_ajax(method.as_str(), path, target).map_err(js_error)?;
        Ok(())
    }
}
