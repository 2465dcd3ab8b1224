use crate::{page::PageHost, MapError, Result};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// A live browser document
pub struct DomPage {
    document: Document,
}

impl DomPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window
    pub fn current() -> Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| MapError::Page("no window document".to_string()))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &str) -> Result<Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()))
    }
}

pub(crate) fn js_error(e: JsValue) -> MapError {
    MapError::Page(format!("{:?}", e))
}

impl From<MapError> for JsValue {
    fn from(e: MapError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

impl PageHost for DomPage {
    fn text_content(&self, id: &str) -> Result<String> {
        Ok(self.element(id)?.text_content().unwrap_or_default())
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)
            .and_then(|element| element.get_attribute(name))
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()> {
        self.element(id)?
            .set_attribute(name, value)
            .map_err(js_error)
    }

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }
}
