//! The host page the render cycle reads payloads from and writes form
//! values into
//!
//! Element lookup is by id only. [`StaticPage`] keeps the elements in
//! memory (tests, the headless viewer); `DomPage` talks to a browser
//! document when the `wasm` feature is on.

#[cfg(feature = "wasm")]
pub mod dom;

#[cfg(feature = "wasm")]
pub use dom::DomPage;

use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the controller needs from a page
pub trait PageHost {
    /// Text content of the element `id`
    fn text_content(&self, id: &str) -> Result<String>;

    /// Attribute `name` of the element `id`, `None` if either is absent
    fn attribute(&self, id: &str, name: &str) -> Option<String>;

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()>;

    fn has_element(&self, id: &str) -> bool {
        self.text_content(id).is_ok()
    }
}

/// A single element of a [`StaticPage`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Markup swapped in by a partial fetch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl PageElement {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A fetched fragment waiting to be swapped into the element `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// CSS id selector, e.g. `#nav-card`
    pub target: String,
    pub body: String,
}

/// In-memory page, also the on-disk snapshot format of the viewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPage {
    #[serde(default)]
    elements: BTreeMap<String, PageElement>,
}

impl StaticPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(snapshot: &str) -> Result<Self> {
        serde_json::from_str(snapshot).map_err(|source| MapError::Payload {
            element: "page snapshot".to_string(),
            source,
        })
    }

    pub fn with_text(mut self, id: &str, text: impl Into<String>) -> Self {
        self.set_text(id, text);
        self
    }

    /// Embeds `value` as JSON text, the way a `json_script` tag does
    pub fn with_json<T: Serialize + ?Sized>(mut self, id: &str, value: &T) -> Result<Self> {
        self.set_json(id, value)?;
        Ok(self)
    }

    /// Adds an empty element, e.g. a form input
    pub fn with_element(mut self, id: &str) -> Self {
        self.elements.entry(id.to_string()).or_default();
        self
    }

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.elements.entry(id.to_string()).or_default().text = text.into();
    }

    pub fn set_json<T: Serialize + ?Sized>(&mut self, id: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.set_text(id, text);
        Ok(())
    }

    pub fn element(&self, id: &str) -> Option<&PageElement> {
        self.elements.get(id)
    }

    pub fn remove_element(&mut self, id: &str) -> Option<PageElement> {
        self.elements.remove(id)
    }

    /// Swaps a fetched fragment into its target element
    pub fn apply_fragment(&mut self, fragment: &Fragment) -> Result<()> {
        let id = fragment.target.trim_start_matches('#');
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()))?;
        element.html = Some(fragment.body.clone());
        log::debug!("swapped {} bytes into #{}", fragment.body.len(), id);
        Ok(())
    }
}

impl PageHost for StaticPage {
    fn text_content(&self, id: &str) -> Result<String> {
        self.elements
            .get(id)
            .map(|e| e.text.clone())
            .ok_or_else(|| MapError::MissingElement(id.to_string()))
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.elements
            .get(id)
            .and_then(|e| e.attributes.get(name))
            .cloned()
    }

    fn set_attribute(&mut self, id: &str, name: &str, value: &str) -> Result<()> {
        let element = self
            .elements
            .get_mut(id)
            .ok_or_else(|| MapError::MissingElement(id.to_string()))?;
        element
            .attributes
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }
}
