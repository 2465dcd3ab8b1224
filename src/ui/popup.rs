use serde::{Deserialize, Serialize};

use crate::core::constants::POPUP_MAX_WIDTH;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    /// Minimum width in pixels
    pub min_width: u32,
    /// Maximum width in pixels
    pub max_width: u32,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            min_width: 50,
            max_width: POPUP_MAX_WIDTH,
        }
    }
}

impl PopupOptions {
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = min_width;
        self.max_width = self.max_width.max(min_width);
        self
    }
}

/// HTML content shown when a feature is clicked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub content: String,
    pub options: PopupOptions,
}

impl Popup {
    pub fn new(content: String) -> Self {
        Self {
            content,
            options: PopupOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PopupOptions) -> Self {
        self.options = options;
        self
    }

    pub fn min_width(&self) -> u32 {
        self.options.min_width
    }

    pub fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "content": self.content,
            "minWidth": self.options.min_width,
            "maxWidth": self.options.max_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_width_raises_max() {
        let options = PopupOptions::default().with_min_width(256);
        assert_eq!(options.min_width, 256);
        assert_eq!(options.max_width, 300);

        let wide = PopupOptions::default().with_min_width(400);
        assert_eq!(wide.max_width, 400);
    }

    #[test]
    fn test_popup_options_json() {
        let popup = Popup::new("<p>Drawing</p>".to_string())
            .with_options(PopupOptions::default().with_min_width(256));
        let value = popup.options();
        assert_eq!(value["content"], "<p>Drawing</p>");
        assert_eq!(value["minWidth"], 256);
    }
}
