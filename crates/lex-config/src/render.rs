//! Final document rendering options.

use serde::{Deserialize, Serialize};

fn default_css_class() -> String {
    "legal_ref".to_string()
}

/// Citation bodies nest under a `##` reference heading.
const fn default_demote_levels() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    /// CSS class of the container wrapping each citation. Empty disables the
    /// container and separates citations with a rule instead.
    #[serde(default = "default_css_class")]
    pub css_class: String,

    /// Levels added to every heading inside a citation body.
    #[serde(default = "default_demote_levels")]
    pub demote_levels: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            css_class: default_css_class(),
            demote_levels: default_demote_levels(),
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn css_class(&self) -> Option<&str> {
        (!self.css_class.is_empty()).then_some(self.css_class.as_str())
    }
}
