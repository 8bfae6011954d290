use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HighlightError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Element id of the rendered text container.
    pub root_element_id: String,
    /// Prefix of the identifiers written onto scanned elements.
    pub id_prefix: String,
    /// Seconds by which a node becomes active before its first word starts.
    pub leeway_secs: f64,
    pub style: HighlightStyle,
    pub layout: LayoutMetrics,
}

impl HighlightConfig {
    pub const DEFAULT_ROOT_ELEMENT_ID: &'static str = "markdown-content";
    pub const DEFAULT_ID_PREFIX: &'static str = "text-node-";
    pub const DEFAULT_LEEWAY_SECS: f64 = 0.05;

    pub fn load(path: &Path) -> Result<Self, HighlightError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| HighlightError::io("read highlight config", path, e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| HighlightError::json("highlight config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HighlightError> {
        if !self.leeway_secs.is_finite() || self.leeway_secs < 0.0 {
            return Err(HighlightError::config(format!(
                "leeway_secs must be a non-negative number, got {}",
                self.leeway_secs
            )));
        }
        if self.id_prefix.is_empty() {
            return Err(HighlightError::config("id_prefix must not be empty"));
        }
        if self.layout.char_width <= 0.0 || self.layout.line_height <= 0.0 {
            return Err(HighlightError::config(
                "layout char_width and line_height must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            root_element_id: Self::DEFAULT_ROOT_ELEMENT_ID.to_string(),
            id_prefix: Self::DEFAULT_ID_PREFIX.to_string(),
            leeway_secs: Self::DEFAULT_LEEWAY_SECS,
            style: HighlightStyle::default(),
            layout: LayoutMetrics::default(),
        }
    }
}

/// Inline style applied to the element being spoken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    pub background: String,
    pub padding: String,
    pub border_radius: String,
    pub box_shadow: String,
}

impl HighlightStyle {
    pub const PROPERTY_NAMES: [&'static str; 4] =
        ["background", "padding", "border-radius", "box-shadow"];

    pub fn properties(&self) -> [(&'static str, &str); 4] {
        [
            ("background", self.background.as_str()),
            ("padding", self.padding.as_str()),
            ("border-radius", self.border_radius.as_str()),
            ("box-shadow", self.box_shadow.as_str()),
        ]
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            background: "rgba(255, 214, 10, 0.35)".to_string(),
            padding: "2px 4px".to_string(),
            border_radius: "4px".to_string(),
            box_shadow: "0 0 0 1px rgba(255, 214, 10, 0.6)".to_string(),
        }
    }
}

/// Fixed metrics for the simple block layout of rendered Markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub width: f64,
    pub line_height: f64,
    pub char_width: f64,
    pub block_spacing: f64,
    pub indent: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            width: 640.0,
            line_height: 20.0,
            char_width: 8.0,
            block_spacing: 12.0,
            indent: 24.0,
        }
    }
}
