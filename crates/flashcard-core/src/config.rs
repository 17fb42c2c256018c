#![forbid(unsafe_code)]

//! Authoring defaults.

use crate::geometry::Size;

/// Defaults applied when boxes are created or drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    /// Size of a box created from a single click (default: 12 x 8 percent).
    pub default_box_size: Size,
    /// Prefix of generated labels; the N-th box is labelled `"{prefix} N"`.
    pub label_prefix: String,
    /// Border colour for boxes without a known group (default: `#64748b`).
    pub fallback_color: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            default_box_size: Size::new(12.0, 8.0),
            label_prefix: "Box".to_string(),
            fallback_color: "#64748b".to_string(),
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn with_default_box_size(mut self, size: Size) -> Self {
        self.default_box_size = size;
        self
    }

    #[must_use]
    pub fn with_label_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.label_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_fallback_color(mut self, color: impl Into<String>) -> Self {
        self.fallback_color = color.into();
        self
    }

    /// Generated label for a box created when `existing` boxes already exist.
    #[must_use]
    pub fn default_label(&self, existing: usize) -> String {
        format!("{} {}", self.label_prefix, existing + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = QuizConfig::default();
        assert_eq!(config.default_box_size, Size::new(12.0, 8.0));
        assert_eq!(config.default_label(0), "Box 1");
        assert_eq!(config.fallback_color, "#64748b");
    }

    #[test]
    fn builders_override_fields() {
        let config = QuizConfig::default()
            .with_default_box_size(Size::new(5.0, 3.0))
            .with_label_prefix("Region")
            .with_fallback_color("#000000");
        assert_eq!(config.default_box_size, Size::new(5.0, 3.0));
        assert_eq!(config.default_label(2), "Region 3");
        assert_eq!(config.fallback_color, "#000000");
    }
}
