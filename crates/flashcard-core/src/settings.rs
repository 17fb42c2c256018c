#![forbid(unsafe_code)]

//! Quiz-wide settings persisted next to the boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the player places its control buttons relative to the image.
///
/// Unknown values read from a configuration fall back to [`Bottom`], the
/// layout a player uses when it does not recognise the position.
///
/// [`Bottom`]: ControlsPosition::Bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ControlsPosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

impl ControlsPosition {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse a persisted value; anything unrecognised is `Bottom`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "top" => Self::Top,
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Bottom,
        }
    }

    /// Controls placed before the image in reading order.
    #[must_use]
    pub fn precedes_image(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Controls stacked in a column beside the image.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl From<String> for ControlsPosition {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ControlsPosition> for String {
    fn from(value: ControlsPosition) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ControlsPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel size the image was displayed at while boxes were authored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: f64,
    pub height: f64,
}

/// Settings that travel with an exported quiz.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuizSettings {
    /// File name of the quiz image; empty when no image is attached.
    pub image: String,
    pub image_display_dimensions: Option<ImageDimensions>,
    pub controls_position: ControlsPosition,
    /// Horizontal offset of the controls, in pixels.
    pub controls_offset_x: f64,
    /// Vertical offset of the controls, in pixels.
    pub controls_offset_y: f64,
}
