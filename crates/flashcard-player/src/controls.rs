#![forbid(unsafe_code)]

//! Player control buttons and their placement around the image.
//!
//! Captions are derived from the quiz state each time [`controls`] is
//! called, never cached, so they cannot drift from what the boxes show.
//!
//! [`controls`]: crate::QuizPlayer::controls

use flashcard_core::{ControlsPosition, GroupId, QuizSettings};

pub const SHOW_QUIZ: &str = "Show Image Quiz";
pub const HIDE_QUIZ: &str = "Hide Quiz";
pub const RESET: &str = "Reset";
pub const SHOW_ALL: &str = "Show All";
pub const HIDE_ALL: &str = "Hide All";

/// What a control does when activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Show or hide the whole quiz.
    Visibility,
    Reset,
    ToggleAll,
    Group(GroupId),
}

/// Visual role of a control, for the host's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlStyle {
    Show,
    Hide,
    Secondary,
    Primary,
    Group,
}

/// One button in the player's control strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub kind: ControlKind,
    pub caption: String,
    pub style: ControlStyle,
    pub visible: bool,
    /// Accent colour; set for group buttons only.
    pub color: Option<String>,
}

impl Control {
    pub(crate) fn new(kind: ControlKind, caption: impl Into<String>, style: ControlStyle) -> Self {
        Self {
            kind,
            caption: caption.into(),
            style,
            visible: true,
            color: None,
        }
    }

    #[must_use]
    pub(crate) fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub(crate) fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

#[must_use]
pub fn visibility_caption(quiz_visible: bool) -> &'static str {
    if quiz_visible { HIDE_QUIZ } else { SHOW_QUIZ }
}

#[must_use]
pub fn toggle_all_caption(any_in_label: bool) -> &'static str {
    if any_in_label { SHOW_ALL } else { HIDE_ALL }
}

#[must_use]
pub fn group_caption(name: &str, any_in_label: bool) -> String {
    if any_in_label {
        format!("Show {name}")
    } else {
        format!("Hide {name}")
    }
}

/// Where the host should lay out the controls relative to the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlsPlacement {
    pub position: ControlsPosition,
    /// Horizontal translation in pixels.
    pub offset_x: f64,
    /// Vertical translation in pixels.
    pub offset_y: f64,
}

impl ControlsPlacement {
    #[must_use]
    pub fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            position: settings.controls_position,
            offset_x: settings.controls_offset_x,
            offset_y: settings.controls_offset_y,
        }
    }

    /// Controls come before the image in document order (top, left).
    #[must_use]
    pub fn precedes_image(&self) -> bool {
        self.position.precedes_image()
    }

    /// Controls stack in a column beside the image (left, right).
    #[must_use]
    pub fn is_column(&self) -> bool {
        self.position.is_vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions_follow_state() {
        assert_eq!(visibility_caption(false), "Show Image Quiz");
        assert_eq!(visibility_caption(true), "Hide Quiz");
        assert_eq!(toggle_all_caption(true), "Show All");
        assert_eq!(toggle_all_caption(false), "Hide All");
        assert_eq!(group_caption("Capitals", true), "Show Capitals");
        assert_eq!(group_caption("Capitals", false), "Hide Capitals");
    }

    #[test]
    fn placement_reads_settings() {
        let settings = QuizSettings {
            controls_position: ControlsPosition::Left,
            controls_offset_x: 12.0,
            controls_offset_y: -4.0,
            ..QuizSettings::default()
        };
        let placement = ControlsPlacement::from_settings(&settings);
        assert_eq!(placement.offset_x, 12.0);
        assert_eq!(placement.offset_y, -4.0);
        assert!(placement.precedes_image());
        assert!(placement.is_column());

        let bottom = ControlsPlacement::from_settings(&QuizSettings {
            controls_position: ControlsPosition::Bottom,
            ..QuizSettings::default()
        });
        assert!(!bottom.precedes_image());
        assert!(!bottom.is_column());
    }
}
