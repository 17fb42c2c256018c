#![forbid(unsafe_code)]

use flashcard_core::{BoxId, GroupId, PresentationAdapter, Quiz};

use crate::controls::{self, Control, ControlKind, ControlStyle, ControlsPlacement, RESET};
use crate::error::{PlayerError, Result};

/// Read-only replay of an exported quiz for quiz-takers.
///
/// The quiz starts hidden: only the visibility button is shown and box
/// clicks are ignored until the taker reveals it. Boxes, groups and links
/// are never edited.
#[derive(Debug, Clone)]
pub struct QuizPlayer {
    quiz: Quiz,
    visible: bool,
}

impl QuizPlayer {
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            visible: false,
        }
    }

    /// # Errors
    ///
    /// [`PlayerError::Quiz`] wrapping `MalformedConfig` for invalid input.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(Quiz::from_json(json)?))
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the quiz; returns the visibility button's new caption.
    ///
    /// Box states survive hiding.
    pub fn toggle_quiz_visibility(&mut self) -> &'static str {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "quiz visibility toggled");
        controls::visibility_caption(self.visible)
    }

    /// Controls in display order: visibility, reset, toggle-all, then one
    /// button per group that has at least one box.
    #[must_use]
    pub fn controls(&self) -> Vec<Control> {
        let registry = self.quiz.registry();
        let shown = self.visible;

        let mut out = vec![
            Control::new(
                ControlKind::Visibility,
                controls::visibility_caption(shown),
                if shown {
                    ControlStyle::Hide
                } else {
                    ControlStyle::Show
                },
            ),
            Control::new(ControlKind::Reset, RESET, ControlStyle::Secondary).with_visible(shown),
            Control::new(
                ControlKind::ToggleAll,
                self.toggle_all_caption(),
                ControlStyle::Primary,
            )
            .with_visible(shown),
        ];
        out.extend(
            registry
                .groups()
                .filter(|group| registry.boxes_in_group(&group.id).next().is_some())
                .map(|group| {
                    Control::new(
                        ControlKind::Group(group.id.clone()),
                        controls::group_caption(&group.name, self.quiz.group_has_label(&group.id)),
                        ControlStyle::Group,
                    )
                    .with_color(group.color.clone())
                    .with_visible(shown)
                }),
        );
        out
    }

    #[must_use]
    pub fn controls_placement(&self) -> ControlsPlacement {
        ControlsPlacement::from_settings(self.quiz.settings())
    }

    /// Activate a control by kind; returns that control's new caption.
    ///
    /// # Errors
    ///
    /// - [`PlayerError::QuizHidden`] for any control but
    ///   [`ControlKind::Visibility`] while the quiz is hidden.
    /// - [`PlayerError::Quiz`] for an unknown group.
    pub fn activate(
        &mut self,
        kind: &ControlKind,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<String> {
        match kind {
            ControlKind::Visibility => Ok(self.toggle_quiz_visibility().to_string()),
            ControlKind::Reset => self.reset(adapter).map(|_| RESET.to_string()),
            ControlKind::ToggleAll => self.toggle_all(adapter).map(str::to_string),
            ControlKind::Group(id) => self.toggle_group(id, adapter),
        }
    }

    /// Handle a click on a box. Returns `false` when the quiz is hidden.
    ///
    /// # Errors
    ///
    /// [`PlayerError::Quiz`] for an unknown box.
    pub fn click_box(
        &mut self,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<bool> {
        if !self.visible {
            return Ok(false);
        }
        let state = self.quiz.click_box(id, adapter)?;
        tracing::trace!(box_id = %id, ?state, "box clicked");
        Ok(state.is_some())
    }

    /// Apply the bulk rule to one group; returns its button's new caption.
    ///
    /// # Errors
    ///
    /// [`PlayerError::QuizHidden`] or [`PlayerError::Quiz`] for an unknown group.
    pub fn toggle_group(
        &mut self,
        id: &GroupId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<String> {
        self.ensure_visible()?;
        let outcome = self.quiz.toggle_group(id, adapter)?;
        tracing::debug!(group_id = %id, ?outcome, "group control activated");
        let name = self
            .quiz
            .registry()
            .group(id)
            .map(|group| group.name.as_str())
            .unwrap_or_default();
        Ok(controls::group_caption(name, self.quiz.group_has_label(id)))
    }

    /// Apply the bulk rule to every box; returns the button's new caption.
    ///
    /// # Errors
    ///
    /// [`PlayerError::QuizHidden`].
    pub fn toggle_all(&mut self, adapter: &mut dyn PresentationAdapter) -> Result<&'static str> {
        self.ensure_visible()?;
        let outcome = self.quiz.toggle_all(adapter);
        tracing::debug!(?outcome, "toggle-all control activated");
        Ok(self.toggle_all_caption())
    }

    /// Put every box back to its label; returns the toggle-all caption.
    ///
    /// # Errors
    ///
    /// [`PlayerError::QuizHidden`].
    pub fn reset(&mut self, adapter: &mut dyn PresentationAdapter) -> Result<&'static str> {
        self.ensure_visible()?;
        self.quiz.reset(adapter);
        tracing::debug!("reset control activated");
        Ok(self.toggle_all_caption())
    }

    fn toggle_all_caption(&self) -> &'static str {
        // An empty quiz has nothing to hide.
        let any_label = self.quiz.registry().is_empty() || self.quiz.any_in_label();
        controls::toggle_all_caption(any_label)
    }

    fn ensure_visible(&self) -> Result<()> {
        if self.visible {
            Ok(())
        } else {
            Err(PlayerError::QuizHidden)
        }
    }
}
