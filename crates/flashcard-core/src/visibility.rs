#![forbid(unsafe_code)]

//! Displayed-state machine for boxes.
//!
//! Each box is in exactly one [`DisplayedState`]. The engine owns that state
//! explicitly; it never infers it from rendered text.
//!
//! ```text
//!            toggle (answer non-blank)
//!   Label ─────────────────────────────▶ Answer
//!     │ ▲                                   │
//!     │ └──────────── toggle ───────────────┘
//!     │ toggle (answer blank)
//!     ▼
//!   Hidden ─────────── toggle ──────────▶ Label
//! ```
//!
//! # Bulk rule
//!
//! Group and "toggle all" operations look at the whole set first: if **any**
//! box is in `Label`, every `Label` box is revealed and revealed boxes stay
//! put; otherwise every box returns to `Label`. One click therefore moves a
//! mixed set uniformly toward its answers, and the next one back.
//!
//! # Presentation contract
//!
//! Every box whose state changes is reported to the
//! [`PresentationAdapter`] with its new [`BoxDisplay`]. [`reset`] and
//! [`refresh`] report unconditionally so the view can resynchronise text
//! after edits.
//!
//! [`reset`]: VisibilityEngine::reset
//! [`refresh`]: VisibilityEngine::refresh

use std::collections::HashMap;

use crate::error::{QuizError, Result};
use crate::ids::{BoxId, GroupId};
use crate::link_index::LinkGroupIndex;
use crate::registry::{BoxRegistry, QuizBox};

/// What a box is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayedState {
    /// Group name or custom label on an opaque background.
    #[default]
    Label,
    /// The answer text on an opaque background.
    Answer,
    /// Nothing, on a transparent background: the answer was requested but is blank.
    Hidden,
}

impl DisplayedState {
    /// State entered when a box is revealed.
    #[must_use]
    pub fn revealed(has_answer: bool) -> Self {
        if has_answer { Self::Answer } else { Self::Hidden }
    }

    /// Single-box transition.
    #[must_use]
    pub fn toggled(self, has_answer: bool) -> Self {
        match self {
            Self::Label => Self::revealed(has_answer),
            Self::Answer | Self::Hidden => Self::Label,
        }
    }

    #[must_use]
    pub fn is_label(self) -> bool {
        self == Self::Label
    }

    #[must_use]
    pub fn is_revealed(self) -> bool {
        !self.is_label()
    }
}

/// Text and background a view should render for a box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxDisplay {
    pub state: DisplayedState,
    pub text: String,
    /// True only for [`DisplayedState::Hidden`].
    pub transparent: bool,
}

/// Receiver of displayed-state changes, implemented by the view layer.
pub trait PresentationAdapter {
    /// Called once for each box whose displayed state changed.
    fn apply_displayed_state(&mut self, id: &BoxId, display: &BoxDisplay);
}

impl<F> PresentationAdapter for F
where
    F: FnMut(&BoxId, &BoxDisplay),
{
    fn apply_displayed_state(&mut self, id: &BoxId, display: &BoxDisplay) {
        self(id, display);
    }
}

/// Adapter that discards every update (headless use, imports).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl PresentationAdapter for NullPresentation {
    fn apply_displayed_state(&mut self, _id: &BoxId, _display: &BoxDisplay) {}
}

/// Direction taken by a bulk toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkToggle {
    /// At least one box was in `Label`; labels moved to their answers.
    Revealed,
    /// No box was in `Label`; everything went back to `Label`.
    Concealed,
}

/// Owner of every box's [`DisplayedState`].
///
/// Boxes absent from the table are in `Label`.
#[derive(Debug, Clone, Default)]
pub struct VisibilityEngine {
    states: HashMap<BoxId, DisplayedState>,
}

impl VisibilityEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self, id: &BoxId) -> DisplayedState {
        self.states.get(id).copied().unwrap_or_default()
    }

    /// Render data for `record` in its current state.
    #[must_use]
    pub fn display(&self, registry: &BoxRegistry, record: &QuizBox) -> BoxDisplay {
        let state = self.state(&record.id);
        let (text, transparent) = match state {
            DisplayedState::Label => (registry.display_label(record).to_string(), false),
            DisplayedState::Answer => (record.answer.clone(), false),
            DisplayedState::Hidden => (String::new(), true),
        };
        BoxDisplay {
            state,
            text,
            transparent,
        }
    }

    /// True if any of `ids` is currently in `Label`.
    pub fn any_in_label<'a>(&self, ids: impl IntoIterator<Item = &'a BoxId>) -> bool {
        ids.into_iter().any(|id| self.state(id).is_label())
    }

    /// Toggle one box.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn toggle(
        &mut self,
        registry: &BoxRegistry,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<DisplayedState> {
        let record = registry.require(id)?;
        let next = self.state(id).toggled(record.has_answer());
        self.apply(registry, record, next, adapter);
        Ok(next)
    }

    /// Toggle a box and, independently, every partner in its link group.
    ///
    /// Each partner's next state is computed from its own current state, so
    /// partners that started out of step stay out of step. Partners whose
    /// box no longer exists are skipped. Returns the trigger box's new state.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown trigger box.
    pub fn toggle_linked(
        &mut self,
        registry: &BoxRegistry,
        links: &LinkGroupIndex,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<DisplayedState> {
        let next = self.toggle(registry, id, adapter)?;
        for partner in links.linked_partners(id) {
            if let Some(record) = registry.get(&partner) {
                let partner_next = self.state(&partner).toggled(record.has_answer());
                self.apply(registry, record, partner_next, adapter);
            }
        }
        Ok(next)
    }

    /// Apply the bulk rule to every box of a group.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown group.
    pub fn toggle_group(
        &mut self,
        registry: &BoxRegistry,
        group: &GroupId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<BulkToggle> {
        if registry.group(group).is_none() {
            return Err(QuizError::group_not_found(group));
        }
        let members: Vec<BoxId> = registry
            .boxes_in_group(group)
            .map(|b| b.id.clone())
            .collect();
        let outcome = self.bulk_toggle(registry, &members, adapter);
        crate::debug!(group_id = %group, ?outcome, boxes = members.len(), "group toggled");
        Ok(outcome)
    }

    /// Apply the bulk rule to every box.
    pub fn toggle_all(
        &mut self,
        registry: &BoxRegistry,
        adapter: &mut dyn PresentationAdapter,
    ) -> BulkToggle {
        let all: Vec<BoxId> = registry.box_ids().cloned().collect();
        let outcome = self.bulk_toggle(registry, &all, adapter);
        crate::debug!(?outcome, boxes = all.len(), "all boxes toggled");
        outcome
    }

    /// Force every box to `Label` and report each one.
    pub fn reset(&mut self, registry: &BoxRegistry, adapter: &mut dyn PresentationAdapter) {
        self.states.clear();
        for record in registry.boxes() {
            adapter.apply_displayed_state(&record.id, &self.display(registry, record));
        }
    }

    /// Re-resolve a box after its record changed and report it.
    ///
    /// A revealed box follows its (possibly edited) answer: `Answer` when
    /// the answer is non-blank, `Hidden` otherwise. `Label` stays `Label`.
    ///
    /// # Errors
    ///
    /// [`QuizError::NotFound`] for an unknown box.
    pub fn refresh(
        &mut self,
        registry: &BoxRegistry,
        id: &BoxId,
        adapter: &mut dyn PresentationAdapter,
    ) -> Result<()> {
        let record = registry.require(id)?;
        self.refresh_record(registry, record, adapter);
        Ok(())
    }

    /// [`refresh`](Self::refresh) for a record already looked up.
    pub fn refresh_record(
        &mut self,
        registry: &BoxRegistry,
        record: &QuizBox,
        adapter: &mut dyn PresentationAdapter,
    ) {
        if self.state(&record.id).is_revealed() {
            self.set_state(&record.id, DisplayedState::revealed(record.has_answer()));
        }
        adapter.apply_displayed_state(&record.id, &self.display(registry, record));
    }

    /// Drop the state of a deleted box.
    pub fn forget(&mut self, id: &BoxId) {
        self.states.remove(id);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn bulk_toggle(
        &mut self,
        registry: &BoxRegistry,
        ids: &[BoxId],
        adapter: &mut dyn PresentationAdapter,
    ) -> BulkToggle {
        let reveal = self.any_in_label(ids);
        for id in ids {
            let Some(record) = registry.get(id) else {
                continue;
            };
            let current = self.state(id);
            let next = match (reveal, current) {
                (true, DisplayedState::Label) => DisplayedState::revealed(record.has_answer()),
                (true, revealed) => revealed,
                (false, _) => DisplayedState::Label,
            };
            self.apply(registry, record, next, adapter);
        }
        if reveal {
            BulkToggle::Revealed
        } else {
            BulkToggle::Concealed
        }
    }

    fn apply(
        &mut self,
        registry: &BoxRegistry,
        record: &QuizBox,
        next: DisplayedState,
        adapter: &mut dyn PresentationAdapter,
    ) {
        if self.state(&record.id) == next {
            return;
        }
        self.set_state(&record.id, next);
        adapter.apply_displayed_state(&record.id, &self.display(registry, record));
    }

    fn set_state(&mut self, id: &BoxId, state: DisplayedState) {
        if state.is_label() {
            self.states.remove(id);
        } else {
            self.states.insert(id.clone(), state);
        }
    }
}
