#![forbid(unsafe_code)]

//! Click suppression around box drags and resizes.
//!
//! The editor moves and resizes boxes with press/move/release sequences. The
//! release that ends such a sequence is usually followed by a click on the
//! same box, and that click must not toggle it. [`DragGuard`] is the single
//! flag the core consults before routing a click to a toggle.
//!
//! ## Invariants
//!
//! 1. At most one drag is in progress; [`DragGuard::begin`] while dragging
//!    replaces the kind and keeps the guard active.
//! 2. While a drag is in progress every click is rejected.
//! 3. [`DragGuard::finish`] arms a one-shot suppression: exactly the next
//!    click after a drag is rejected, later clicks are admitted.
//!
//! ## Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | `finish` without `begin` | Release outside a drag | No-op, nothing armed |
//! | Drag ends without a trailing click | Release outside the box | Next click is swallowed once |
//! | Drag cancelled by the host | Focus loss | [`DragGuard::cancel`] clears without arming |

/// What the pointer is doing to a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Move,
    Resize,
}

/// Tracks an in-progress drag and the click that ends it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragGuard {
    active: Option<DragKind>,
    suppress_next_click: bool,
}

impl DragGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag of `kind`.
    pub fn begin(&mut self, kind: DragKind) {
        crate::trace!(?kind, "drag started");
        self.active = Some(kind);
    }

    /// End the current drag and swallow the click that follows it.
    ///
    /// Returns the kind of drag that ended, or `None` if none was active.
    pub fn finish(&mut self) -> Option<DragKind> {
        let kind = self.active.take()?;
        self.suppress_next_click = true;
        crate::trace!(?kind, "drag finished");
        Some(kind)
    }

    /// Abort the current drag without suppressing the next click.
    pub fn cancel(&mut self) {
        self.active = None;
        self.suppress_next_click = false;
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    #[must_use]
    pub fn active(&self) -> Option<DragKind> {
        self.active
    }

    /// Decide whether a click may act, consuming a pending suppression.
    pub fn admit_click(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        !std::mem::take(&mut self.suppress_next_click)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_guard_admits_clicks() {
        let mut guard = DragGuard::new();
        assert!(guard.admit_click());
        assert!(guard.admit_click());
    }

    #[test]
    fn clicks_during_drag_are_rejected() {
        let mut guard = DragGuard::new();
        guard.begin(DragKind::Move);
        assert!(guard.is_dragging());
        assert!(!guard.admit_click());
        assert!(!guard.admit_click());
    }

    #[test]
    fn click_ending_a_drag_is_swallowed_once() {
        let mut guard = DragGuard::new();
        guard.begin(DragKind::Resize);
        assert_eq!(guard.finish(), Some(DragKind::Resize));
        assert!(!guard.is_dragging());
        assert!(!guard.admit_click());
        assert!(guard.admit_click());
    }

    #[test]
    fn finish_without_begin_arms_nothing() {
        let mut guard = DragGuard::new();
        assert_eq!(guard.finish(), None);
        assert!(guard.admit_click());
    }

    #[test]
    fn cancel_clears_without_arming() {
        let mut guard = DragGuard::new();
        guard.begin(DragKind::Move);
        guard.cancel();
        assert_eq!(guard.active(), None);
        assert!(guard.admit_click());
    }

    #[test]
    fn begin_while_dragging_replaces_kind() {
        let mut guard = DragGuard::new();
        guard.begin(DragKind::Move);
        guard.begin(DragKind::Resize);
        assert_eq!(guard.active(), Some(DragKind::Resize));
        assert_eq!(guard.finish(), Some(DragKind::Resize));
    }
}
