#![forbid(unsafe_code)]

//! Read-only quiz player for exported image flashcard quizzes.
//!
//! [`QuizPlayer`] wraps a [`flashcard_core::Quiz`] and adds the taker-facing
//! surface: a show/hide switch for the whole quiz, a control strip whose
//! captions track the box states, and the controls placement saved with the
//! quiz.

pub mod controls;
pub mod error;
pub mod player;

pub use controls::{Control, ControlKind, ControlStyle, ControlsPlacement};
pub use error::{PlayerError, Result};
pub use player::QuizPlayer;
