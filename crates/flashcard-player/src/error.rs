#![forbid(unsafe_code)]

use flashcard_core::QuizError;
use thiserror::Error;

/// Errors raised by [`QuizPlayer`](crate::QuizPlayer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// A control other than the visibility button was used while the quiz
    /// is hidden.
    #[error("quiz is hidden")]
    QuizHidden,
}

pub type Result<T> = std::result::Result<T, PlayerError>;
