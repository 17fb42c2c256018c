#![forbid(unsafe_code)]

//! Error types shared by every core operation.
//!
//! # Failure Modes
//!
//! | Error | Cause | State after failure |
//! |-------|-------|---------------------|
//! | `NotFound` | Unknown box or group id | Unchanged, the call is a no-op |
//! | `DuplicateGroup` | Derived id or name collides with an existing group | Unchanged |
//! | `EmptyName` | Group name normalizes to nothing | Unchanged |
//! | `SelfLink` | A box listed twice in one link request | Unchanged |
//! | `TooFewLinkMembers` | Fewer than two boxes in a link request | Unchanged |
//! | `MalformedConfig` | Import payload is not a valid configuration | Nothing is built |
//! | `IdsExhausted` | The box id counter reached `u64::MAX` | Unchanged, no box created |

use std::fmt;

use thiserror::Error;

use crate::ids::{BoxId, GroupId};

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Which kind of record an id referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Box,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Box => f.write_str("box"),
            EntityKind::Group => f.write_str("group"),
        }
    }
}

/// Errors raised by the registry, the link index, the engine and the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("a group with this name already exists: {id}")]
    DuplicateGroup { id: String },

    #[error("group name is empty")]
    EmptyName,

    #[error("cannot link a box to itself: {id}")]
    SelfLink { id: String },

    #[error("a link group needs at least 2 boxes, got {count}")]
    TooFewLinkMembers { count: usize },

    #[error("malformed configuration: {reason}")]
    MalformedConfig { reason: String },

    #[error("no box ids left to allocate")]
    IdsExhausted,
}

impl QuizError {
    pub(crate) fn box_not_found(id: &BoxId) -> Self {
        Self::NotFound {
            kind: EntityKind::Box,
            id: id.to_string(),
        }
    }

    pub(crate) fn group_not_found(id: &GroupId) -> Self {
        Self::NotFound {
            kind: EntityKind::Group,
            id: id.to_string(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            reason: reason.into(),
        }
    }

    /// True for errors the caller may treat as a silent no-op.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(e: serde_json::Error) -> Self {
        Self::malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_entity() {
        let err = QuizError::box_not_found(&BoxId::new("box7"));
        assert_eq!(err.to_string(), "box not found: box7");
        assert!(err.is_not_found());

        let err = QuizError::group_not_found(&GroupId::new("capitals"));
        assert_eq!(err.to_string(), "group not found: capitals");
    }

    #[test]
    fn json_errors_become_malformed_config() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = QuizError::from(parse);
        assert!(matches!(err, QuizError::MalformedConfig { .. }));
        assert!(!err.is_not_found());
    }
}
