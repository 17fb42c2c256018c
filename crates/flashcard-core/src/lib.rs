#![forbid(unsafe_code)]

//! Image flashcard quiz core: boxes over an image, groups, link groups, and
//! the reveal/hide state machine that drives them.
//!
//! # Example
//!
//! ```
//! use flashcard_core::{BoxId, BoxProperty, DisplayedState, NullPresentation, Quiz};
//! use flashcard_core::geometry::{Point, Size};
//!
//! let mut quiz = Quiz::new();
//! let view = &mut NullPresentation;
//! let paris = quiz.create_box(Point::new(10.0, 10.0), Size::new(12.0, 8.0), view)?;
//! let blank = quiz.create_box(Point::new(40.0, 10.0), Size::new(12.0, 8.0), view)?;
//! quiz.update_property(&paris, BoxProperty::Answer("Paris".into()), view)?;
//! quiz.link_pair(paris.clone(), blank.clone())?;
//!
//! quiz.toggle_linked(&paris, view)?;
//! assert_eq!(quiz.state(&paris), DisplayedState::Answer);
//! assert_eq!(quiz.state(&blank), DisplayedState::Hidden);
//!
//! let restored = Quiz::from_json(&quiz.to_json()?)?;
//! assert_eq!(restored.linked_partners(&BoxId::new("box1")), vec![blank]);
//! # Ok::<(), flashcard_core::QuizError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod interaction;
pub mod link_index;
pub mod logging;
pub mod quiz;
pub mod registry;
pub mod settings;
pub mod visibility;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};

pub use codec::{ConfigCodec, ConfigDocument, ImportedConfig};
pub use config::QuizConfig;
pub use error::{EntityKind, QuizError, Result};
pub use ids::{BoxId, GroupId};
pub use interaction::{DragGuard, DragKind};
pub use link_index::{LinkGroup, LinkGroupIndex};
pub use quiz::Quiz;
pub use registry::{BoxProperty, BoxRegistry, Group, QuizBox};
pub use settings::{ControlsPosition, ImageDimensions, QuizSettings};
pub use visibility::{
    BoxDisplay, BulkToggle, DisplayedState, NullPresentation, PresentationAdapter,
    VisibilityEngine,
};
