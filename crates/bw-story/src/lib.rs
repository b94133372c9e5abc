//! Story graph model for Branchwork.
//!
//! A story is a graph of text passages connected by choices, plus a set of
//! declared variables. This crate owns the data model only: it can be built
//! programmatically, loaded from JSON, and checked for integrity problems such
//! as dangling links. Playback lives in `bw-player`.

/// Error types for loading and editing stories.
pub mod error;
/// Typed identifiers for passages and choices.
pub mod ids;
/// Passages and the choices that connect them.
pub mod passage;
/// The story graph itself.
pub mod story;
/// Static integrity checks over a story graph.
pub mod validate;
/// Variable declarations and values.
pub mod variable;

pub use error::{StoryError, StoryResult};
pub use ids::{ChoiceId, PassageId};
pub use passage::{Choice, Passage};
pub use story::Story;
pub use validate::{IntegrityWarning, check_story};
pub use variable::{Variable, VariableType, VariableValue};
