//! Error types for the playback engine.

use std::collections::VecDeque;

use bw_story::{ChoiceId, PassageId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for player operations.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Errors that can occur during playback.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// No story has been loaded.
    #[error("no story loaded")]
    NoStory,

    /// The command needs an active playthrough.
    #[error("playback is not active")]
    Inactive,

    /// A passage ID that does not exist in the story.
    #[error("unknown passage: {0}")]
    UnknownPassage(PassageId),

    /// The choice is not offered by the current passage.
    #[error("choice \"{choice}\" is not available in passage \"{passage}\"")]
    InvalidChoice {
        /// The requested choice.
        choice: ChoiceId,
        /// The passage the player was on.
        passage: PassageId,
    },

    /// The choice leads to a passage that does not exist.
    #[error("choice \"{choice}\" leads to missing passage \"{target}\"")]
    DanglingTarget {
        /// The selected choice.
        choice: ChoiceId,
        /// The missing destination.
        target: PassageId,
    },

    /// A history index outside the recorded steps.
    #[error("step {index} is out of range (history has {len} steps)")]
    StepOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of recorded steps.
        len: usize,
    },

    /// The playthrough could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlayerError {
    /// The log category for errors that are recorded, or `None` for errors
    /// that only mean "nothing happened".
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::UnknownPassage(_) | Self::InvalidChoice { .. } | Self::DanglingTarget { .. } => {
                Some(ErrorKind::Validation)
            }
            Self::NoStory
            | Self::Inactive
            | Self::StepOutOfRange { .. }
            | Self::Serialization(_) => None,
        }
    }
}

/// Category of a recorded error.
///
/// A choice leading to a missing passage is a validation error too: the
/// transition is refused and the reader stays put. Broken links are also
/// reported statically by `bw_story::check_story`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The request could not be carried out (unknown passage or choice, or a
    /// choice whose target does not exist).
    Validation,
}

/// A recoverable error kept in the player's error log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Passage the player was on when the error occurred.
    pub passage: Option<PassageId>,
    /// When it happened, in epoch milliseconds.
    pub timestamp: i64,
}

impl std::fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ErrorKind::Validation => "validation",
        };
        write!(f, "[{kind}] {}", self.message)
    }
}

/// Bounded, ordered log of recoverable errors. Oldest entries drop first.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    entries: VecDeque<ErrorEntry>,
    capacity: usize,
}

impl ErrorLog {
    /// Create an empty log holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record an entry.
    pub fn push(&mut self, entry: ErrorEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &VecDeque<ErrorEntry> {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
