use crate::ids::PassageId;

/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur when building or loading a story.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// A passage with the same ID already exists.
    #[error("duplicate passage id: \"{0}\"")]
    DuplicatePassage(PassageId),

    /// A variable with the same name is already declared.
    #[error("duplicate variable: \"{0}\"")]
    DuplicateVariable(String),

    /// A passage is stored under a key that differs from its own ID.
    #[error("passage \"{id}\" is stored under key \"{key}\"")]
    PassageKeyMismatch {
        /// The map key the passage was found under.
        key: PassageId,
        /// The passage's own ID.
        id: PassageId,
    },

    /// The story file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The story JSON is malformed.
    #[error("invalid story JSON: {0}")]
    Json(#[from] serde_json::Error),
}
