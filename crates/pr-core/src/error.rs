use std::path::PathBuf;

use crate::roster::CharacterId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading rosters or persisting filter state.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two characters in a roster share the same id.
    #[error("duplicate character id: {0}")]
    DuplicateCharacter(CharacterId),

    /// The requested character does not exist in the roster.
    #[error("unknown character: {0}")]
    UnknownCharacter(CharacterId),

    /// The requested persona index is out of range for its character.
    #[error("character {character} has no persona at index {index}")]
    UnknownPersona {
        /// The owning character.
        character: CharacterId,
        /// The out-of-range persona index.
        index: usize,
    },

    /// Reading or writing a file failed.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
