//! Error types for the roulette engine.

use pr_core::{CharacterId, CoreError};
use thiserror::Error;

use crate::roulette::RouletteState;

/// Result type for roulette operations.
pub type RouletteResult<T> = Result<T, RouletteError>;

/// Reasons the current filters cannot produce a selection.
///
/// Returned as a value from [`crate::engine::validate`]; shown to the user
/// as-is and never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No character is eligible.
    #[error("select at least one character")]
    NoCharacterSelected,

    /// Enabled characters that have every persona disabled, all named at once.
    #[error("select at least one persona for: {}", .0.join(", "))]
    NoPersonaForCharacter(Vec<String>),
}

/// Errors that can occur while driving a roulette session.
#[derive(Debug, Error)]
pub enum RouletteError {
    /// The filters do not allow a selection.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The intent is not allowed in the current state.
    #[error("cannot {intent} while {state}")]
    InvalidTransition {
        /// State the roulette was in.
        state: RouletteState,
        /// What was attempted.
        intent: &'static str,
    },

    /// No character with this id.
    #[error("unknown character: {0}")]
    UnknownCharacter(CharacterId),

    /// No persona at this index.
    #[error("character {character} has no persona at index {index}")]
    UnknownPersona {
        /// Owning character.
        character: CharacterId,
        /// Out-of-range index.
        index: usize,
    },

    /// The stopwatch is already running.
    #[error("timer is already running")]
    TimerAlreadyRunning,

    /// The stopwatch is not running.
    #[error("timer is not running")]
    TimerNotRunning,

    /// A record needs a non-zero time.
    #[error("finish a timed run before saving a record")]
    EmptyRecord,

    /// A duration string could not be parsed.
    #[error("invalid duration: {0} (expected HH:MM:SS, MM:SS or seconds)")]
    InvalidDuration(String),

    /// Bad input to the line-command interface.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Unknown line command.
    #[error("unknown command: {0} (type 'help')")]
    UnknownCommand(String),

    /// Roster or storage error.
    #[error("{0}")]
    Core(CoreError),
}

impl From<CoreError> for RouletteError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownCharacter(id) => Self::UnknownCharacter(id),
            CoreError::UnknownPersona { character, index } => {
                Self::UnknownPersona { character, index }
            }
            other => Self::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregated_persona_message() {
        let err = ValidationError::NoPersonaForCharacter(vec!["Faust".into(), "Outis".into()]);
        assert_eq!(err.to_string(), "select at least one persona for: Faust, Outis");
    }

    #[test]
    fn core_unknown_ids_map_to_dedicated_variants() {
        let err: RouletteError = CoreError::UnknownCharacter(CharacterId(4)).into();
        assert!(matches!(err, RouletteError::UnknownCharacter(CharacterId(4))));

        let err: RouletteError = CoreError::UnknownPersona {
            character: CharacterId(4),
            index: 9,
        }
        .into();
        assert!(matches!(err, RouletteError::UnknownPersona { index: 9, .. }));
    }
}
