use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration errors raised while building the quest catalog.
/// Any of these aborts startup; the engine is never partially initialized.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around IO errors (quest directory listing, file reads).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A quest file referenced a check kind that is not registered.
    #[error("unknown check kind '{kind}' in quest '{quest_id}'")]
    UnknownCheckKind { kind: String, quest_id: String },

    /// A quest file is missing a required field or mixes quest shapes.
    #[error("invalid quest file {file}: {reason}")]
    InvalidQuest { file: PathBuf, reason: String },

    /// No quests survived loading; the game cannot run.
    #[error("quest catalog is empty")]
    EmptyCatalog,

    /// Save snapshot could not be written.
    #[error("failed to write save file {file}: {source}")]
    SaveFailed {
        file: PathBuf,
        source: std::io::Error,
    },
}

/// Recoverable failures inside a single check evaluation. These never reach
/// the player; the engine logs them and treats the check as unsatisfied.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Check kind has no registered predicate.
    #[error("no predicate registered for check kind '{0}'")]
    UnknownKind(String),

    /// A predicate received arguments for a different check kind.
    #[error("predicate for '{kind}' received {got} arguments")]
    ArgumentMismatch { kind: &'static str, got: &'static str },

    /// Underlying IO failure while inspecting system state.
    #[error("io error during check: {0}")]
    Io(#[from] std::io::Error),

    /// Account lookup failed while resolving a file owner.
    #[error("could not resolve owner for uid {0}")]
    UnknownUid(u32),
}
