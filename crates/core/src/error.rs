use thiserror::Error;

/// Errors raised while building or parsing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("unknown quiz mode: {0}")]
    UnknownMode(String),
    #[error("unknown mood: {0}")]
    UnknownMood(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("session has no questions")]
    EmptySession,
    #[error("session id is empty")]
    EmptySessionId,
}
