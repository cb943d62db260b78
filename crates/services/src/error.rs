//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::ModelError;

/// Errors emitted by the quiz backend client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizApiError {
    #[error("quiz backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz backend returned an invalid payload: {0}")]
    InvalidPayload(#[from] ModelError),
    /// Raised by non-HTTP collaborators (fakes, offline backends).
    #[error("quiz backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by the Spotify login flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("not signed in")]
    NotSignedIn,
    #[error("authorization code is empty")]
    EmptyCode,
    #[error("auth request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by an audio output when starting playback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("no preview is loaded")]
    NothingLoaded,
    #[error("could not fetch preview: {0}")]
    Fetch(String),
    #[error("could not decode preview: {0}")]
    Decode(String),
    #[error("audio device unavailable: {0}")]
    Device(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Api(#[from] QuizApiError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
