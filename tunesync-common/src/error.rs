//! Common error types for TuneSync

use thiserror::Error;

use crate::tracklist::TrackListError;

/// Common result type for TuneSync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across TuneSync crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found, or not owned by the requesting user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Positional edit or projection of a track list failed
    #[error("Track list error: {0}")]
    TrackList(#[from] TrackListError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
