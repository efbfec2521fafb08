//! Client-side error types

use thiserror::Error;

/// Failure of one transport call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Server answered with a non-success HTTP status
    #[error("Server returned status {0}")]
    Status(u16),

    /// Request never produced a response (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected payload
    #[error("Decode error: {0}")]
    Decode(String),
}

impl TransportError {
    /// Short reason suitable for a user notification
    ///
    /// ```
    /// use tunesync_ui::TransportError;
    ///
    /// assert_eq!(TransportError::Status(500).reason(), "Internal server error");
    /// assert_eq!(TransportError::Status(404).reason(), "404");
    /// ```
    pub fn reason(&self) -> String {
        match self {
            TransportError::Status(500) => "Internal server error".to_string(),
            TransportError::Status(504) => "Timeout".to_string(),
            TransportError::Status(code) => code.to_string(),
            TransportError::Network(message) | TransportError::Decode(message) => message.clone(),
        }
    }
}

/// Client-side result type
pub type Result<T> = std::result::Result<T, UiError>;

#[derive(Debug, Error)]
pub enum UiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// `start` or `refresh` called while a scan or listing is running
    #[error("A scan is already in progress")]
    AlreadyScanning,

    /// `start` called with no pending files
    #[error("No unscanned files")]
    NothingToScan,

    #[error(transparent)]
    Common(#[from] tunesync_common::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        assert_eq!(TransportError::Status(504).reason(), "Timeout");
        assert_eq!(TransportError::Status(502).reason(), "502");
        assert_eq!(
            TransportError::Network("connection refused".to_string()).reason(),
            "connection refused"
        );
    }

    #[test]
    fn test_transport_error_converts() {
        let err: UiError = TransportError::Status(500).into();
        assert!(matches!(err, UiError::Transport(TransportError::Status(500))));
        assert_eq!(err.to_string(), "Server returned status 500");
    }
}
