//! Session error types.

use bookportal_core::ClientError;

/// Errors raised by the session store and its persistence backends.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the persisted session failed.
    #[error("Session storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// The persisted session exists but cannot be parsed.
    #[error("Persisted session is malformed: {message}")]
    Malformed {
        /// Description of the parse failure.
        message: String,
    },

    /// The operation needs a signed-in principal.
    #[error("No active session")]
    NotSignedIn,

    /// No home directory to place the session file in.
    #[error("Cannot determine home directory")]
    NoHomeDirectory,
}

impl SessionError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<SessionError> for ClientError {
    fn from(err: SessionError) -> Self {
        ClientError::session(err.to_string())
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
