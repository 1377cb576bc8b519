use serde_json::Value;
use thiserror::Error;

/// Error taxonomy surfaced by every client operation.
///
/// HTTP failures keep the response status and the message extracted from the
/// response body. `Display` prints exactly that message so callers can show it
/// to the user unchanged.
///
/// The type is `Clone` because a single in-flight fetch result is handed to
/// every caller that joined it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client-side form validation rejected the input; no request was sent.
    #[error("{0}")]
    InvalidInput(String),

    /// The persisted session could not be read or written.
    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build an HTTP error from a status code and the raw response body.
    ///
    /// The message is taken from the body's `message` field. NestJS-style
    /// validation responses carry an array of messages; those are joined with
    /// `", "`. Without a usable body the generic text for the status is used.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| default_message(status).to_string());
        Self::Http { status, message }
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// User-facing message for this error.
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Http { status, .. } => ErrorKind::from_status(*status),
            Self::Decode(_) => ErrorKind::Decode,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Session(_) => ErrorKind::Session,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Classification of client errors, following the status-code contract of
/// the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Authentication,
    Authorization,
    Validation,
    NotFound,
    Conflict,
    RateLimited,
    Server,
    Unexpected,
    Decode,
    InvalidInput,
    Session,
    Configuration,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 => Self::Authentication,
            403 => Self::Authorization,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500..=599 => Self::Server,
            _ => Self::Unexpected,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate_limited",
            Self::Server => "server",
            Self::Unexpected => "unexpected",
            Self::Decode => "decode",
            Self::InvalidInput => "invalid_input",
            Self::Session => "session",
            Self::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match json.get("message")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// Generic message shown when the API did not send one.
pub fn default_message(status: u16) -> &'static str {
    match status {
        400 | 422 => "Invalid request. Please check your input and try again.",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action.",
        404 => "The requested resource was not found.",
        409 => "This item conflicts with an existing one.",
        429 => "Too many requests. Please wait a moment and try again.",
        500..=599 => "Something went wrong on the server. Please try again later.",
        _ => "The request failed. Please try again.",
    }
}

/// Convenience result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
