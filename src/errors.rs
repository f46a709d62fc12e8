use std::fmt;

use thiserror::Error;

use crate::status::{Code, ServiceError};

/// Boxed error source shared by transport and auth errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Convenience alias for fallible client results.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Retry metadata surfaced on errors that passed through the retry envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryMetadata {
    pub attempts: u32,
    pub last_code: Option<Code>,
    pub last_error: Option<String>,
}

/// Structured argument-validation error raised before any I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "{}: {}", field, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Credential acquisition or refresh failure.
///
/// Kept distinct from [`ServiceError`] with `Unauthenticated` so callers can
/// tell a local credential problem from a server-side rejection.
#[derive(Debug, Error)]
#[error("authentication error: {message}")]
pub struct AuthError {
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Transport-level error (connectivity, TLS, read/write timeouts).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    #[source]
    pub source: Option<BoxError>,
    pub retries: Option<RetryMetadata>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            retries: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Broad transport error kinds for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Tls,
    Request,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Tls => "tls",
            TransportErrorKind::Request => "request",
            TransportErrorKind::Other => "transport",
        };
        write!(f, "{label}")
    }
}

/// Unified error type surfaced by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad environment switch, conflicting constructor inputs, malformed
    /// resource name. Raised synchronously; never retried.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Non-OK status returned by the server.
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A long-running operation completed with an error status.
    #[error("operation {name} failed: {status}")]
    Operation { name: String, status: ServiceError },

    /// Caller-initiated cancellation; never retried.
    #[error("call cancelled")]
    Cancelled,
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>, field: &str) -> Self {
        Error::Validation(ValidationError::new(message).with_field(field))
    }

    /// Status code for service and operation errors, `None` otherwise.
    pub fn code(&self) -> Option<Code> {
        match self {
            Error::Service(err) => Some(err.code),
            Error::Operation { status, .. } => Some(status.code),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Whether a forced credential refresh is worth a single reissue.
    pub(crate) fn is_auth_failure(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Service(err) => err.code == Code::Unauthenticated,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_formats_with_field() {
        let err = ValidationError::new("cannot be combined with a request object").with_field("name");
        assert_eq!(
            err.to_string(),
            "name: cannot be combined with a request object"
        );
    }

    #[test]
    fn transport_error_displays_kind() {
        let err = TransportError::new(TransportErrorKind::Connect, "connection refused");
        assert_eq!(err.to_string(), "connect: connection refused");
    }

    #[test]
    fn service_error_code_is_exposed() {
        let err = Error::Service(ServiceError::new(Code::NotFound, "no such model"));
        assert_eq!(err.code(), Some(Code::NotFound));
        assert!(!err.is_cancelled());
    }

    #[test]
    fn unauthenticated_counts_as_auth_failure() {
        let err = Error::Service(ServiceError::new(Code::Unauthenticated, "expired"));
        assert!(err.is_auth_failure());
        assert!(Error::Auth(AuthError::new("no token")).is_auth_failure());
        assert!(!Error::Cancelled.is_auth_failure());
    }
}
