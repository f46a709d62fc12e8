use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, RetryMetadata, TransportError, TransportErrorKind};

/// Canonical RPC status codes shared by both transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Code {
    Ok,
    Cancelled,
    Unknown,
    InvalidArgument,
    DeadlineExceeded,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    ResourceExhausted,
    FailedPrecondition,
    Aborted,
    OutOfRange,
    Unimplemented,
    Internal,
    Unavailable,
    DataLoss,
    Unauthenticated,
}

impl Code {
    /// Wire value used by the binary transport and operation error payloads.
    pub fn value(self) -> i32 {
        match self {
            Code::Ok => 0,
            Code::Cancelled => 1,
            Code::Unknown => 2,
            Code::InvalidArgument => 3,
            Code::DeadlineExceeded => 4,
            Code::NotFound => 5,
            Code::AlreadyExists => 6,
            Code::PermissionDenied => 7,
            Code::ResourceExhausted => 8,
            Code::FailedPrecondition => 9,
            Code::Aborted => 10,
            Code::OutOfRange => 11,
            Code::Unimplemented => 12,
            Code::Internal => 13,
            Code::Unavailable => 14,
            Code::DataLoss => 15,
            Code::Unauthenticated => 16,
        }
    }

    pub fn from_value(value: i32) -> Code {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }

    pub fn from_name(name: &str) -> Option<Code> {
        let code = match name {
            "OK" => Code::Ok,
            "CANCELLED" => Code::Cancelled,
            "UNKNOWN" => Code::Unknown,
            "INVALID_ARGUMENT" => Code::InvalidArgument,
            "DEADLINE_EXCEEDED" => Code::DeadlineExceeded,
            "NOT_FOUND" => Code::NotFound,
            "ALREADY_EXISTS" => Code::AlreadyExists,
            "PERMISSION_DENIED" => Code::PermissionDenied,
            "RESOURCE_EXHAUSTED" => Code::ResourceExhausted,
            "FAILED_PRECONDITION" => Code::FailedPrecondition,
            "ABORTED" => Code::Aborted,
            "OUT_OF_RANGE" => Code::OutOfRange,
            "UNIMPLEMENTED" => Code::Unimplemented,
            "INTERNAL" => Code::Internal,
            "UNAVAILABLE" => Code::Unavailable,
            "DATA_LOSS" => Code::DataLoss,
            "UNAUTHENTICATED" => Code::Unauthenticated,
            _ => return None,
        };
        Some(code)
    }

    /// Status code implied by an HTTP response status.
    pub fn from_http(status: u16) -> Code {
        match status {
            200 => Code::Ok,
            400 => Code::InvalidArgument,
            401 => Code::Unauthenticated,
            403 => Code::PermissionDenied,
            404 => Code::NotFound,
            409 => Code::Aborted,
            416 => Code::OutOfRange,
            429 => Code::ResourceExhausted,
            499 => Code::Cancelled,
            501 => Code::Unimplemented,
            503 => Code::Unavailable,
            504 => Code::DeadlineExceeded,
            _ => Code::Unknown,
        }
    }

    /// Canonical HTTP status for this code.
    pub fn http_status(self) -> u16 {
        match self {
            Code::Ok => 200,
            Code::Cancelled => 499,
            Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => 400,
            Code::Unauthenticated => 401,
            Code::PermissionDenied => 403,
            Code::NotFound => 404,
            Code::AlreadyExists | Code::Aborted => 409,
            Code::ResourceExhausted => 429,
            Code::Unimplemented => 501,
            Code::Unavailable => 503,
            Code::DeadlineExceeded => 504,
            Code::Unknown | Code::Internal | Code::DataLoss => 500,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tonic::Code> for Code {
    fn from(code: tonic::Code) -> Self {
        Code::from_value(code as i32)
    }
}

impl From<Code> for tonic::Code {
    fn from(code: Code) -> Self {
        tonic::Code::from(code.value())
    }
}

/// Non-OK status returned by the server, uniform across transports.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    pub code: Code,
    pub message: String,
    /// Structured detail payloads, kept as received.
    pub details: Vec<serde_json::Value>,
    /// Trailing metadata from the binary transport, when present.
    pub metadata: Vec<(String, String)>,
    pub retries: Option<RetryMetadata>,
    /// Raw response body for debugging (REST transport only).
    pub raw_body: Option<String>,
}

impl ServiceError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
            metadata: Vec::new(),
            retries: None,
            raw_body: None,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

impl From<tonic::Status> for ServiceError {
    fn from(status: tonic::Status) -> Self {
        let metadata = status
            .metadata()
            .iter()
            .filter_map(|kv| match kv {
                tonic::metadata::KeyAndValueRef::Ascii(key, value) => {
                    let value = value.to_str().ok()?;
                    Some((key.as_str().to_string(), value.to_string()))
                }
                tonic::metadata::KeyAndValueRef::Binary(_, _) => None,
            })
            .collect();
        ServiceError {
            code: Code::from(status.code()),
            message: status.message().to_string(),
            details: Vec::new(),
            metadata,
            retries: None,
            raw_body: None,
        }
    }
}

/// Shape of the JSON error envelope returned by the REST surface.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// Builds a [`ServiceError`] from a non-2xx REST response.
///
/// The envelope's `status` name wins over the HTTP status when both are
/// present; a body that is not the documented envelope degrades to the raw
/// text so nothing is lost.
pub(crate) fn service_error_from_http(status: u16, body: &[u8]) -> ServiceError {
    let raw_body = String::from_utf8_lossy(body).into_owned();
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let code = envelope
                .error
                .status
                .as_deref()
                .and_then(Code::from_name)
                .unwrap_or_else(|| Code::from_http(status));
            let message = if envelope.error.message.is_empty() {
                format!("HTTP {status}")
            } else {
                envelope.error.message
            };
            ServiceError {
                code,
                message,
                details: envelope.error.details,
                metadata: Vec::new(),
                retries: None,
                raw_body: Some(raw_body),
            }
        }
        Err(_) => {
            let message = if raw_body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                raw_body.clone()
            };
            let mut err = ServiceError::new(Code::from_http(status), message);
            err.raw_body = Some(raw_body);
            err
        }
    }
}

/// Splits a binary-transport status into the transport/service taxonomy.
///
/// tonic reports connection-level failures as a status with a source error
/// attached; those are transport errors for retry purposes, not server
/// statuses.
pub(crate) fn error_from_tonic(status: tonic::Status) -> Error {
    use std::error::Error as _;
    let connectivity = matches!(status.code(), tonic::Code::Unavailable | tonic::Code::Unknown)
        && status.source().is_some();
    if connectivity {
        let kind = if status.message().contains("timed out") {
            TransportErrorKind::Timeout
        } else {
            TransportErrorKind::Connect
        };
        return Error::Transport(
            TransportError::new(kind, status.message().to_string()).with_source(Box::new(status)),
        );
    }
    Error::Service(ServiceError::from(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_values_round_trip() {
        for value in 0..=16 {
            assert_eq!(Code::from_value(value).value(), value);
        }
        assert_eq!(Code::from_value(99), Code::Unknown);
    }

    #[test]
    fn code_names_round_trip() {
        assert_eq!(Code::from_name("NOT_FOUND"), Some(Code::NotFound));
        assert_eq!(Code::from_name("bogus"), None);
        assert_eq!(Code::Unavailable.name(), "UNAVAILABLE");
    }

    #[test]
    fn http_mapping_covers_common_statuses() {
        assert_eq!(Code::from_http(404), Code::NotFound);
        assert_eq!(Code::from_http(429), Code::ResourceExhausted);
        assert_eq!(Code::from_http(503), Code::Unavailable);
        assert_eq!(Code::from_http(418), Code::Unknown);
        assert_eq!(Code::NotFound.http_status(), 404);
    }

    #[test]
    fn parses_rest_error_envelope() {
        let body = br#"{"error":{"code":404,"message":"model not found","status":"NOT_FOUND","details":[{"reason":"MODEL_MISSING"}]}}"#;
        let err = service_error_from_http(404, body);
        assert_eq!(err.code, Code::NotFound);
        assert_eq!(err.message, "model not found");
        assert_eq!(err.details.len(), 1);
        assert!(err.raw_body.is_some());
    }

    #[test]
    fn envelope_status_name_wins_over_http_status() {
        let body = br#"{"error":{"code":400,"message":"try later","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = service_error_from_http(400, body);
        assert_eq!(err.code, Code::ResourceExhausted);
    }

    #[test]
    fn non_json_body_degrades_to_raw_text() {
        let err = service_error_from_http(503, b"upstream connect error");
        assert_eq!(err.code, Code::Unavailable);
        assert_eq!(err.message, "upstream connect error");
    }

    #[test]
    fn empty_body_reports_http_status() {
        let err = service_error_from_http(500, b"");
        assert_eq!(err.code, Code::Unknown);
        assert_eq!(err.message, "HTTP 500");
    }

    #[test]
    fn tonic_status_maps_to_service_error() {
        let status = tonic::Status::not_found("no such model");
        let err = ServiceError::from(status);
        assert_eq!(err.code, Code::NotFound);
        assert_eq!(err.message, "no such model");
    }
}
