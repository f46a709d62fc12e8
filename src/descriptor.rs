//! Static method descriptors shared by the dispatch pipeline and both
//! transports.
//!
//! Every RPC is a zero-sized marker type implementing [`Method`]; the
//! pipeline and transports are generic over the marker, so dispatch is
//! monomorphized and the descriptor data stays `const`.

use std::time::Duration;

use crate::operation::Operation;
use crate::retry::{RetryPolicy, DEFAULT_RETRY_CODES};
use crate::status::Code;
use crate::types::ApiMessage;

/// How a method's response is consumed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Unary,
    Paged,
    Lro,
}

/// HTTP verb used on the JSON transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }
}

/// Where the JSON transport takes the request body from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySelector {
    /// No body; unbound request fields travel as query parameters.
    None,
    /// The whole request message, minus fields bound into the path.
    Wildcard,
    /// A single named field of the request message.
    Field(&'static str),
}

/// HTTP binding for one method, mirroring its service annotation.
///
/// Templates use `{field=pattern}` captures with proto field names, e.g.
/// `/v1/{name=projects/*/locations/*/models/*}`.
#[derive(Debug, Clone, Copy)]
pub struct HttpRule {
    pub verb: HttpVerb,
    pub template: &'static str,
    pub body: BodySelector,
}

/// Retry profile attached to a method descriptor.
///
/// Durations are millisecond counts so descriptors stay `const`.
#[derive(Debug, Clone, Copy)]
pub struct RetryDefaults {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub total_timeout_ms: u64,
    pub codes: &'static [Code],
}

impl RetryDefaults {
    pub(crate) fn to_policy(self) -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier,
            total_timeout: Duration::from_millis(self.total_timeout_ms),
            codes: self.codes.to_vec(),
        }
    }
}

/// Profile for idempotent reads: transient statuses are reissued with
/// exponential backoff until the delay budget runs out.
pub const IDEMPOTENT_RETRY: RetryDefaults = RetryDefaults {
    initial_delay_ms: 100,
    max_delay_ms: 60_000,
    multiplier: 1.3,
    total_timeout_ms: 600_000,
    codes: DEFAULT_RETRY_CODES,
};

/// Profile for mutations: a single attempt unless the caller overrides the
/// policy on the call.
pub const NO_RETRY: RetryDefaults = RetryDefaults {
    initial_delay_ms: 0,
    max_delay_ms: 0,
    multiplier: 1.0,
    total_timeout_ms: 0,
    codes: &[],
};

/// Static description of one RPC.
#[derive(Debug, Clone, Copy)]
pub struct MethodDescriptor {
    /// Short method name, used for interceptor registration and logs.
    pub name: &'static str,
    /// Fully qualified gRPC path, `/package.Service/Method`.
    pub grpc_path: &'static str,
    pub kind: ResultKind,
    pub http: HttpRule,
    pub retry: RetryDefaults,
}

/// A single RPC: its request/response types plus the static descriptor.
pub trait Method: Send + Sync + 'static {
    type Request: ApiMessage;
    type Response: ApiMessage;

    const DESCRIPTOR: MethodDescriptor;

    /// Explicit routing parameters extracted from the request, in header
    /// order. Entries with empty values are dropped by the pipeline.
    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        let _ = request;
        Vec::new()
    }

    /// HTTP rule used for this request.
    ///
    /// Overridden by methods whose REST binding depends on the resource
    /// (the operations surface routes by the operation name's ancestry).
    fn http_rule(request: &Self::Request) -> HttpRule {
        let _ = request;
        Self::DESCRIPTOR.http
    }
}

/// A method whose response carries one page of items and a continuation
/// token.
pub trait PagedMethod: Method {
    type Item: Clone + Send + Sync + 'static;

    fn into_items(response: Self::Response) -> Vec<Self::Item>;
    fn next_page_token(response: &Self::Response) -> &str;
    fn set_page_token(request: &mut Self::Request, token: String);
}

/// A method that starts a long-running operation.
pub trait LroMethod: Method<Response = Operation> {
    /// Message type of the terminal response payload.
    type OperationResult: ApiMessage;
    /// Message type of the progress metadata payload.
    type OperationMetadata: ApiMessage;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_defaults_expand_to_policy() {
        let policy = IDEMPOTENT_RETRY.to_policy();
        assert_eq!(policy.initial_delay, Duration::from_millis(100));
        assert_eq!(policy.max_delay, Duration::from_secs(60));
        assert_eq!(policy.total_timeout, Duration::from_secs(600));
        assert_eq!(policy.codes, DEFAULT_RETRY_CODES);
    }

    #[test]
    fn no_retry_profile_has_no_budget() {
        let policy = NO_RETRY.to_policy();
        assert!(policy.codes.is_empty());
        assert!(policy.total_timeout.is_zero());
    }
}
