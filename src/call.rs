//! The call pipeline shared by every RPC.
//!
//! One envelope per call: interceptor `pre` hooks, routing headers derived
//! from the request as dispatched, auth headers refreshed per attempt,
//! retry with exponential backoff under a total-timeout budget, interceptor
//! `post` hooks on the response. Both facade flavors funnel through here, so
//! behavior differences between transports reduce to the dispatch itself.

use std::time::Duration;

use crate::config::CallShared;
use crate::descriptor::Method;
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::metadata::{encode_routing_value, CallMetadata};
use crate::options::CallOptions;
use crate::retry::{Backoff, RetryPolicy, RetryState};
use crate::transport::{CallContext, Transport};

pub(crate) const ROUTING_HEADER: &str = "x-goog-request-params";
pub(crate) const API_CLIENT_HEADER: &str = "x-goog-api-client";
pub(crate) const API_CLIENT_VALUE: &str = concat!("aiplatform-rust/", env!("CARGO_PKG_VERSION"));

/// Joins non-empty routing params into one `key=value&key=value` header.
fn routing_header(params: Vec<(&'static str, String)>) -> Option<String> {
    let joined: Vec<String> = params
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", encode_routing_value(&value)))
        .collect();
    if joined.is_empty() {
        None
    } else {
        Some(joined.join("&"))
    }
}

/// Prepares the pre-auth metadata for one call: caller entries, interceptor
/// additions, routing pairs, telemetry. Returns the possibly-rewritten
/// request alongside.
fn prepare<M: Method>(
    shared: &CallShared,
    kind: &'static str,
    mut request: M::Request,
    options: &CallOptions,
) -> (M::Request, CallMetadata) {
    let mut metadata = options.metadata.clone();
    shared.interceptors.run_pre::<M>(&mut request, &mut metadata);
    if let Some(value) = routing_header(M::routing_params(&request)) {
        metadata.push(ROUTING_HEADER, value);
    }
    metadata.push(API_CLIENT_HEADER, format!("{API_CLIENT_VALUE} {kind}"));
    (request, metadata)
}

fn effective_policy<M: Method>(shared: &CallShared, options: &CallOptions) -> RetryPolicy {
    options
        .retry
        .clone()
        .or_else(|| shared.retry_override.clone())
        .unwrap_or_else(|| M::DESCRIPTOR.retry.to_policy())
}

pub(crate) async fn invoke<M, T>(
    transport: &T,
    shared: &CallShared,
    request: M::Request,
    options: CallOptions,
) -> Result<M::Response>
where
    M: Method,
    T: Transport,
{
    if let Some(cancel) = &options.cancel {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
    }

    let (request, metadata) = prepare::<M>(shared, transport.kind(), request, &options);
    let policy = effective_policy::<M>(shared, &options);
    let attempt_timeout = options.timeout.unwrap_or(shared.timeout);

    let mut backoff = Backoff::new(&policy);
    let mut state = RetryState::new();
    let started = tokio::time::Instant::now();

    let mut reissued = false;
    loop {
        let mut attempt_metadata = metadata.clone();
        if let Some(credentials) = &shared.credentials {
            for (key, value) in credentials.request_headers().await? {
                attempt_metadata.push(key, value);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = M::DESCRIPTOR.name,
            attempt = state.attempts + 1,
            "dispatching"
        );

        let context = CallContext::new(attempt_metadata.clone(), Some(attempt_timeout));
        let error = match dispatch::<M, T>(
            transport,
            request.clone(),
            context,
            attempt_timeout,
            options.cancel.as_ref(),
        )
        .await
        {
            Ok(mut response) => {
                shared
                    .interceptors
                    .run_post::<M>(&mut response, &mut attempt_metadata);
                return Ok(response);
            }
            Err(error) => error,
        };
        if error.is_cancelled() {
            return Err(error);
        }
        state.record(&error);

        if error.is_auth_failure() && !reissued {
            if let Some(credentials) = &shared.credentials {
                credentials.invalidate().await;
                reissued = true;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    method = M::DESCRIPTOR.name,
                    "auth failure, refreshing credentials"
                );
                continue;
            }
        }

        if !policy.is_retryable(&error) || policy.total_timeout.is_zero() {
            return Err(state.finish(error));
        }
        let delay = backoff.next_delay();
        if started.elapsed() + delay > policy.total_timeout {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                method = M::DESCRIPTOR.name,
                attempts = state.attempts,
                "retry budget exhausted, giving up"
            );
            return Err(state.finish(error));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = M::DESCRIPTOR.name,
            delay_ms = delay.as_millis() as u64,
            "retrying after backoff"
        );
        match &options.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            },
            None => tokio::time::sleep(delay).await,
        }
    }
}

async fn dispatch<M, T>(
    transport: &T,
    request: M::Request,
    context: CallContext,
    timeout: Duration,
    cancel: Option<&tokio_util::sync::CancellationToken>,
) -> Result<M::Response>
where
    M: Method,
    T: Transport,
{
    let attempt = async {
        match tokio::time::timeout(timeout, transport.unary::<M>(request, context)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::new(
                TransportErrorKind::Timeout,
                "attempt deadline exceeded",
            )
            .into()),
        }
    };
    match cancel {
        Some(token) => tokio::select! {
            _ = token.cancelled() => Err(Error::Cancelled),
            result = attempt => result,
        },
        None => attempt.await,
    }
}

#[cfg(feature = "blocking")]
pub(crate) fn invoke_blocking<M, T>(
    transport: &T,
    shared: &CallShared,
    request: M::Request,
    options: CallOptions,
) -> Result<M::Response>
where
    M: Method,
    T: crate::transport::BlockingTransport,
{
    let (request, metadata) = prepare::<M>(shared, transport.kind(), request, &options);
    let policy = effective_policy::<M>(shared, &options);
    let attempt_timeout = options.timeout.unwrap_or(shared.timeout);

    let mut backoff = Backoff::new(&policy);
    let mut state = RetryState::new();
    let started = std::time::Instant::now();

    let mut reissued = false;
    loop {
        let mut attempt_metadata = metadata.clone();
        if let Some(credentials) = &shared.credentials {
            for (key, value) in credentials.request_headers_blocking()? {
                attempt_metadata.push(key, value);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = M::DESCRIPTOR.name,
            attempt = state.attempts + 1,
            "dispatching"
        );

        let context = CallContext::new(attempt_metadata.clone(), Some(attempt_timeout));
        let error = match transport.unary::<M>(request.clone(), context) {
            Ok(mut response) => {
                shared
                    .interceptors
                    .run_post::<M>(&mut response, &mut attempt_metadata);
                return Ok(response);
            }
            Err(error) => error,
        };
        state.record(&error);

        if error.is_auth_failure() && !reissued {
            if let Some(credentials) = &shared.credentials {
                credentials.invalidate_blocking();
                reissued = true;
                continue;
            }
        }

        if !policy.is_retryable(&error) || policy.total_timeout.is_zero() {
            return Err(state.finish(error));
        }
        let delay = backoff.next_delay();
        if started.elapsed() + delay > policy.total_timeout {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                method = M::DESCRIPTOR.name,
                attempts = state.attempts,
                "retry budget exhausted, giving up"
            );
            return Err(state.finish(error));
        }
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credentials;
    use crate::interceptor::Interceptors;
    use crate::methods::GetModel;
    use crate::status::{Code, ServiceError};
    use crate::types::{ApiMessage, Model};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    enum Step {
        Respond(serde_json::Value),
        Fail(Error),
        Hang,
    }

    /// Serves a scripted sequence of outcomes and records each dispatch.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<CallMetadata>>,
    }

    impl ScriptedTransport {
        fn new(script: impl IntoIterator<Item = Step>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<CallMetadata> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn unary<M: Method>(
            &self,
            _request: M::Request,
            context: CallContext,
        ) -> Pin<Box<dyn Future<Output = Result<M::Response>> + Send + '_>> {
            self.calls.lock().unwrap().push(context.metadata);
            let step = self.script.lock().unwrap().pop_front();
            Box::pin(async move {
                match step {
                    Some(Step::Respond(value)) => M::Response::from_json(value),
                    Some(Step::Fail(error)) => Err(error),
                    Some(Step::Hang) => futures_util::future::pending().await,
                    None => Err(Error::config("script exhausted")),
                }
            })
        }
    }

    fn shared() -> CallShared {
        CallShared {
            credentials: Some(Credentials::api_key("k")),
            timeout: Duration::from_secs(60),
            retry_override: None,
            interceptors: Arc::new(Interceptors::new()),
        }
    }

    fn unavailable() -> Error {
        Error::Service(ServiceError::new(Code::Unavailable, "try later"))
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(10),
            multiplier: 1.0,
            total_timeout: Duration::from_secs(5),
            codes: vec![Code::Unavailable],
        }
    }

    fn get_model(name: &str) -> crate::types::GetModelRequest {
        crate::types::GetModelRequest { name: name.into() }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success() {
        let transport = ScriptedTransport::new([
            Step::Fail(unavailable()),
            Step::Fail(unavailable()),
            Step::Respond(json!({"name": "projects/p/locations/l/models/m"})),
        ]);
        let options = CallOptions::new().with_retry(fast_retry());
        let model: Model = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            options,
        )
        .await
        .unwrap();
        assert_eq!(model.name, "projects/p/locations/l/models/m");
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_are_final() {
        let transport = ScriptedTransport::new([Step::Fail(Error::Service(ServiceError::new(
            Code::NotFound,
            "no such model",
        )))]);
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), Some(Code::NotFound));
        assert_eq!(transport.calls().len(), 1);
        match err {
            Error::Service(service) => assert!(service.retries.is_none()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn disabled_retry_stops_after_first_attempt() {
        let transport =
            ScriptedTransport::new([Step::Fail(unavailable()), Step::Fail(unavailable())]);
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new().disable_retry(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), Some(Code::Unavailable));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn budget_bounds_the_delay_sum() {
        let transport = ScriptedTransport::new([
            Step::Fail(unavailable()),
            Step::Fail(unavailable()),
            Step::Fail(unavailable()),
            Step::Fail(unavailable()),
        ]);
        let policy = RetryPolicy {
            total_timeout: Duration::from_millis(25),
            ..fast_retry()
        };
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new().with_retry(policy),
        )
        .await
        .unwrap_err();
        // 10ms delays fit twice inside a 25ms budget.
        assert_eq!(transport.calls().len(), 3);
        match err {
            Error::Service(service) => assert_eq!(service.retries.unwrap().attempts, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_time_out_individually() {
        let transport = ScriptedTransport::new([Step::Hang]);
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new()
                .with_timeout(Duration::from_millis(50))
                .disable_retry(),
        )
        .await
        .unwrap_err();
        match err {
            Error::Transport(transport_err) => {
                assert_eq!(transport_err.kind, TransportErrorKind::Timeout)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn auth_failures_reissue_once() {
        let transport = ScriptedTransport::new([
            Step::Fail(Error::Service(ServiceError::new(
                Code::Unauthenticated,
                "expired",
            ))),
            Step::Fail(Error::Service(ServiceError::new(
                Code::Unauthenticated,
                "expired",
            ))),
            Step::Fail(Error::Service(ServiceError::new(
                Code::Unauthenticated,
                "expired",
            ))),
        ]);
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), Some(Code::Unauthenticated));
        // One reissue after the forced refresh, then the failure is final.
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn cancelled_before_dispatch_never_hits_the_wire() {
        let transport = ScriptedTransport::new([Step::Respond(json!({}))]);
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new().with_cancel(token),
        )
        .await
        .unwrap_err();
        assert!(err.is_cancelled());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn cancellation_interrupts_an_attempt() {
        let transport = ScriptedTransport::new([Step::Hang]);
        let token = tokio_util::sync::CancellationToken::new();
        let aborter = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            aborter.cancel();
        });
        let err = invoke::<GetModel, _>(
            &transport,
            &shared(),
            get_model("projects/p/locations/l/models/m"),
            CallOptions::new().with_cancel(token),
        )
        .await
        .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn routing_follows_the_request_as_dispatched() {
        let transport = ScriptedTransport::new([Step::Respond(json!({}))]);
        let mut interceptors = Interceptors::new();
        interceptors.on_request::<GetModel, _>(|request, _| {
            request.name = "projects/rewritten/locations/l/models/m".into();
        });
        let shared = CallShared {
            interceptors: Arc::new(interceptors),
            ..shared()
        };
        invoke::<GetModel, _>(
            &transport,
            &shared,
            get_model("projects/original/locations/l/models/m"),
            CallOptions::new(),
        )
        .await
        .unwrap();

        let calls = transport.calls();
        assert_eq!(
            calls[0].get(ROUTING_HEADER),
            Some("name=projects/rewritten/locations/l/models/m")
        );
        let client_header = calls[0].get(API_CLIENT_HEADER).unwrap();
        assert!(client_header.starts_with(API_CLIENT_VALUE));
        assert!(client_header.ends_with("custom"));
        assert_eq!(calls[0].get("x-goog-api-key"), Some("k"));
    }
}
