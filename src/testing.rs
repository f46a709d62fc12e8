//! In-memory transports for testing code built on this crate.
//!
//! A stub transport serves a scripted queue of JSON responses or service
//! errors and records every dispatch (method name, request as JSON, call
//! metadata), so tests can assert on both sides of the pipeline without a
//! network.
//!
//! ```ignore
//! let stub = StubTransport::new()
//!     .respond(json!({"name": "projects/p/locations/l/models/m"}));
//! let client = ModelServiceClient::from_transport(stub.clone(), ClientOptions::new())?;
//! let model = client.get_model("projects/p/locations/l/models/m", CallOptions::new()).await?;
//! assert_eq!(stub.calls()[0].method, "GetModel");
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::descriptor::Method;
use crate::errors::{Error, Result};
use crate::metadata::CallMetadata;
use crate::status::ServiceError;
use crate::transport::{CallContext, Transport};
use crate::types::ApiMessage;

/// One dispatch observed by a stub transport.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Short method name from the descriptor, e.g. `GetModel`.
    pub method: &'static str,
    /// Request message in its JSON form.
    pub request: Value,
    /// Call metadata as the pipeline dispatched it, routing and auth
    /// headers included.
    pub metadata: CallMetadata,
}

enum Canned {
    Respond(Value),
    Fail(ServiceError),
}

struct StubState {
    script: Mutex<VecDeque<Canned>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubState {
    fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, canned: Canned) {
        self.script.lock().unwrap().push_back(canned);
    }

    fn serve<M: Method>(&self, request: M::Request, context: CallContext) -> Result<M::Response> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: M::DESCRIPTOR.name,
            request: request.to_json()?,
            metadata: context.metadata,
        });
        match self.script.lock().unwrap().pop_front() {
            Some(Canned::Respond(value)) => M::Response::from_json(value),
            Some(Canned::Fail(error)) => Err(error.into()),
            None => Err(Error::config(format!(
                "no scripted response left for {}",
                M::DESCRIPTOR.name
            ))),
        }
    }

    fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// Scripted async transport.
#[derive(Clone)]
pub struct StubTransport {
    state: Arc<StubState>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StubState::new()),
        }
    }

    /// Queues a JSON response for the next unserved dispatch.
    pub fn respond(self, response: Value) -> Self {
        self.state.push(Canned::Respond(response));
        self
    }

    /// Queues a service error for the next unserved dispatch.
    pub fn fail(self, error: ServiceError) -> Self {
        self.state.push(Canned::Fail(error));
        self
    }

    /// Every dispatch served so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls()
    }
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for StubTransport {
    fn unary<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<M::Response>> + Send + '_>> {
        let result = self.state.serve::<M>(request, context);
        Box::pin(async move { result })
    }
}

impl std::fmt::Debug for StubTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubTransport")
            .field("calls", &self.state.calls.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

/// Scripted blocking transport.
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
#[derive(Clone)]
pub struct BlockingStubTransport {
    state: Arc<StubState>,
}

#[cfg(feature = "blocking")]
impl BlockingStubTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StubState::new()),
        }
    }

    pub fn respond(self, response: Value) -> Self {
        self.state.push(Canned::Respond(response));
        self
    }

    pub fn fail(self, error: ServiceError) -> Self {
        self.state.push(Canned::Fail(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls()
    }
}

#[cfg(feature = "blocking")]
impl Default for BlockingStubTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "blocking")]
impl crate::transport::BlockingTransport for BlockingStubTransport {
    fn unary<M: Method>(&self, request: M::Request, context: CallContext) -> Result<M::Response> {
        self.state.serve::<M>(request, context)
    }
}

#[cfg(feature = "blocking")]
impl std::fmt::Debug for BlockingStubTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingStubTransport")
            .field("calls", &self.state.calls.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::GetModel;
    use crate::status::Code;
    use crate::types::GetModelRequest;
    use serde_json::json;

    #[tokio::test]
    async fn serves_the_script_in_order() {
        let stub = StubTransport::new()
            .respond(json!({"name": "projects/p/locations/l/models/m"}))
            .fail(ServiceError::new(Code::NotFound, "gone"));

        let request = GetModelRequest {
            name: "projects/p/locations/l/models/m".into(),
        };
        let model = stub
            .unary::<GetModel>(request.clone(), CallContext::default())
            .await
            .unwrap();
        assert_eq!(model.name, "projects/p/locations/l/models/m");

        let err = stub
            .unary::<GetModel>(request.clone(), CallContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(Code::NotFound));

        // Past the script, dispatches fail loudly rather than hang.
        assert!(stub
            .unary::<GetModel>(request, CallContext::default())
            .await
            .is_err());

        let calls = stub.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|call| call.method == "GetModel"));
        assert_eq!(calls[0].request["name"], "projects/p/locations/l/models/m");
    }
}
