//! The `google.longrunning.Operations` surface.
//!
//! Marker types and descriptors for the five operations RPCs, plus the
//! client the facades expose. Over JSON there is no single binding for an
//! operation: the path depends on the resource the operation belongs to, so
//! each method carries a table of `(name pattern, path template)` rows and
//! picks the first row whose pattern matches the request's name.

use std::sync::Arc;
use std::time::Duration;

use crate::call;
use crate::config::CallShared;
use crate::descriptor::{
    BodySelector, HttpRule, HttpVerb, Method, MethodDescriptor, PagedMethod, ResultKind,
    IDEMPOTENT_RETRY, NO_RETRY,
};
use crate::errors::Result;
use crate::operation::{
    CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, ListOperationsRequest,
    ListOperationsResponse, Operation, WaitOperationRequest,
};
use crate::options::CallOptions;
use crate::pager::ListPager;
use crate::rest::pattern_matches;
use crate::transport::Transport;
use crate::types::{Empty, WireDuration};

type Routes = &'static [(&'static str, &'static str)];

/// Operation-name ancestries this service creates operations under. The
/// location-level row doubles as the fallback.
static GET_ROUTES: Routes = &[
    (
        "projects/*/locations/*/operations/*",
        "/v1/{name=projects/*/locations/*/operations/*}",
    ),
    (
        "projects/*/locations/*/endpoints/*/operations/*",
        "/v1/{name=projects/*/locations/*/endpoints/*/operations/*}",
    ),
    (
        "projects/*/locations/*/models/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/operations/*}",
    ),
    (
        "projects/*/locations/*/models/*/evaluations/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/evaluations/*/operations/*}",
    ),
    (
        "projects/*/locations/*/trainingPipelines/*/operations/*",
        "/v1/{name=projects/*/locations/*/trainingPipelines/*/operations/*}",
    ),
    (
        "projects/*/locations/*/deploymentResourcePools/*/operations/*",
        "/v1/{name=projects/*/locations/*/deploymentResourcePools/*/operations/*}",
    ),
];

static LIST_ROUTES: Routes = &[
    (
        "projects/*/locations/*",
        "/v1/{name=projects/*/locations/*}/operations",
    ),
    (
        "projects/*/locations/*/endpoints/*",
        "/v1/{name=projects/*/locations/*/endpoints/*}/operations",
    ),
    (
        "projects/*/locations/*/models/*",
        "/v1/{name=projects/*/locations/*/models/*}/operations",
    ),
    (
        "projects/*/locations/*/models/*/evaluations/*",
        "/v1/{name=projects/*/locations/*/models/*/evaluations/*}/operations",
    ),
    (
        "projects/*/locations/*/trainingPipelines/*",
        "/v1/{name=projects/*/locations/*/trainingPipelines/*}/operations",
    ),
    (
        "projects/*/locations/*/deploymentResourcePools/*",
        "/v1/{name=projects/*/locations/*/deploymentResourcePools/*}/operations",
    ),
];

static CANCEL_ROUTES: Routes = &[
    (
        "projects/*/locations/*/operations/*",
        "/v1/{name=projects/*/locations/*/operations/*}:cancel",
    ),
    (
        "projects/*/locations/*/endpoints/*/operations/*",
        "/v1/{name=projects/*/locations/*/endpoints/*/operations/*}:cancel",
    ),
    (
        "projects/*/locations/*/models/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/operations/*}:cancel",
    ),
    (
        "projects/*/locations/*/models/*/evaluations/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/evaluations/*/operations/*}:cancel",
    ),
    (
        "projects/*/locations/*/trainingPipelines/*/operations/*",
        "/v1/{name=projects/*/locations/*/trainingPipelines/*/operations/*}:cancel",
    ),
    (
        "projects/*/locations/*/deploymentResourcePools/*/operations/*",
        "/v1/{name=projects/*/locations/*/deploymentResourcePools/*/operations/*}:cancel",
    ),
];

static DELETE_ROUTES: Routes = &[
    (
        "projects/*/locations/*/operations/*",
        "/v1/{name=projects/*/locations/*/operations/*}",
    ),
    (
        "projects/*/locations/*/endpoints/*/operations/*",
        "/v1/{name=projects/*/locations/*/endpoints/*/operations/*}",
    ),
    (
        "projects/*/locations/*/models/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/operations/*}",
    ),
    (
        "projects/*/locations/*/models/*/evaluations/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/evaluations/*/operations/*}",
    ),
    (
        "projects/*/locations/*/trainingPipelines/*/operations/*",
        "/v1/{name=projects/*/locations/*/trainingPipelines/*/operations/*}",
    ),
    (
        "projects/*/locations/*/deploymentResourcePools/*/operations/*",
        "/v1/{name=projects/*/locations/*/deploymentResourcePools/*/operations/*}",
    ),
];

static WAIT_ROUTES: Routes = &[
    (
        "projects/*/locations/*/operations/*",
        "/v1/{name=projects/*/locations/*/operations/*}:wait",
    ),
    (
        "projects/*/locations/*/endpoints/*/operations/*",
        "/v1/{name=projects/*/locations/*/endpoints/*/operations/*}:wait",
    ),
    (
        "projects/*/locations/*/models/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/operations/*}:wait",
    ),
    (
        "projects/*/locations/*/models/*/evaluations/*/operations/*",
        "/v1/{name=projects/*/locations/*/models/*/evaluations/*/operations/*}:wait",
    ),
    (
        "projects/*/locations/*/trainingPipelines/*/operations/*",
        "/v1/{name=projects/*/locations/*/trainingPipelines/*/operations/*}:wait",
    ),
    (
        "projects/*/locations/*/deploymentResourcePools/*/operations/*",
        "/v1/{name=projects/*/locations/*/deploymentResourcePools/*/operations/*}:wait",
    ),
];

fn operation_route(routes: Routes, name: &str, verb: HttpVerb, body: BodySelector) -> HttpRule {
    let template = routes
        .iter()
        .find(|(pattern, _)| pattern_matches(pattern, name))
        .map_or(routes[0].1, |(_, template)| *template);
    HttpRule {
        verb,
        template,
        body,
    }
}

/// `Operations.GetOperation`.
pub struct GetOperation;

impl Method for GetOperation {
    type Request = GetOperationRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetOperation",
        grpc_path: "/google.longrunning.Operations/GetOperation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*/operations/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }

    fn http_rule(request: &Self::Request) -> HttpRule {
        operation_route(GET_ROUTES, &request.name, HttpVerb::Get, BodySelector::None)
    }
}

/// `Operations.ListOperations`.
pub struct ListOperations;

impl Method for ListOperations {
    type Request = ListOperationsRequest;
    type Response = ListOperationsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListOperations",
        grpc_path: "/google.longrunning.Operations/ListOperations",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*}/operations",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }

    fn http_rule(request: &Self::Request) -> HttpRule {
        operation_route(LIST_ROUTES, &request.name, HttpVerb::Get, BodySelector::None)
    }
}

impl PagedMethod for ListOperations {
    type Item = Operation;

    fn into_items(response: Self::Response) -> Vec<Operation> {
        response.operations
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

/// `Operations.CancelOperation`.
pub struct CancelOperation;

impl Method for CancelOperation {
    type Request = CancelOperationRequest;
    type Response = Empty;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "CancelOperation",
        grpc_path: "/google.longrunning.Operations/CancelOperation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{name=projects/*/locations/*/operations/*}:cancel",
            body: BodySelector::None,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }

    fn http_rule(request: &Self::Request) -> HttpRule {
        operation_route(
            CANCEL_ROUTES,
            &request.name,
            HttpVerb::Post,
            BodySelector::None,
        )
    }
}

/// `Operations.DeleteOperation`.
pub struct DeleteOperation;

impl Method for DeleteOperation {
    type Request = DeleteOperationRequest;
    type Response = Empty;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "DeleteOperation",
        grpc_path: "/google.longrunning.Operations/DeleteOperation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Delete,
            template: "/v1/{name=projects/*/locations/*/operations/*}",
            body: BodySelector::None,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }

    fn http_rule(request: &Self::Request) -> HttpRule {
        operation_route(
            DELETE_ROUTES,
            &request.name,
            HttpVerb::Delete,
            BodySelector::None,
        )
    }
}

/// `Operations.WaitOperation`.
pub struct WaitOperation;

impl Method for WaitOperation {
    type Request = WaitOperationRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "WaitOperation",
        grpc_path: "/google.longrunning.Operations/WaitOperation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{name=projects/*/locations/*/operations/*}:wait",
            body: BodySelector::None,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }

    fn http_rule(request: &Self::Request) -> HttpRule {
        operation_route(
            WAIT_ROUTES,
            &request.name,
            HttpVerb::Post,
            BodySelector::None,
        )
    }
}

/// Client for the operations surface, dispatching through the same
/// transport as the facade that created it.
pub struct OperationsClient<T> {
    transport: Arc<T>,
    shared: CallShared,
}

impl<T> Clone for OperationsClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T> std::fmt::Debug for OperationsClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationsClient").finish_non_exhaustive()
    }
}

impl<T: Transport> OperationsClient<T> {
    pub(crate) fn new(transport: Arc<T>, shared: CallShared) -> Self {
        Self { transport, shared }
    }

    /// Fetches the current state of a long-running operation.
    pub async fn get_operation(
        &self,
        name: impl Into<String>,
        options: CallOptions,
    ) -> Result<Operation> {
        let request = GetOperationRequest { name: name.into() };
        call::invoke::<GetOperation, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
    }

    /// Lists operations under a parent resource.
    pub async fn list_operations(
        &self,
        request: ListOperationsRequest,
        options: CallOptions,
    ) -> Result<ListPager<ListOperations, T>> {
        ListPager::start(
            self.transport.clone(),
            self.shared.clone(),
            request,
            options,
        )
        .await
    }

    /// Asks the server to cancel an operation. Cancellation is best-effort;
    /// poll the operation to observe the outcome.
    pub async fn cancel_operation(
        &self,
        name: impl Into<String>,
        options: CallOptions,
    ) -> Result<()> {
        let request = CancelOperationRequest { name: name.into() };
        call::invoke::<CancelOperation, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
            .map(|_: Empty| ())
    }

    /// Removes a finished operation from the server's books.
    pub async fn delete_operation(
        &self,
        name: impl Into<String>,
        options: CallOptions,
    ) -> Result<()> {
        let request = DeleteOperationRequest { name: name.into() };
        call::invoke::<DeleteOperation, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
            .map(|_: Empty| ())
    }

    /// Waits server-side until the operation finishes or `timeout` elapses,
    /// returning the latest state either way.
    pub async fn wait_operation(
        &self,
        name: impl Into<String>,
        timeout: Option<Duration>,
        options: CallOptions,
    ) -> Result<Operation> {
        let request = WaitOperationRequest {
            name: name.into(),
            timeout: timeout.map(WireDuration::from),
        };
        call::invoke::<WaitOperation, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
    }

    pub(crate) fn transport(&self) -> &Arc<T> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_follow_operation_ancestry() {
        let request = GetOperationRequest {
            name: "projects/p/locations/l/models/m/operations/123".into(),
        };
        let rule = GetOperation::http_rule(&request);
        assert_eq!(
            rule.template,
            "/v1/{name=projects/*/locations/*/models/*/operations/*}"
        );

        let request = GetOperationRequest {
            name: "projects/p/locations/l/deploymentResourcePools/d/operations/9".into(),
        };
        let rule = GetOperation::http_rule(&request);
        assert_eq!(
            rule.template,
            "/v1/{name=projects/*/locations/*/deploymentResourcePools/*/operations/*}"
        );
    }

    #[test]
    fn unmatched_names_fall_back_to_the_first_row() {
        let request = GetOperationRequest {
            name: "wholly/unexpected".into(),
        };
        let rule = GetOperation::http_rule(&request);
        assert_eq!(rule.template, GET_ROUTES[0].1);
    }

    #[test]
    fn list_routes_on_the_parent() {
        let request = ListOperationsRequest {
            name: "projects/p/locations/l/models/m".into(),
            ..Default::default()
        };
        let rule = ListOperations::http_rule(&request);
        assert_eq!(
            rule.template,
            "/v1/{name=projects/*/locations/*/models/*}/operations"
        );
    }

    #[test]
    fn cancel_and_wait_use_post_verbs() {
        let request = CancelOperationRequest {
            name: "projects/p/locations/l/operations/1".into(),
        };
        let rule = CancelOperation::http_rule(&request);
        assert_eq!(rule.verb, HttpVerb::Post);
        assert!(rule.template.ends_with(":cancel"));
        assert_eq!(rule.body, BodySelector::None);

        let request = WaitOperationRequest {
            name: "projects/p/locations/l/operations/1".into(),
            timeout: None,
        };
        let rule = WaitOperation::http_rule(&request);
        assert!(rule.template.ends_with(":wait"));
    }

    #[test]
    fn descriptors_name_the_longrunning_service() {
        for path in [
            GetOperation::DESCRIPTOR.grpc_path,
            ListOperations::DESCRIPTOR.grpc_path,
            CancelOperation::DESCRIPTOR.grpc_path,
            DeleteOperation::DESCRIPTOR.grpc_path,
            WaitOperation::DESCRIPTOR.grpc_path,
        ] {
            assert!(path.starts_with("/google.longrunning.Operations/"));
        }
    }
}
