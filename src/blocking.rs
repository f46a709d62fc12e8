//! Thread-blocking clients, mirroring the async surface method for method.
//!
//! The JSON flavor drives `reqwest::blocking` directly; the binary flavor
//! wraps the async channel in a private current-thread runtime, so a
//! blocking client must not be used from inside an async runtime. Backoff
//! and operation polling sleep the calling thread; there is no cancellation
//! token on this surface.
//!
//! ```ignore
//! let client = BlockingModelServiceClient::rest(ClientOptions::new())?;
//! for model in client.list_models("projects/p/locations/l", CallOptions::new())? {
//!     println!("{}", model?.name);
//! }
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::call;
use crate::config::{CallShared, ClientOptions, ResolvedConfig};
use crate::deployment_pool::{
    CreateDeploymentResourcePoolArgs, DeleteDeploymentResourcePoolArgs,
    GetDeploymentResourcePoolArgs, ListDeploymentResourcePoolsArgs, QueryDeployedModelsArgs,
    UpdateDeploymentResourcePoolArgs,
};
use crate::descriptor::{HttpVerb, Method};
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::grpc::GrpcTransport;
use crate::lro::BlockingOperationFuture;
use crate::methods::{
    CreateDeploymentResourcePool, DeleteDeploymentResourcePool, DeleteModel, Deploy, ExportModel,
    GetDeploymentResourcePool, GetModel, GetModelEvaluation, GetModelEvaluationSlice,
    GetPublisherModel, ImportModelEvaluation, ListDeploymentResourcePools, ListModels,
    ListModelEvaluationSlices, ListModelEvaluations, ListPublisherModels, QueryDeployedModels,
    UpdateDeploymentResourcePool, UpdateModel, UploadModel,
};
use crate::model_garden::{GetPublisherModelArgs, ListPublisherModelsArgs};
use crate::model_service::{
    DeleteModelArgs, ExportModelArgs, GetModelArgs, GetModelEvaluationArgs,
    GetModelEvaluationSliceArgs, ImportModelEvaluationArgs, ListModelEvaluationSlicesArgs,
    ListModelEvaluationsArgs, ListModelsArgs, UpdateModelArgs, UploadModelArgs,
};
use crate::operation::{
    CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, ListOperationsRequest,
    Operation, WaitOperationRequest,
};
use crate::operations::{
    CancelOperation, DeleteOperation, GetOperation, ListOperations, WaitOperation,
};
use crate::options::CallOptions;
use crate::pager::BlockingListPager;
use crate::rest::{header_map, request_error, RenderedCall};
use crate::status::service_error_from_http;
use crate::transport::{BlockingTransport, CallContext};
use crate::types::*;

/// REST transport; the thread-blocking half of the JSON pair.
pub struct BlockingRestTransport {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BlockingRestTransport {
    pub(crate) fn from_config(config: &ResolvedConfig) -> Result<Self> {
        if config.http_client.is_some() {
            return Err(Error::config(
                "custom HTTP clients are not supported by the blocking transport",
            ));
        }
        let mut builder = reqwest::blocking::Client::builder();
        if config.use_client_cert {
            if let Some(source) = config.credentials.certificate_source() {
                let identity = source.client_identity()?;
                let mut pem = identity.cert_pem;
                pem.extend_from_slice(&identity.key_pem);
                let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                    TransportError::new(TransportErrorKind::Tls, "invalid client certificate")
                        .with_source(e)
                })?;
                builder = builder.identity(identity);
            }
        }
        let http = builder.build().map_err(|e| {
            TransportError::new(TransportErrorKind::Other, "cannot build HTTP client")
                .with_source(e)
        })?;
        Ok(Self {
            http,
            base_url: config.endpoint.url(),
        })
    }

    fn dispatch<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> Result<M::Response> {
        let rule = M::http_rule(&request);
        let json = request.to_json()?;
        let plan = RenderedCall::render(&rule, &json)?;

        let verb = match rule.verb {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Post => reqwest::Method::POST,
            HttpVerb::Patch => reqwest::Method::PATCH,
            HttpVerb::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}{}", self.base_url, plan.path);
        let mut builder = self.http.request(verb, url);
        if !plan.query.is_empty() {
            builder = builder.query(&plan.query);
        }
        if let Some(body) = plan.body {
            builder = builder.json(&body);
        }
        builder = builder.headers(header_map(&context.metadata)?);
        if let Some(timeout) = context.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(request_error)?;
        let status = response.status();
        let bytes = response.bytes().map_err(request_error)?;
        if !status.is_success() {
            return Err(service_error_from_http(status.as_u16(), &bytes).into());
        }
        let value = if bytes.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_slice(&bytes)?
        };
        M::Response::from_json(value)
    }
}

impl BlockingTransport for BlockingRestTransport {
    fn unary<M: Method>(&self, request: M::Request, context: CallContext) -> Result<M::Response> {
        self.dispatch::<M>(request, context)
    }

    fn kind(&self) -> &'static str {
        "rest-blocking"
    }
}

impl std::fmt::Debug for BlockingRestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingRestTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// gRPC transport driven synchronously through a private current-thread
/// runtime.
pub struct BlockingGrpcTransport {
    runtime: tokio::runtime::Runtime,
    inner: GrpcTransport,
}

impl BlockingGrpcTransport {
    pub(crate) fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                TransportError::new(TransportErrorKind::Other, "cannot start dispatch runtime")
                    .with_source(e)
            })?;
        Ok(Self {
            runtime,
            inner: GrpcTransport::from_config(config)?,
        })
    }
}

impl BlockingTransport for BlockingGrpcTransport {
    fn unary<M: Method>(&self, request: M::Request, context: CallContext) -> Result<M::Response> {
        use crate::transport::Transport;
        self.runtime
            .block_on(self.inner.unary::<M>(request, context))
    }

    fn kind(&self) -> &'static str {
        "grpc-blocking"
    }
}

impl std::fmt::Debug for BlockingGrpcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingGrpcTransport").finish_non_exhaustive()
    }
}

/// Blocking mirror of [`OperationsClient`](crate::OperationsClient).
pub struct BlockingOperationsClient<T> {
    transport: Arc<T>,
    shared: CallShared,
}

impl<T> Clone for BlockingOperationsClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T> std::fmt::Debug for BlockingOperationsClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingOperationsClient")
            .finish_non_exhaustive()
    }
}

impl<T: BlockingTransport> BlockingOperationsClient<T> {
    pub(crate) fn new(transport: Arc<T>, shared: CallShared) -> Self {
        Self { transport, shared }
    }

    pub fn get_operation(
        &self,
        name: impl Into<String>,
        options: CallOptions,
    ) -> Result<Operation> {
        let request = GetOperationRequest { name: name.into() };
        call::invoke_blocking::<GetOperation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_operations(
        &self,
        request: ListOperationsRequest,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListOperations, T>> {
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }

    /// Asks the server to cancel an operation. Cancellation is best-effort;
    /// poll the operation to observe the outcome.
    pub fn cancel_operation(&self, name: impl Into<String>, options: CallOptions) -> Result<()> {
        let request = CancelOperationRequest { name: name.into() };
        call::invoke_blocking::<CancelOperation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .map(|_: Empty| ())
    }

    pub fn delete_operation(&self, name: impl Into<String>, options: CallOptions) -> Result<()> {
        let request = DeleteOperationRequest { name: name.into() };
        call::invoke_blocking::<DeleteOperation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .map(|_: Empty| ())
    }

    /// Waits server-side until the operation finishes or `timeout` elapses,
    /// returning the latest state either way.
    pub fn wait_operation(
        &self,
        name: impl Into<String>,
        timeout: Option<std::time::Duration>,
        options: CallOptions,
    ) -> Result<Operation> {
        let request = WaitOperationRequest {
            name: name.into(),
            timeout: timeout.map(WireDuration::from),
        };
        call::invoke_blocking::<WaitOperation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }
}

macro_rules! blocking_client_common {
    ($client:ident) => {
        impl $client<BlockingGrpcTransport> {
            /// Builds a client over the binary transport.
            pub fn grpc(options: ClientOptions) -> Result<Self> {
                let config = options.resolve()?;
                let transport = BlockingGrpcTransport::from_config(&config)?;
                Ok(Self::from_parts(
                    Arc::new(transport),
                    config.into_call_shared(),
                ))
            }
        }

        impl $client<BlockingRestTransport> {
            /// Builds a client over the JSON transport.
            pub fn rest(options: ClientOptions) -> Result<Self> {
                let config = options.resolve()?;
                let transport = BlockingRestTransport::from_config(&config)?;
                Ok(Self::from_parts(
                    Arc::new(transport),
                    config.into_call_shared(),
                ))
            }
        }

        impl<T: BlockingTransport> $client<T> {
            /// Adopts a fully-constructed transport. Options that would
            /// steer transport construction (endpoint, credentials, scopes)
            /// are rejected.
            pub fn from_transport(transport: T, options: ClientOptions) -> Result<Self> {
                Ok(Self::from_parts(
                    Arc::new(transport),
                    options.into_adopted()?,
                ))
            }

            fn from_parts(transport: Arc<T>, shared: CallShared) -> Self {
                let operations = BlockingOperationsClient::new(transport.clone(), shared.clone());
                Self {
                    transport,
                    shared,
                    operations,
                }
            }

            pub fn operations(&self) -> &BlockingOperationsClient<T> {
                &self.operations
            }
        }

        impl<T> Clone for $client<T> {
            fn clone(&self) -> Self {
                Self {
                    transport: self.transport.clone(),
                    shared: self.shared.clone(),
                    operations: self.operations.clone(),
                }
            }
        }

        impl<T> std::fmt::Debug for $client<T> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($client)).finish_non_exhaustive()
            }
        }
    };
}

/// Blocking client for `google.cloud.aiplatform.v1.ModelService`.
pub struct BlockingModelServiceClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: BlockingOperationsClient<T>,
}

blocking_client_common!(BlockingModelServiceClient);

impl<T: BlockingTransport> BlockingModelServiceClient<T> {
    pub fn upload_model(
        &self,
        args: impl Into<UploadModelArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<UploadModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<UploadModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn get_model(&self, args: impl Into<GetModelArgs>, options: CallOptions) -> Result<Model> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<GetModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_models(
        &self,
        args: impl Into<ListModelsArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListModels, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }

    pub fn update_model(
        &self,
        args: impl Into<UpdateModelArgs>,
        options: CallOptions,
    ) -> Result<Model> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<UpdateModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn delete_model(
        &self,
        args: impl Into<DeleteModelArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<DeleteModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<DeleteModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn export_model(
        &self,
        args: impl Into<ExportModelArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<ExportModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<ExportModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn import_model_evaluation(
        &self,
        args: impl Into<ImportModelEvaluationArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluation> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<ImportModelEvaluation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn get_model_evaluation(
        &self,
        args: impl Into<GetModelEvaluationArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluation> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<GetModelEvaluation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_model_evaluations(
        &self,
        args: impl Into<ListModelEvaluationsArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListModelEvaluations, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }

    pub fn get_model_evaluation_slice(
        &self,
        args: impl Into<GetModelEvaluationSliceArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluationSlice> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<GetModelEvaluationSlice, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_model_evaluation_slices(
        &self,
        args: impl Into<ListModelEvaluationSlicesArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListModelEvaluationSlices, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }
}

/// Blocking client for `google.cloud.aiplatform.v1.ModelGardenService`.
pub struct BlockingModelGardenClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: BlockingOperationsClient<T>,
}

blocking_client_common!(BlockingModelGardenClient);

impl<T: BlockingTransport> BlockingModelGardenClient<T> {
    pub fn get_publisher_model(
        &self,
        args: impl Into<GetPublisherModelArgs>,
        options: CallOptions,
    ) -> Result<PublisherModel> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<GetPublisherModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_publisher_models(
        &self,
        args: impl Into<ListPublisherModelsArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListPublisherModels, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }

    pub fn deploy(
        &self,
        request: DeployRequest,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<Deploy, T>> {
        let operation = call::invoke_blocking::<Deploy, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }
}

/// Blocking client for
/// `google.cloud.aiplatform.v1.DeploymentResourcePoolService`.
pub struct BlockingDeploymentResourcePoolClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: BlockingOperationsClient<T>,
}

blocking_client_common!(BlockingDeploymentResourcePoolClient);

impl<T: BlockingTransport> BlockingDeploymentResourcePoolClient<T> {
    pub fn create_deployment_resource_pool(
        &self,
        args: impl Into<CreateDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<CreateDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<CreateDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn get_deployment_resource_pool(
        &self,
        args: impl Into<GetDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<DeploymentResourcePool> {
        let request = args.into().into_request()?;
        call::invoke_blocking::<GetDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
    }

    pub fn list_deployment_resource_pools(
        &self,
        args: impl Into<ListDeploymentResourcePoolsArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<ListDeploymentResourcePools, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }

    pub fn update_deployment_resource_pool(
        &self,
        args: impl Into<UpdateDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<UpdateDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<UpdateDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn delete_deployment_resource_pool(
        &self,
        args: impl Into<DeleteDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<BlockingOperationFuture<DeleteDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke_blocking::<DeleteDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )?;
        BlockingOperationFuture::new(operation, self.operations.clone(), options)
    }

    pub fn query_deployed_models(
        &self,
        args: impl Into<QueryDeployedModelsArgs>,
        options: CallOptions,
    ) -> Result<BlockingListPager<QueryDeployedModels, T>> {
        let request = args.into().into_request()?;
        BlockingListPager::start(self.transport.clone(), self.shared.clone(), request, options)
    }
}
