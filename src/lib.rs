//! Rust client for the AI Platform model-management APIs.
//!
//! Three service facades (`ModelService`, `ModelGardenService`,
//! `DeploymentResourcePoolService`) over interchangeable transports: gRPC or
//! REST, each in an async and a blocking flavor. Every call runs through one
//! pipeline with routing headers, credential refresh, retry with backoff and
//! interceptors; mutations return long-running [`OperationFuture`]s and list
//! calls return auto-paginating [`ListPager`]s.
//!
//! ```ignore
//! use aiplatform::{CallOptions, ClientOptions, ModelServiceClient};
//!
//! let client = ModelServiceClient::rest(ClientOptions::new())?;
//! let mut models = client
//!     .list_models("projects/p/locations/us-central1", CallOptions::new())
//!     .await?;
//! while let Some(model) = models.next().await {
//!     println!("{}", model?.name);
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
// Allow large error types - boxing ServiceError would be a breaking change
#![allow(clippy::result_large_err)]

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;
mod call;
mod config;
mod credentials;
mod deployment_pool;
mod descriptor;
mod endpoint;
mod errors;
mod grpc;
mod interceptor;
mod lro;
mod metadata;
pub mod methods;
mod model_garden;
mod model_service;
mod operation;
mod operations;
mod options;
mod pager;
mod resource_names;
mod rest;
mod retry;
mod status;
pub mod testing;
mod transport;
pub mod types;

pub use config::{ClientOptions, DEFAULT_REQUEST_TIMEOUT};
pub use credentials::{
    AccessToken, ClientCertificateSource, ClientIdentity, Credentials, MetadataTokenProvider,
    ServiceAccountKey, ServiceAccountTokenProvider, StaticCertificateSource, TokenProvider,
    APPLICATION_CREDENTIALS_ENV, DEFAULT_SCOPES,
};
pub use deployment_pool::{
    CreateDeploymentResourcePoolArgs, DeleteDeploymentResourcePoolArgs,
    DeploymentResourcePoolClient, GetDeploymentResourcePoolArgs, ListDeploymentResourcePoolsArgs,
    QueryDeployedModelsArgs, UpdateDeploymentResourcePoolArgs,
};
pub use descriptor::{
    BodySelector, HttpRule, HttpVerb, LroMethod, Method, MethodDescriptor, PagedMethod,
    ResultKind, RetryDefaults,
};
pub use endpoint::{
    Endpoint, Scheme, DEFAULT_ENDPOINT, DEFAULT_MTLS_ENDPOINT, USE_CLIENT_CERTIFICATE_ENV,
    USE_MTLS_ENDPOINT_ENV,
};
pub use errors::{
    AuthError, BoxError, Error, Result, RetryMetadata, TransportError, TransportErrorKind,
    ValidationError,
};
pub use grpc::GrpcTransport;
pub use interceptor::Interceptors;
pub use lro::OperationFuture;
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub use lro::BlockingOperationFuture;
pub use metadata::{CallMetadata, MetadataEntry};
pub use model_garden::{GetPublisherModelArgs, ListPublisherModelsArgs, ModelGardenClient};
pub use model_service::{
    DeleteModelArgs, ExportModelArgs, GetModelArgs, GetModelEvaluationArgs,
    GetModelEvaluationSliceArgs, ImportModelEvaluationArgs, ListModelEvaluationSlicesArgs,
    ListModelEvaluationsArgs, ListModelsArgs, ModelServiceClient, UpdateModelArgs,
    UploadModelArgs,
};
pub use operation::{
    CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, ListOperationsRequest,
    ListOperationsResponse, Operation, Outcome, Payload, WaitOperationRequest,
};
pub use operations::OperationsClient;
pub use options::CallOptions;
pub use pager::ListPager;
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub use pager::BlockingListPager;
pub use resource_names::{
    BillingAccountName, DeploymentResourcePoolName, EndpointName, EvaluationName, FolderName,
    LocationName, ModelName, OrganizationName, ProjectName, PublisherModelName, SliceName,
    TrainingPipelineName,
};
pub use rest::RestTransport;
pub use retry::{RetryPolicy, DEFAULT_RETRY_CODES};
pub use status::{Code, ServiceError};
pub use transport::{
    CallContext, Transport, TransportKind, WireFormat, TRANSPORT_REGISTRY,
};
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub use transport::BlockingTransport;
pub use types::*;
