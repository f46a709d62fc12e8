//! The ModelGarden facade: publisher-model catalog reads and one-click
//! deployment.
//!
//! Catalog entries live outside the project hierarchy under
//! `publishers/{publisher}/models/{model}`; `deploy` stamps one of them into
//! a caller-owned location and returns a long-running operation that
//! resolves to the created endpoint.

use std::sync::Arc;

use crate::call;
use crate::config::{CallShared, ClientOptions};
use crate::errors::Result;
use crate::grpc::GrpcTransport;
use crate::lro::OperationFuture;
use crate::methods::{Deploy, GetPublisherModel, ListPublisherModels};
use crate::model_service::exclusive_args_error;
use crate::operations::OperationsClient;
use crate::options::CallOptions;
use crate::pager::ListPager;
use crate::resource_names::PublisherModelName;
use crate::rest::RestTransport;
use crate::transport::Transport;
use crate::types::*;

/// Arguments for [`ModelGardenClient::get_publisher_model`]. Flattened:
/// `name`.
#[derive(Debug, Clone, Default)]
pub struct GetPublisherModelArgs {
    pub request: Option<GetPublisherModelRequest>,
    pub name: Option<String>,
}

impl GetPublisherModelArgs {
    pub(crate) fn into_request(self) -> Result<GetPublisherModelRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("get_publisher_model"));
            }
            return Ok(request);
        }
        Ok(GetPublisherModelRequest {
            name: self.name.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<GetPublisherModelRequest> for GetPublisherModelArgs {
    fn from(request: GetPublisherModelRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for GetPublisherModelArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<String> for GetPublisherModelArgs {
    fn from(name: String) -> Self {
        Self {
            request: None,
            name: Some(name),
        }
    }
}

impl From<PublisherModelName> for GetPublisherModelArgs {
    fn from(name: PublisherModelName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`ModelGardenClient::list_publisher_models`]. Flattened:
/// `parent`.
#[derive(Debug, Clone, Default)]
pub struct ListPublisherModelsArgs {
    pub request: Option<ListPublisherModelsRequest>,
    pub parent: Option<String>,
}

impl ListPublisherModelsArgs {
    pub(crate) fn into_request(self) -> Result<ListPublisherModelsRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() {
                return Err(exclusive_args_error("list_publisher_models"));
            }
            return Ok(request);
        }
        Ok(ListPublisherModelsRequest {
            parent: self.parent.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<ListPublisherModelsRequest> for ListPublisherModelsArgs {
    fn from(request: ListPublisherModelsRequest) -> Self {
        Self {
            request: Some(request),
            parent: None,
        }
    }
}

impl From<&str> for ListPublisherModelsArgs {
    fn from(parent: &str) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

/// Async client for `google.cloud.aiplatform.v1.ModelGardenService`.
pub struct ModelGardenClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: OperationsClient<T>,
}

impl<T> Clone for ModelGardenClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            shared: self.shared.clone(),
            operations: self.operations.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ModelGardenClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGardenClient").finish_non_exhaustive()
    }
}

impl ModelGardenClient<GrpcTransport> {
    pub fn grpc(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = GrpcTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl ModelGardenClient<RestTransport> {
    pub fn rest(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = RestTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl<T: Transport> ModelGardenClient<T> {
    /// Adopts a fully-constructed transport. Options that would steer
    /// transport construction (endpoint, credentials, scopes) are rejected.
    pub fn from_transport(transport: T, options: ClientOptions) -> Result<Self> {
        Ok(Self::from_parts(
            Arc::new(transport),
            options.into_adopted()?,
        ))
    }

    fn from_parts(transport: Arc<T>, shared: CallShared) -> Self {
        let operations = OperationsClient::new(transport.clone(), shared.clone());
        Self {
            transport,
            shared,
            operations,
        }
    }

    pub fn operations(&self) -> &OperationsClient<T> {
        &self.operations
    }

    pub async fn get_publisher_model(
        &self,
        args: impl Into<GetPublisherModelArgs>,
        options: CallOptions,
    ) -> Result<PublisherModel> {
        let request = args.into().into_request()?;
        call::invoke::<GetPublisherModel, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
    }

    pub async fn list_publisher_models(
        &self,
        args: impl Into<ListPublisherModelsArgs>,
        options: CallOptions,
    ) -> Result<ListPager<ListPublisherModels, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }

    /// Deploys a publisher model into a project location. Long-running;
    /// resolves to the endpoint and model created by the deployment.
    pub async fn deploy(
        &self,
        request: DeployRequest,
        options: CallOptions,
    ) -> Result<OperationFuture<Deploy, T>> {
        let operation = call::invoke::<Deploy, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }
}
