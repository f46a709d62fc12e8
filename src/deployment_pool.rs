//! The DeploymentResourcePool facade: shared serving-capacity pools.
//!
//! Pools are created, mutated, and deleted through long-running operations;
//! `query_deployed_models` pages over the deployed models currently drawing
//! on a pool's capacity.

use std::sync::Arc;

use crate::call;
use crate::config::{CallShared, ClientOptions};
use crate::errors::Result;
use crate::grpc::GrpcTransport;
use crate::lro::OperationFuture;
use crate::methods::{
    CreateDeploymentResourcePool, DeleteDeploymentResourcePool, GetDeploymentResourcePool,
    ListDeploymentResourcePools, QueryDeployedModels, UpdateDeploymentResourcePool,
};
use crate::model_service::exclusive_args_error;
use crate::operations::OperationsClient;
use crate::options::CallOptions;
use crate::pager::ListPager;
use crate::resource_names::{DeploymentResourcePoolName, LocationName};
use crate::rest::RestTransport;
use crate::transport::Transport;
use crate::types::*;

/// Arguments for [`DeploymentResourcePoolClient::create_deployment_resource_pool`].
///
/// Flattened fields: `parent`, `deployment_resource_pool`,
/// `deployment_resource_pool_id`.
#[derive(Debug, Clone, Default)]
pub struct CreateDeploymentResourcePoolArgs {
    pub request: Option<CreateDeploymentResourcePoolRequest>,
    pub parent: Option<String>,
    pub deployment_resource_pool: Option<DeploymentResourcePool>,
    pub deployment_resource_pool_id: Option<String>,
}

impl CreateDeploymentResourcePoolArgs {
    pub fn new(
        parent: impl Into<String>,
        deployment_resource_pool: DeploymentResourcePool,
        deployment_resource_pool_id: impl Into<String>,
    ) -> Self {
        Self {
            request: None,
            parent: Some(parent.into()),
            deployment_resource_pool: Some(deployment_resource_pool),
            deployment_resource_pool_id: Some(deployment_resource_pool_id.into()),
        }
    }

    pub(crate) fn into_request(self) -> Result<CreateDeploymentResourcePoolRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some()
                || self.deployment_resource_pool.is_some()
                || self.deployment_resource_pool_id.is_some()
            {
                return Err(exclusive_args_error("create_deployment_resource_pool"));
            }
            return Ok(request);
        }
        Ok(CreateDeploymentResourcePoolRequest {
            parent: self.parent.unwrap_or_default(),
            deployment_resource_pool: self.deployment_resource_pool,
            deployment_resource_pool_id: self.deployment_resource_pool_id.unwrap_or_default(),
        })
    }
}

impl From<CreateDeploymentResourcePoolRequest> for CreateDeploymentResourcePoolArgs {
    fn from(request: CreateDeploymentResourcePoolRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`DeploymentResourcePoolClient::get_deployment_resource_pool`].
/// Flattened: `name`.
#[derive(Debug, Clone, Default)]
pub struct GetDeploymentResourcePoolArgs {
    pub request: Option<GetDeploymentResourcePoolRequest>,
    pub name: Option<String>,
}

impl GetDeploymentResourcePoolArgs {
    pub(crate) fn into_request(self) -> Result<GetDeploymentResourcePoolRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("get_deployment_resource_pool"));
            }
            return Ok(request);
        }
        Ok(GetDeploymentResourcePoolRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<GetDeploymentResourcePoolRequest> for GetDeploymentResourcePoolArgs {
    fn from(request: GetDeploymentResourcePoolRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for GetDeploymentResourcePoolArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<DeploymentResourcePoolName> for GetDeploymentResourcePoolArgs {
    fn from(name: DeploymentResourcePoolName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`DeploymentResourcePoolClient::list_deployment_resource_pools`].
/// Flattened: `parent`.
#[derive(Debug, Clone, Default)]
pub struct ListDeploymentResourcePoolsArgs {
    pub request: Option<ListDeploymentResourcePoolsRequest>,
    pub parent: Option<String>,
}

impl ListDeploymentResourcePoolsArgs {
    pub(crate) fn into_request(self) -> Result<ListDeploymentResourcePoolsRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() {
                return Err(exclusive_args_error("list_deployment_resource_pools"));
            }
            return Ok(request);
        }
        Ok(ListDeploymentResourcePoolsRequest {
            parent: self.parent.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<ListDeploymentResourcePoolsRequest> for ListDeploymentResourcePoolsArgs {
    fn from(request: ListDeploymentResourcePoolsRequest) -> Self {
        Self {
            request: Some(request),
            parent: None,
        }
    }
}

impl From<&str> for ListDeploymentResourcePoolsArgs {
    fn from(parent: &str) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

impl From<LocationName> for ListDeploymentResourcePoolsArgs {
    fn from(parent: LocationName) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

/// Arguments for [`DeploymentResourcePoolClient::update_deployment_resource_pool`].
///
/// Flattened fields: `deployment_resource_pool`, `update_mask`.
#[derive(Debug, Clone, Default)]
pub struct UpdateDeploymentResourcePoolArgs {
    pub request: Option<UpdateDeploymentResourcePoolRequest>,
    pub deployment_resource_pool: Option<DeploymentResourcePool>,
    pub update_mask: Option<FieldMask>,
}

impl UpdateDeploymentResourcePoolArgs {
    pub fn new(deployment_resource_pool: DeploymentResourcePool, update_mask: FieldMask) -> Self {
        Self {
            request: None,
            deployment_resource_pool: Some(deployment_resource_pool),
            update_mask: Some(update_mask),
        }
    }

    pub(crate) fn into_request(self) -> Result<UpdateDeploymentResourcePoolRequest> {
        if let Some(request) = self.request {
            if self.deployment_resource_pool.is_some() || self.update_mask.is_some() {
                return Err(exclusive_args_error("update_deployment_resource_pool"));
            }
            return Ok(request);
        }
        Ok(UpdateDeploymentResourcePoolRequest {
            deployment_resource_pool: self.deployment_resource_pool,
            update_mask: self.update_mask,
        })
    }
}

impl From<UpdateDeploymentResourcePoolRequest> for UpdateDeploymentResourcePoolArgs {
    fn from(request: UpdateDeploymentResourcePoolRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`DeploymentResourcePoolClient::delete_deployment_resource_pool`].
/// Flattened: `name`.
#[derive(Debug, Clone, Default)]
pub struct DeleteDeploymentResourcePoolArgs {
    pub request: Option<DeleteDeploymentResourcePoolRequest>,
    pub name: Option<String>,
}

impl DeleteDeploymentResourcePoolArgs {
    pub(crate) fn into_request(self) -> Result<DeleteDeploymentResourcePoolRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("delete_deployment_resource_pool"));
            }
            return Ok(request);
        }
        Ok(DeleteDeploymentResourcePoolRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<DeleteDeploymentResourcePoolRequest> for DeleteDeploymentResourcePoolArgs {
    fn from(request: DeleteDeploymentResourcePoolRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for DeleteDeploymentResourcePoolArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<DeploymentResourcePoolName> for DeleteDeploymentResourcePoolArgs {
    fn from(name: DeploymentResourcePoolName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`DeploymentResourcePoolClient::query_deployed_models`].
/// Flattened: `deployment_resource_pool`.
#[derive(Debug, Clone, Default)]
pub struct QueryDeployedModelsArgs {
    pub request: Option<QueryDeployedModelsRequest>,
    pub deployment_resource_pool: Option<String>,
}

impl QueryDeployedModelsArgs {
    pub(crate) fn into_request(self) -> Result<QueryDeployedModelsRequest> {
        if let Some(request) = self.request {
            if self.deployment_resource_pool.is_some() {
                return Err(exclusive_args_error("query_deployed_models"));
            }
            return Ok(request);
        }
        Ok(QueryDeployedModelsRequest {
            deployment_resource_pool: self.deployment_resource_pool.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<QueryDeployedModelsRequest> for QueryDeployedModelsArgs {
    fn from(request: QueryDeployedModelsRequest) -> Self {
        Self {
            request: Some(request),
            deployment_resource_pool: None,
        }
    }
}

impl From<&str> for QueryDeployedModelsArgs {
    fn from(pool: &str) -> Self {
        Self {
            request: None,
            deployment_resource_pool: Some(pool.to_string()),
        }
    }
}

impl From<DeploymentResourcePoolName> for QueryDeployedModelsArgs {
    fn from(pool: DeploymentResourcePoolName) -> Self {
        Self {
            request: None,
            deployment_resource_pool: Some(pool.to_string()),
        }
    }
}

/// Async client for
/// `google.cloud.aiplatform.v1.DeploymentResourcePoolService`.
pub struct DeploymentResourcePoolClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: OperationsClient<T>,
}

impl<T> Clone for DeploymentResourcePoolClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            shared: self.shared.clone(),
            operations: self.operations.clone(),
        }
    }
}

impl<T> std::fmt::Debug for DeploymentResourcePoolClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentResourcePoolClient")
            .finish_non_exhaustive()
    }
}

impl DeploymentResourcePoolClient<GrpcTransport> {
    pub fn grpc(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = GrpcTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl DeploymentResourcePoolClient<RestTransport> {
    pub fn rest(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = RestTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl<T: Transport> DeploymentResourcePoolClient<T> {
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

    /// Creates a pool. Long-running; resolves to the created pool.
    pub async fn create_deployment_resource_pool(
        &self,
        args: impl Into<CreateDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<CreateDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<CreateDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    pub async fn get_deployment_resource_pool(
        &self,
        args: impl Into<GetDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<DeploymentResourcePool> {
        let request = args.into().into_request()?;
        call::invoke::<GetDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .await
    }

    pub async fn list_deployment_resource_pools(
        &self,
        args: impl Into<ListDeploymentResourcePoolsArgs>,
        options: CallOptions,
    ) -> Result<ListPager<ListDeploymentResourcePools, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }

    /// Updates a pool in place. Long-running; resolves to the updated pool.
    pub async fn update_deployment_resource_pool(
        &self,
        args: impl Into<UpdateDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<UpdateDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<UpdateDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    /// Deletes a pool. Long-running over an empty result.
    pub async fn delete_deployment_resource_pool(
        &self,
        args: impl Into<DeleteDeploymentResourcePoolArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<DeleteDeploymentResourcePool, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<DeleteDeploymentResourcePool, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    /// Pages over the deployed models sharing a pool's capacity.
    pub async fn query_deployed_models(
        &self,
        args: impl Into<QueryDeployedModelsArgs>,
        options: CallOptions,
    ) -> Result<ListPager<QueryDeployedModels, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }
}
