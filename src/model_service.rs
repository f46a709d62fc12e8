//! The ModelService facade: model CRUD, export, and evaluation reads.
//!
//! Every method takes an argument bundle that is either a full request
//! object or the method's documented flattened fields; supplying both is a
//! validation error raised before any I/O. The bundles implement `From` for
//! the common shorthand (a request, a resource name) so call sites stay
//! terse:
//!
//! ```ignore
//! let client = ModelServiceClient::rest(ClientOptions::new())?;
//! let model = client
//!     .get_model("projects/p/locations/l/models/m", CallOptions::new())
//!     .await?;
//! ```

use std::sync::Arc;

use crate::call;
use crate::config::{CallShared, ClientOptions};
use crate::errors::{Error, Result};
use crate::grpc::GrpcTransport;
use crate::lro::OperationFuture;
use crate::methods::{
    DeleteModel, ExportModel, GetModel, GetModelEvaluation, GetModelEvaluationSlice, ListModels,
    ListModelEvaluationSlices, ListModelEvaluations, ImportModelEvaluation, UpdateModel,
    UploadModel,
};
use crate::operations::OperationsClient;
use crate::options::CallOptions;
use crate::pager::ListPager;
use crate::resource_names::{EvaluationName, LocationName, ModelName, SliceName};
use crate::rest::RestTransport;
use crate::transport::Transport;
use crate::types::*;

pub(crate) fn exclusive_args_error(method: &str) -> Error {
    Error::validation(
        "request object cannot be combined with flattened arguments",
        method,
    )
}

/// Arguments for [`ModelServiceClient::upload_model`].
///
/// Flattened fields: `parent`, `model`.
#[derive(Debug, Clone, Default)]
pub struct UploadModelArgs {
    pub request: Option<UploadModelRequest>,
    pub parent: Option<String>,
    pub model: Option<Model>,
}

impl UploadModelArgs {
    pub fn new(parent: impl Into<String>, model: Model) -> Self {
        Self {
            request: None,
            parent: Some(parent.into()),
            model: Some(model),
        }
    }

    pub(crate) fn into_request(self) -> Result<UploadModelRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() || self.model.is_some() {
                return Err(exclusive_args_error("upload_model"));
            }
            return Ok(request);
        }
        Ok(UploadModelRequest {
            parent: self.parent.unwrap_or_default(),
            model: self.model,
            ..Default::default()
        })
    }
}

impl From<UploadModelRequest> for UploadModelArgs {
    fn from(request: UploadModelRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`ModelServiceClient::get_model`].
///
/// Flattened field: `name`.
#[derive(Debug, Clone, Default)]
pub struct GetModelArgs {
    pub request: Option<GetModelRequest>,
    pub name: Option<String>,
}

impl GetModelArgs {
    pub(crate) fn into_request(self) -> Result<GetModelRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("get_model"));
            }
            return Ok(request);
        }
        Ok(GetModelRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<GetModelRequest> for GetModelArgs {
    fn from(request: GetModelRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for GetModelArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<String> for GetModelArgs {
    fn from(name: String) -> Self {
        Self {
            request: None,
            name: Some(name),
        }
    }
}

impl From<ModelName> for GetModelArgs {
    fn from(name: ModelName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::list_models`].
///
/// Flattened field: `parent`.
#[derive(Debug, Clone, Default)]
pub struct ListModelsArgs {
    pub request: Option<ListModelsRequest>,
    pub parent: Option<String>,
}

impl ListModelsArgs {
    pub(crate) fn into_request(self) -> Result<ListModelsRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() {
                return Err(exclusive_args_error("list_models"));
            }
            return Ok(request);
        }
        Ok(ListModelsRequest {
            parent: self.parent.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<ListModelsRequest> for ListModelsArgs {
    fn from(request: ListModelsRequest) -> Self {
        Self {
            request: Some(request),
            parent: None,
        }
    }
}

impl From<&str> for ListModelsArgs {
    fn from(parent: &str) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

impl From<LocationName> for ListModelsArgs {
    fn from(parent: LocationName) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::update_model`].
///
/// Flattened fields: `model`, `update_mask`.
#[derive(Debug, Clone, Default)]
pub struct UpdateModelArgs {
    pub request: Option<UpdateModelRequest>,
    pub model: Option<Model>,
    pub update_mask: Option<FieldMask>,
}

impl UpdateModelArgs {
    pub fn new(model: Model, update_mask: FieldMask) -> Self {
        Self {
            request: None,
            model: Some(model),
            update_mask: Some(update_mask),
        }
    }

    pub(crate) fn into_request(self) -> Result<UpdateModelRequest> {
        if let Some(request) = self.request {
            if self.model.is_some() || self.update_mask.is_some() {
                return Err(exclusive_args_error("update_model"));
            }
            return Ok(request);
        }
        Ok(UpdateModelRequest {
            model: self.model,
            update_mask: self.update_mask,
        })
    }
}

impl From<UpdateModelRequest> for UpdateModelArgs {
    fn from(request: UpdateModelRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`ModelServiceClient::delete_model`]. Flattened: `name`.
#[derive(Debug, Clone, Default)]
pub struct DeleteModelArgs {
    pub request: Option<DeleteModelRequest>,
    pub name: Option<String>,
}

impl DeleteModelArgs {
    pub(crate) fn into_request(self) -> Result<DeleteModelRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("delete_model"));
            }
            return Ok(request);
        }
        Ok(DeleteModelRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<DeleteModelRequest> for DeleteModelArgs {
    fn from(request: DeleteModelRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for DeleteModelArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<ModelName> for DeleteModelArgs {
    fn from(name: ModelName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::export_model`].
///
/// Flattened fields: `name`, `output_config`.
#[derive(Debug, Clone, Default)]
pub struct ExportModelArgs {
    pub request: Option<ExportModelRequest>,
    pub name: Option<String>,
    pub output_config: Option<ExportModelOutputConfig>,
}

impl ExportModelArgs {
    pub fn new(name: impl Into<String>, output_config: ExportModelOutputConfig) -> Self {
        Self {
            request: None,
            name: Some(name.into()),
            output_config: Some(output_config),
        }
    }

    pub(crate) fn into_request(self) -> Result<ExportModelRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() || self.output_config.is_some() {
                return Err(exclusive_args_error("export_model"));
            }
            return Ok(request);
        }
        Ok(ExportModelRequest {
            name: self.name.unwrap_or_default(),
            output_config: self.output_config,
        })
    }
}

impl From<ExportModelRequest> for ExportModelArgs {
    fn from(request: ExportModelRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`ModelServiceClient::import_model_evaluation`].
///
/// Flattened fields: `parent`, `model_evaluation`.
#[derive(Debug, Clone, Default)]
pub struct ImportModelEvaluationArgs {
    pub request: Option<ImportModelEvaluationRequest>,
    pub parent: Option<String>,
    pub model_evaluation: Option<ModelEvaluation>,
}

impl ImportModelEvaluationArgs {
    pub fn new(parent: impl Into<String>, model_evaluation: ModelEvaluation) -> Self {
        Self {
            request: None,
            parent: Some(parent.into()),
            model_evaluation: Some(model_evaluation),
        }
    }

    pub(crate) fn into_request(self) -> Result<ImportModelEvaluationRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() || self.model_evaluation.is_some() {
                return Err(exclusive_args_error("import_model_evaluation"));
            }
            return Ok(request);
        }
        Ok(ImportModelEvaluationRequest {
            parent: self.parent.unwrap_or_default(),
            model_evaluation: self.model_evaluation,
        })
    }
}

impl From<ImportModelEvaluationRequest> for ImportModelEvaluationArgs {
    fn from(request: ImportModelEvaluationRequest) -> Self {
        Self {
            request: Some(request),
            ..Default::default()
        }
    }
}

/// Arguments for [`ModelServiceClient::get_model_evaluation`]. Flattened:
/// `name`.
#[derive(Debug, Clone, Default)]
pub struct GetModelEvaluationArgs {
    pub request: Option<GetModelEvaluationRequest>,
    pub name: Option<String>,
}

impl GetModelEvaluationArgs {
    pub(crate) fn into_request(self) -> Result<GetModelEvaluationRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("get_model_evaluation"));
            }
            return Ok(request);
        }
        Ok(GetModelEvaluationRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<GetModelEvaluationRequest> for GetModelEvaluationArgs {
    fn from(request: GetModelEvaluationRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for GetModelEvaluationArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<EvaluationName> for GetModelEvaluationArgs {
    fn from(name: EvaluationName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::list_model_evaluations`]. Flattened:
/// `parent`.
#[derive(Debug, Clone, Default)]
pub struct ListModelEvaluationsArgs {
    pub request: Option<ListModelEvaluationsRequest>,
    pub parent: Option<String>,
}

impl ListModelEvaluationsArgs {
    pub(crate) fn into_request(self) -> Result<ListModelEvaluationsRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() {
                return Err(exclusive_args_error("list_model_evaluations"));
            }
            return Ok(request);
        }
        Ok(ListModelEvaluationsRequest {
            parent: self.parent.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<ListModelEvaluationsRequest> for ListModelEvaluationsArgs {
    fn from(request: ListModelEvaluationsRequest) -> Self {
        Self {
            request: Some(request),
            parent: None,
        }
    }
}

impl From<&str> for ListModelEvaluationsArgs {
    fn from(parent: &str) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

impl From<ModelName> for ListModelEvaluationsArgs {
    fn from(parent: ModelName) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::get_model_evaluation_slice`].
/// Flattened: `name`.
#[derive(Debug, Clone, Default)]
pub struct GetModelEvaluationSliceArgs {
    pub request: Option<GetModelEvaluationSliceRequest>,
    pub name: Option<String>,
}

impl GetModelEvaluationSliceArgs {
    pub(crate) fn into_request(self) -> Result<GetModelEvaluationSliceRequest> {
        if let Some(request) = self.request {
            if self.name.is_some() {
                return Err(exclusive_args_error("get_model_evaluation_slice"));
            }
            return Ok(request);
        }
        Ok(GetModelEvaluationSliceRequest {
            name: self.name.unwrap_or_default(),
        })
    }
}

impl From<GetModelEvaluationSliceRequest> for GetModelEvaluationSliceArgs {
    fn from(request: GetModelEvaluationSliceRequest) -> Self {
        Self {
            request: Some(request),
            name: None,
        }
    }
}

impl From<&str> for GetModelEvaluationSliceArgs {
    fn from(name: &str) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

impl From<SliceName> for GetModelEvaluationSliceArgs {
    fn from(name: SliceName) -> Self {
        Self {
            request: None,
            name: Some(name.to_string()),
        }
    }
}

/// Arguments for [`ModelServiceClient::list_model_evaluation_slices`].
/// Flattened: `parent`.
#[derive(Debug, Clone, Default)]
pub struct ListModelEvaluationSlicesArgs {
    pub request: Option<ListModelEvaluationSlicesRequest>,
    pub parent: Option<String>,
}

impl ListModelEvaluationSlicesArgs {
    pub(crate) fn into_request(self) -> Result<ListModelEvaluationSlicesRequest> {
        if let Some(request) = self.request {
            if self.parent.is_some() {
                return Err(exclusive_args_error("list_model_evaluation_slices"));
            }
            return Ok(request);
        }
        Ok(ListModelEvaluationSlicesRequest {
            parent: self.parent.unwrap_or_default(),
            ..Default::default()
        })
    }
}

impl From<ListModelEvaluationSlicesRequest> for ListModelEvaluationSlicesArgs {
    fn from(request: ListModelEvaluationSlicesRequest) -> Self {
        Self {
            request: Some(request),
            parent: None,
        }
    }
}

impl From<&str> for ListModelEvaluationSlicesArgs {
    fn from(parent: &str) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

impl From<EvaluationName> for ListModelEvaluationSlicesArgs {
    fn from(parent: EvaluationName) -> Self {
        Self {
            request: None,
            parent: Some(parent.to_string()),
        }
    }
}

/// Async client for `google.cloud.aiplatform.v1.ModelService`.
pub struct ModelServiceClient<T> {
    transport: Arc<T>,
    shared: CallShared,
    operations: OperationsClient<T>,
}

impl<T> Clone for ModelServiceClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            shared: self.shared.clone(),
            operations: self.operations.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ModelServiceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelServiceClient").finish_non_exhaustive()
    }
}

impl ModelServiceClient<GrpcTransport> {
    /// Builds a client over the binary transport.
    pub fn grpc(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = GrpcTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl ModelServiceClient<RestTransport> {
    /// Builds a client over the JSON transport.
    pub fn rest(options: ClientOptions) -> Result<Self> {
        let config = options.resolve()?;
        let transport = RestTransport::from_config(&config)?;
        Ok(Self::from_parts(
            Arc::new(transport),
            config.into_call_shared(),
        ))
    }
}

impl<T: Transport> ModelServiceClient<T> {
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

    /// The operations sub-client, dispatching through this client's
    /// transport.
    pub fn operations(&self) -> &OperationsClient<T> {
        &self.operations
    }

    /// Uploads a model into a location. Long-running.
    pub async fn upload_model(
        &self,
        args: impl Into<UploadModelArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<UploadModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<UploadModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    pub async fn get_model(
        &self,
        args: impl Into<GetModelArgs>,
        options: CallOptions,
    ) -> Result<Model> {
        let request = args.into().into_request()?;
        call::invoke::<GetModel, _>(self.transport.as_ref(), &self.shared, request, options).await
    }

    pub async fn list_models(
        &self,
        args: impl Into<ListModelsArgs>,
        options: CallOptions,
    ) -> Result<ListPager<ListModels, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }

    pub async fn update_model(
        &self,
        args: impl Into<UpdateModelArgs>,
        options: CallOptions,
    ) -> Result<Model> {
        let request = args.into().into_request()?;
        call::invoke::<UpdateModel, _>(self.transport.as_ref(), &self.shared, request, options)
            .await
    }

    /// Deletes a model. Long-running over an empty result.
    pub async fn delete_model(
        &self,
        args: impl Into<DeleteModelArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<DeleteModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<DeleteModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    /// Exports a model to an external artifact store. Long-running.
    pub async fn export_model(
        &self,
        args: impl Into<ExportModelArgs>,
        options: CallOptions,
    ) -> Result<OperationFuture<ExportModel, T>> {
        let request = args.into().into_request()?;
        let operation = call::invoke::<ExportModel, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options.clone(),
        )
        .await?;
        OperationFuture::new(operation, self.operations.clone(), options)
    }

    pub async fn import_model_evaluation(
        &self,
        args: impl Into<ImportModelEvaluationArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluation> {
        let request = args.into().into_request()?;
        call::invoke::<ImportModelEvaluation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .await
    }

    pub async fn get_model_evaluation(
        &self,
        args: impl Into<GetModelEvaluationArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluation> {
        let request = args.into().into_request()?;
        call::invoke::<GetModelEvaluation, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .await
    }

    pub async fn list_model_evaluations(
        &self,
        args: impl Into<ListModelEvaluationsArgs>,
        options: CallOptions,
    ) -> Result<ListPager<ListModelEvaluations, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }

    pub async fn get_model_evaluation_slice(
        &self,
        args: impl Into<GetModelEvaluationSliceArgs>,
        options: CallOptions,
    ) -> Result<ModelEvaluationSlice> {
        let request = args.into().into_request()?;
        call::invoke::<GetModelEvaluationSlice, _>(
            self.transport.as_ref(),
            &self.shared,
            request,
            options,
        )
        .await
    }

    pub async fn list_model_evaluation_slices(
        &self,
        args: impl Into<ListModelEvaluationSlicesArgs>,
        options: CallOptions,
    ) -> Result<ListPager<ListModelEvaluationSlices, T>> {
        let request = args.into().into_request()?;
        ListPager::start(self.transport.clone(), self.shared.clone(), request, options).await
    }
}
