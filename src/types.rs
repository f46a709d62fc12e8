//! Message types for the ModelService API surface.
//!
//! Every message derives both `prost::Message` and the serde traits so a
//! single type serves the binary and JSON transports. JSON names follow the
//! proto3 JSON mapping (camelCase, `FieldMask` as a comma-joined string,
//! `Duration` as a `"3.5s"` literal).

use std::collections::HashMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::Error;

/// A message that can travel on both transports.
///
/// The binary transport frames `encode_proto`/`decode_proto`; the JSON
/// transport uses `to_json`/`from_json`. Implemented for every message via
/// [`proto_api_message!`]; the operation record carries a manual impl
/// because its payloads differ per wire.
pub trait ApiMessage: Clone + Send + Sync + Sized + 'static {
    fn encode_proto(&self) -> Result<Vec<u8>, Error>;
    fn decode_proto(buf: &[u8]) -> Result<Self, Error>;
    fn to_json(&self) -> Result<serde_json::Value, Error>;
    fn from_json(value: serde_json::Value) -> Result<Self, Error>;
}

macro_rules! proto_api_message {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::types::ApiMessage for $ty {
            fn encode_proto(&self) -> Result<Vec<u8>, $crate::errors::Error> {
                Ok(prost::Message::encode_to_vec(self))
            }

            fn decode_proto(buf: &[u8]) -> Result<Self, $crate::errors::Error> {
                <$ty as prost::Message>::decode(buf).map_err($crate::errors::Error::from)
            }

            fn to_json(&self) -> Result<serde_json::Value, $crate::errors::Error> {
                serde_json::to_value(self).map_err($crate::errors::Error::from)
            }

            fn from_json(value: serde_json::Value) -> Result<Self, $crate::errors::Error> {
                serde_json::from_value(value).map_err($crate::errors::Error::from)
            }
        }
    )+};
}
pub(crate) use proto_api_message;

/// `google.protobuf.Empty`.
#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct Empty {}

/// `google.protobuf.FieldMask`, JSON-mapped to a comma-joined path string.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldMask {
    #[prost(string, repeated, tag = "1")]
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn to_query_value(&self) -> String {
        self.paths.join(",")
    }
}

impl Serialize for FieldMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_query_value())
    }
}

impl<'de> Deserialize<'de> for FieldMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let joined = String::deserialize(deserializer)?;
        let paths = joined
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Ok(FieldMask { paths })
    }
}

/// `google.protobuf.Duration`, JSON-mapped to a seconds literal (`"3.5s"`).
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct WireDuration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

impl From<std::time::Duration> for WireDuration {
    fn from(d: std::time::Duration) -> Self {
        Self {
            seconds: d.as_secs() as i64,
            nanos: d.subsec_nanos() as i32,
        }
    }
}

impl fmt::Display for WireDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            write!(f, "{}s", self.seconds)
        } else {
            let frac = format!("{:09}", self.nanos.unsigned_abs());
            write!(f, "{}.{}s", self.seconds, frac.trim_end_matches('0'))
        }
    }
}

impl Serialize for WireDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WireDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        let trimmed = literal
            .strip_suffix('s')
            .ok_or_else(|| D::Error::custom("duration must end in 's'"))?;
        let value: f64 = trimmed
            .parse()
            .map_err(|_| D::Error::custom("invalid duration literal"))?;
        let seconds = value.trunc() as i64;
        let nanos = ((value - value.trunc()) * 1e9).round() as i32;
        Ok(WireDuration { seconds, nanos })
    }
}

/// A trained model resource.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Model {
    /// Resource name, `projects/{p}/locations/{l}/models/{m}`.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub display_name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(string, tag = "4")]
    pub version_id: String,
    #[prost(string, tag = "5")]
    pub artifact_uri: String,
    #[prost(map = "string, string", tag = "6")]
    pub labels: HashMap<String, String>,
    #[prost(string, tag = "7")]
    pub etag: String,
}

/// Evaluation metrics attached to a model.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelEvaluation {
    /// `projects/{p}/locations/{l}/models/{m}/evaluations/{ev}`.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub display_name: String,
    #[prost(string, tag = "3")]
    pub metrics_schema_uri: String,
    #[prost(string, repeated, tag = "4")]
    pub slice_dimensions: Vec<String>,
}

/// One dimension/value pair identifying an evaluation slice.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SliceDimension {
    #[prost(string, tag = "1")]
    pub dimension: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// Evaluation metrics restricted to one data slice.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelEvaluationSlice {
    /// `.../models/{m}/evaluations/{ev}/slices/{s}`.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice: Option<SliceDimension>,
    #[prost(string, tag = "3")]
    pub metrics_schema_uri: String,
}

/// A model published in the Model Garden catalog.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublisherModel {
    /// `publishers/{publisher}/models/{m}`.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub version_id: String,
}

/// A pool of shared serving resources for deployed models.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeploymentResourcePool {
    /// `projects/{p}/locations/{l}/deploymentResourcePools/{pool}`.
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub service_account: String,
}

/// A model deployed into a resource pool or endpoint.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployedModel {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub model: String,
    #[prost(string, tag = "3")]
    pub display_name: String,
}

/// Cloud storage output location.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcsDestination {
    #[prost(string, tag = "1")]
    pub output_uri_prefix: String,
}

/// Progress record shared by this service's operation metadata types.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenericOperationMetadata {
    #[prost(string, tag = "1")]
    pub create_time: String,
    #[prost(string, tag = "2")]
    pub update_time: String,
}

// ---------------------------------------------------------------------------
// ModelService request/response messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadModelRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub parent_model: String,
    #[prost(string, tag = "3")]
    pub model_id: String,
    #[prost(message, optional, tag = "4")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadModelResponse {
    #[prost(string, tag = "1")]
    pub model: String,
    #[prost(string, tag = "2")]
    pub model_version_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadModelOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetModelRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelsRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub filter: String,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
    #[prost(string, tag = "4")]
    pub page_token: String,
    #[prost(string, tag = "5")]
    pub order_by: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelsResponse {
    #[prost(message, repeated, tag = "1")]
    pub models: Vec<Model>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateModelRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteModelRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

/// Operation metadata for delete operations across this service.
#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportModelOutputConfig {
    #[prost(string, tag = "1")]
    pub export_format_id: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_destination: Option<GcsDestination>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportModelRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_config: Option<ExportModelOutputConfig>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message, Serialize, Deserialize)]
pub struct ExportModelResponse {}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportModelOutputInfo {
    #[prost(string, tag = "1")]
    pub artifact_output_uri: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportModelOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_info: Option<ExportModelOutputInfo>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportModelEvaluationRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_evaluation: Option<ModelEvaluation>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetModelEvaluationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelEvaluationsRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub filter: String,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
    #[prost(string, tag = "4")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelEvaluationsResponse {
    #[prost(message, repeated, tag = "1")]
    pub model_evaluations: Vec<ModelEvaluation>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetModelEvaluationSliceRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelEvaluationSlicesRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub filter: String,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
    #[prost(string, tag = "4")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListModelEvaluationSlicesResponse {
    #[prost(message, repeated, tag = "1")]
    pub model_evaluation_slices: Vec<ModelEvaluationSlice>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

// ---------------------------------------------------------------------------
// ModelGardenService request/response messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPublisherModelRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub language_code: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPublisherModelsRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(string, tag = "2")]
    pub filter: String,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
    #[prost(string, tag = "4")]
    pub page_token: String,
    #[prost(string, tag = "5")]
    pub language_code: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListPublisherModelsResponse {
    #[prost(message, repeated, tag = "1")]
    pub publisher_models: Vec<PublisherModel>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployRequest {
    /// `projects/{p}/locations/{l}` the model is deployed into.
    #[prost(string, tag = "1")]
    pub destination: String,
    #[prost(string, tag = "2")]
    pub publisher_model_name: String,
    #[prost(string, tag = "3")]
    pub endpoint_display_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployResponse {
    #[prost(string, tag = "1")]
    pub publisher_model: String,
    #[prost(string, tag = "2")]
    pub endpoint: String,
    #[prost(string, tag = "3")]
    pub model: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
    #[prost(string, tag = "2")]
    pub destination: String,
    #[prost(string, tag = "3")]
    pub publisher_model: String,
}

// ---------------------------------------------------------------------------
// DeploymentResourcePoolService request/response messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDeploymentResourcePoolRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_resource_pool: Option<DeploymentResourcePool>,
    #[prost(string, tag = "3")]
    pub deployment_resource_pool_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateDeploymentResourcePoolOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDeploymentResourcePoolRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDeploymentResourcePoolsRequest {
    #[prost(string, tag = "1")]
    pub parent: String,
    #[prost(int32, tag = "2")]
    pub page_size: i32,
    #[prost(string, tag = "3")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListDeploymentResourcePoolsResponse {
    #[prost(message, repeated, tag = "1")]
    pub deployment_resource_pools: Vec<DeploymentResourcePool>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDeploymentResourcePoolRequest {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_resource_pool: Option<DeploymentResourcePool>,
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<FieldMask>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDeploymentResourcePoolOperationMetadata {
    #[prost(message, optional, tag = "1")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_metadata: Option<GenericOperationMetadata>,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteDeploymentResourcePoolRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryDeployedModelsRequest {
    /// Full resource name of the pool being queried.
    #[prost(string, tag = "1")]
    pub deployment_resource_pool: String,
    #[prost(int32, tag = "2")]
    pub page_size: i32,
    #[prost(string, tag = "3")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryDeployedModelsResponse {
    #[prost(message, repeated, tag = "1")]
    pub deployed_models: Vec<DeployedModel>,
    #[prost(string, tag = "2")]
    pub next_page_token: String,
    #[prost(int32, tag = "3")]
    pub total_deployed_model_count: i32,
}

proto_api_message!(
    Empty,
    FieldMask,
    WireDuration,
    Model,
    ModelEvaluation,
    SliceDimension,
    ModelEvaluationSlice,
    PublisherModel,
    DeploymentResourcePool,
    DeployedModel,
    GcsDestination,
    GenericOperationMetadata,
    UploadModelRequest,
    UploadModelResponse,
    UploadModelOperationMetadata,
    GetModelRequest,
    ListModelsRequest,
    ListModelsResponse,
    UpdateModelRequest,
    DeleteModelRequest,
    DeleteOperationMetadata,
    ExportModelOutputConfig,
    ExportModelRequest,
    ExportModelResponse,
    ExportModelOutputInfo,
    ExportModelOperationMetadata,
    ImportModelEvaluationRequest,
    GetModelEvaluationRequest,
    ListModelEvaluationsRequest,
    ListModelEvaluationsResponse,
    GetModelEvaluationSliceRequest,
    ListModelEvaluationSlicesRequest,
    ListModelEvaluationSlicesResponse,
    GetPublisherModelRequest,
    ListPublisherModelsRequest,
    ListPublisherModelsResponse,
    DeployRequest,
    DeployResponse,
    DeployOperationMetadata,
    CreateDeploymentResourcePoolRequest,
    CreateDeploymentResourcePoolOperationMetadata,
    GetDeploymentResourcePoolRequest,
    ListDeploymentResourcePoolsRequest,
    ListDeploymentResourcePoolsResponse,
    UpdateDeploymentResourcePoolRequest,
    UpdateDeploymentResourcePoolOperationMetadata,
    DeleteDeploymentResourcePoolRequest,
    QueryDeployedModelsRequest,
    QueryDeployedModelsResponse,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_json_uses_camel_case() {
        let model = Model {
            name: "projects/p/locations/l/models/m".into(),
            display_name: "my model".into(),
            ..Default::default()
        };
        let value = model.to_json().unwrap();
        assert_eq!(value["displayName"], "my model");
        assert!(value.get("display_name").is_none());
    }

    #[test]
    fn unknown_json_fields_are_ignored() {
        let value = serde_json::json!({
            "name": "projects/p/locations/l/models/m",
            "displayName": "d",
            "futureField": {"nested": true}
        });
        let model = Model::from_json(value).unwrap();
        assert_eq!(model.display_name, "d");
    }

    #[test]
    fn proto_round_trip_preserves_labels() {
        let mut model = Model {
            name: "projects/p/locations/l/models/m".into(),
            ..Default::default()
        };
        model.labels.insert("env".into(), "prod".into());

        let decoded = Model::decode_proto(&model.encode_proto().unwrap()).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn field_mask_maps_to_comma_string() {
        let mask = FieldMask::new(["display_name", "labels"]);
        let value = serde_json::to_value(&mask).unwrap();
        assert_eq!(value, serde_json::json!("display_name,labels"));

        let parsed: FieldMask = serde_json::from_value(serde_json::json!("a, b,")).unwrap();
        assert_eq!(parsed.paths, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn wire_duration_formats_seconds_literal() {
        let d = WireDuration {
            seconds: 3,
            nanos: 500_000_000,
        };
        assert_eq!(serde_json::to_value(d).unwrap(), serde_json::json!("3.5s"));

        let parsed: WireDuration = serde_json::from_value(serde_json::json!("30s")).unwrap();
        assert_eq!(parsed.seconds, 30);
        assert_eq!(parsed.nanos, 0);
    }

    #[test]
    fn wire_duration_rejects_missing_suffix() {
        let result: Result<WireDuration, _> = serde_json::from_value(serde_json::json!("30"));
        assert!(result.is_err());
    }

    #[test]
    fn update_request_omits_absent_mask() {
        let request = UpdateModelRequest {
            model: Some(Model::default()),
            update_mask: None,
        };
        let value = request.to_json().unwrap();
        assert!(value.get("updateMask").is_none());
    }
}
