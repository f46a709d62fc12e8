//! Long-running operation records and the operations request messages.
//!
//! An [`Operation`] is decoded from whichever wire the call used, so its
//! payloads stay in their original encoding until a caller asks for a typed
//! message. Payloads never convert between encodings; asking the protobuf
//! form of a JSON-observed operation (or the reverse) is an error.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::status::{Code, ServiceError};
use crate::types::{proto_api_message, ApiMessage, WireDuration};

/// An operation payload as observed on the wire.
///
/// The binary transport carries `google.protobuf.Any`; the JSON transport
/// carries an object tagged with an `@type` key. Either form decodes into a
/// typed message on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Proto(prost_types::Any),
    Json(serde_json::Value),
}

impl Payload {
    /// The embedded type URL, when the wire carried one.
    pub fn type_url(&self) -> Option<&str> {
        match self {
            Payload::Proto(any) => Some(any.type_url.as_str()),
            Payload::Json(value) => value.get("@type").and_then(|v| v.as_str()),
        }
    }

    /// Decodes the payload into `T` using the encoding it arrived in.
    pub fn decode<T: ApiMessage>(&self) -> Result<T, Error> {
        match self {
            Payload::Proto(any) => T::decode_proto(&any.value),
            Payload::Json(value) => T::from_json(value.clone()),
        }
    }
}

/// Terminal result recorded on a finished operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Response(Payload),
    Error(ServiceError),
}

/// A `google.longrunning.Operation` as returned by either transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operation {
    /// Server-assigned name, `projects/.../operations/{id}`.
    pub name: String,
    /// Whether the operation has reached a terminal state.
    pub done: bool,
    /// Service-specific progress metadata, refreshed on every poll.
    pub metadata: Option<Payload>,
    /// Set once `done` is true.
    pub outcome: Option<Outcome>,
}

impl Operation {
    /// The terminal error, if the operation failed.
    pub fn error(&self) -> Option<&ServiceError> {
        match &self.outcome {
            Some(Outcome::Error(status)) => Some(status),
            _ => None,
        }
    }

    /// The terminal response payload, if the operation succeeded.
    pub fn response(&self) -> Option<&Payload> {
        match &self.outcome {
            Some(Outcome::Response(payload)) => Some(payload),
            _ => None,
        }
    }

    fn to_wire(&self) -> Result<WireOperation, Error> {
        let result = match &self.outcome {
            Some(Outcome::Response(payload)) => {
                Some(WireResult::Response(payload_to_any(payload)?))
            }
            Some(Outcome::Error(status)) => Some(WireResult::Error(WireStatus {
                code: status.code.value(),
                message: status.message.clone(),
                details: Vec::new(),
            })),
            None => None,
        };
        Ok(WireOperation {
            name: self.name.clone(),
            metadata: self.metadata.as_ref().map(payload_to_any).transpose()?,
            done: self.done,
            result,
        })
    }
}

impl From<WireOperation> for Operation {
    fn from(wire: WireOperation) -> Self {
        let outcome = match wire.result {
            Some(WireResult::Response(any)) => Some(Outcome::Response(Payload::Proto(any))),
            Some(WireResult::Error(status)) => Some(Outcome::Error(status.into())),
            None => None,
        };
        Operation {
            name: wire.name,
            done: wire.done,
            metadata: wire.metadata.map(Payload::Proto),
            outcome,
        }
    }
}

impl ApiMessage for Operation {
    fn encode_proto(&self) -> Result<Vec<u8>, Error> {
        Ok(prost::Message::encode_to_vec(&self.to_wire()?))
    }

    fn decode_proto(buf: &[u8]) -> Result<Self, Error> {
        let wire = <WireOperation as prost::Message>::decode(buf)?;
        Ok(wire.into())
    }

    fn to_json(&self) -> Result<serde_json::Value, Error> {
        let rest = RestOperation {
            name: self.name.clone(),
            done: self.done,
            metadata: self.metadata.as_ref().map(payload_to_value).transpose()?,
            response: match &self.outcome {
                Some(Outcome::Response(payload)) => Some(payload_to_value(payload)?),
                _ => None,
            },
            error: match &self.outcome {
                Some(Outcome::Error(status)) => Some(JsonStatus {
                    code: status.code.value(),
                    message: status.message.clone(),
                    details: status.details.clone(),
                }),
                _ => None,
            },
        };
        serde_json::to_value(rest).map_err(Error::from)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        let rest: RestOperation = serde_json::from_value(value)?;
        let outcome = match (rest.error, rest.response) {
            (Some(status), _) => Some(Outcome::Error(status.into())),
            (None, Some(payload)) => Some(Outcome::Response(Payload::Json(payload))),
            (None, None) => None,
        };
        Ok(Operation {
            name: rest.name,
            done: rest.done,
            metadata: rest.metadata.map(Payload::Json),
            outcome,
        })
    }
}

/// Response message for the operations listing call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOperationsResponse {
    pub operations: Vec<Operation>,
    pub next_page_token: String,
}

impl ApiMessage for ListOperationsResponse {
    fn encode_proto(&self) -> Result<Vec<u8>, Error> {
        let operations = self
            .operations
            .iter()
            .map(Operation::to_wire)
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(prost::Message::encode_to_vec(&WireListOperationsResponse {
            operations,
            next_page_token: self.next_page_token.clone(),
        }))
    }

    fn decode_proto(buf: &[u8]) -> Result<Self, Error> {
        let wire = <WireListOperationsResponse as prost::Message>::decode(buf)?;
        Ok(ListOperationsResponse {
            operations: wire.operations.into_iter().map(Operation::from).collect(),
            next_page_token: wire.next_page_token,
        })
    }

    fn to_json(&self) -> Result<serde_json::Value, Error> {
        let operations = self
            .operations
            .iter()
            .map(Operation::to_json)
            .collect::<Result<Vec<_>, Error>>()?;
        serde_json::to_value(RestListOperations {
            operations,
            next_page_token: self.next_page_token.clone(),
        })
        .map_err(Error::from)
    }

    fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        let rest: RestListOperations = serde_json::from_value(value)?;
        let operations = rest
            .operations
            .into_iter()
            .map(Operation::from_json)
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(ListOperationsResponse {
            operations,
            next_page_token: rest.next_page_token,
        })
    }
}

// ---------------------------------------------------------------------------
// Operations request messages
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetOperationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListOperationsRequest {
    /// Listing parent. Carries wire tag 4 in `google.longrunning`.
    #[prost(string, tag = "4")]
    pub name: String,
    #[prost(string, tag = "1")]
    pub filter: String,
    #[prost(int32, tag = "2")]
    pub page_size: i32,
    #[prost(string, tag = "3")]
    pub page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancelOperationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteOperationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
}

#[derive(Clone, PartialEq, ::prost::Message, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitOperationRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    /// Server-side wait bound; the server may respond sooner.
    #[prost(message, optional, tag = "2")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<WireDuration>,
}

proto_api_message!(
    GetOperationRequest,
    ListOperationsRequest,
    CancelOperationRequest,
    DeleteOperationRequest,
    WaitOperationRequest,
);

// ---------------------------------------------------------------------------
// Wire forms
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, ::prost::Message)]
struct WireOperation {
    #[prost(string, tag = "1")]
    name: String,
    #[prost(message, optional, tag = "2")]
    metadata: Option<prost_types::Any>,
    #[prost(bool, tag = "3")]
    done: bool,
    #[prost(oneof = "WireResult", tags = "4, 5")]
    result: Option<WireResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct WireListOperationsResponse {
    #[prost(message, repeated, tag = "1")]
    operations: Vec<WireOperation>,
    #[prost(string, tag = "2")]
    next_page_token: String,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
enum WireResult {
    #[prost(message, tag = "4")]
    Error(WireStatus),
    #[prost(message, tag = "5")]
    Response(prost_types::Any),
}

/// `google.rpc.Status` as framed inside a failed operation.
#[derive(Clone, PartialEq, ::prost::Message)]
struct WireStatus {
    #[prost(int32, tag = "1")]
    code: i32,
    #[prost(string, tag = "2")]
    message: String,
    #[prost(message, repeated, tag = "3")]
    details: Vec<prost_types::Any>,
}

impl From<WireStatus> for ServiceError {
    fn from(status: WireStatus) -> Self {
        let mut err = ServiceError::new(Code::from_value(status.code), status.message);
        err.details = status
            .details
            .iter()
            .map(|d| serde_json::json!({ "@type": d.type_url }))
            .collect();
        err
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RestOperation {
    name: String,
    done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonStatus>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct JsonStatus {
    code: i32,
    message: String,
    details: Vec<serde_json::Value>,
}

impl From<JsonStatus> for ServiceError {
    fn from(status: JsonStatus) -> Self {
        let mut err = ServiceError::new(Code::from_value(status.code), status.message);
        err.details = status.details;
        err
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RestListOperations {
    operations: Vec<serde_json::Value>,
    next_page_token: String,
}

fn payload_to_any(payload: &Payload) -> Result<prost_types::Any, Error> {
    match payload {
        Payload::Proto(any) => Ok(any.clone()),
        Payload::Json(_) => Err(cross_encoding_error()),
    }
}

fn payload_to_value(payload: &Payload) -> Result<serde_json::Value, Error> {
    match payload {
        Payload::Json(value) => Ok(value.clone()),
        Payload::Proto(_) => Err(cross_encoding_error()),
    }
}

fn cross_encoding_error() -> Error {
    Error::Serialization(<serde_json::Error as serde::ser::Error>::custom(
        "operation payloads do not convert between wire encodings",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeleteOperationMetadata, UploadModelResponse};

    fn any_of<T: ApiMessage>(type_url: &str, message: &T) -> prost_types::Any {
        prost_types::Any {
            type_url: type_url.to_string(),
            value: message.encode_proto().unwrap(),
        }
    }

    #[test]
    fn proto_operation_round_trips_response() {
        let response = UploadModelResponse {
            model: "projects/p/locations/l/models/m".into(),
            model_version_id: "1".into(),
        };
        let operation = Operation {
            name: "projects/p/locations/l/operations/123".into(),
            done: true,
            metadata: None,
            outcome: Some(Outcome::Response(Payload::Proto(any_of(
                "type.googleapis.com/google.cloud.aiplatform.v1.UploadModelResponse",
                &response,
            )))),
        };

        let decoded = Operation::decode_proto(&operation.encode_proto().unwrap()).unwrap();
        assert_eq!(decoded.name, operation.name);
        assert!(decoded.done);
        let payload = decoded.response().unwrap();
        assert_eq!(
            payload.type_url(),
            Some("type.googleapis.com/google.cloud.aiplatform.v1.UploadModelResponse")
        );
        assert_eq!(payload.decode::<UploadModelResponse>().unwrap(), response);
    }

    #[test]
    fn json_operation_parses_error_status() {
        let operation = Operation::from_json(serde_json::json!({
            "name": "projects/p/locations/l/operations/9",
            "done": true,
            "error": {"code": 3, "message": "bad model spec"}
        }))
        .unwrap();

        let status = operation.error().unwrap();
        assert_eq!(status.code, Code::InvalidArgument);
        assert_eq!(status.message, "bad model spec");
        assert!(operation.response().is_none());
    }

    #[test]
    fn json_metadata_decodes_despite_type_tag() {
        let operation = Operation::from_json(serde_json::json!({
            "name": "projects/p/locations/l/operations/7",
            "done": false,
            "metadata": {
                "@type": "type.googleapis.com/google.cloud.aiplatform.v1.DeleteOperationMetadata",
                "genericMetadata": {"createTime": "2026-01-01T00:00:00Z"}
            }
        }))
        .unwrap();

        let metadata = operation.metadata.as_ref().unwrap();
        assert!(metadata.type_url().unwrap().ends_with("DeleteOperationMetadata"));
        let decoded = metadata.decode::<DeleteOperationMetadata>().unwrap();
        assert_eq!(
            decoded.generic_metadata.unwrap().create_time,
            "2026-01-01T00:00:00Z"
        );
    }

    #[test]
    fn json_payload_has_no_proto_form() {
        let operation = Operation {
            name: "op".into(),
            done: false,
            metadata: Some(Payload::Json(serde_json::json!({"@type": "t"}))),
            outcome: None,
        };
        assert!(operation.encode_proto().is_err());
    }

    #[test]
    fn list_response_parses_operations() {
        let list = ListOperationsResponse::from_json(serde_json::json!({
            "operations": [
                {"name": "projects/p/locations/l/operations/1", "done": false},
                {"name": "projects/p/locations/l/operations/2", "done": true,
                 "error": {"code": 1, "message": "cancelled by caller"}}
            ],
            "nextPageToken": "after-2"
        }))
        .unwrap();

        assert_eq!(list.operations.len(), 2);
        assert_eq!(list.operations[1].error().unwrap().code, Code::Cancelled);
        assert_eq!(list.next_page_token, "after-2");
    }
}
