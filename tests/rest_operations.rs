//! JSON-transport integration tests for long-running operations.

use aiplatform::{
    CallOptions, ClientOptions, Code, Credentials, Error, ModelServiceClient, RestTransport,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OP_NAME: &str = "projects/p/locations/l/operations/123";
const OP_PATH: &str = "/v1/projects/p/locations/l/operations/123";

async fn client(server: &MockServer) -> ModelServiceClient<RestTransport> {
    ModelServiceClient::rest(
        ClientOptions::new()
            .with_endpoint(server.uri())
            .with_credentials(Credentials::api_key("test-key")),
    )
    .unwrap()
}

#[tokio::test]
async fn upload_model_polls_until_done() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/p/locations/l/models:upload"))
        .and(body_partial_json(json!({"model": {"displayName": "m"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    // Two pending polls, then a terminal record.
    Mock::given(method("GET"))
        .and(path(OP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": false,
            "metadata": {
                "@type": "type.googleapis.com/google.cloud.aiplatform.v1.UploadModelOperationMetadata",
                "genericMetadata": {"createTime": "2026-08-30T00:00:00Z"}
            }
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(OP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.cloud.aiplatform.v1.UploadModelResponse",
                "model": "projects/p/locations/l/models/m",
                "modelVersionId": "1"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = aiplatform::UploadModelArgs::new(
        "projects/p/locations/l",
        aiplatform::Model {
            display_name: "m".into(),
            ..Default::default()
        },
    );
    let mut future = client(&server)
        .await
        .upload_model(args, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(future.name(), OP_NAME);
    assert!(!future.done());

    assert!(!future.poll().await.unwrap());
    assert!(!future.poll().await.unwrap());
    assert!(future.poll().await.unwrap());

    let response = future.result().await.unwrap();
    assert_eq!(response.model, "projects/p/locations/l/models/m");
    assert_eq!(response.model_version_id, "1");

    // The outcome is fixed; further polls never hit the server again.
    assert!(future.poll().await.unwrap());
}

#[tokio::test]
async fn delete_model_resolves_to_empty_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/projects/p/locations/l/models/m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": true,
            "metadata": {
                "@type": "type.googleapis.com/google.cloud.aiplatform.v1.DeleteOperationMetadata",
                "genericMetadata": {"createTime": "2026-08-30T00:00:00Z"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut future = client(&server)
        .await
        .delete_model("projects/p/locations/l/models/m", CallOptions::new())
        .await
        .unwrap();
    assert!(future.done());

    let metadata = future.metadata().unwrap().unwrap();
    assert_eq!(
        metadata.generic_metadata.unwrap().create_time,
        "2026-08-30T00:00:00Z"
    );
    future.result().await.unwrap();
}

#[tokio::test]
async fn failed_operations_surface_their_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/p/locations/l/models:upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": true,
            "error": {"code": 3, "message": "unsupported artifact format"}
        })))
        .mount(&server)
        .await;

    let args = aiplatform::UploadModelArgs::new("projects/p/locations/l", Default::default());
    let mut future = client(&server)
        .await
        .upload_model(args, CallOptions::new())
        .await
        .unwrap();
    let err = future.result().await.unwrap_err();
    match err {
        Error::Operation { name, status } => {
            assert_eq!(name, OP_NAME);
            assert_eq!(status.code, Code::InvalidArgument);
            assert_eq!(status.message, "unsupported artifact format");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn cancel_is_best_effort_until_confirmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/projects/p/locations/l/models:upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{OP_PATH}:cancel")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(OP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": OP_NAME,
            "done": true,
            "error": {"code": 1, "message": "cancelled by caller"}
        })))
        .mount(&server)
        .await;

    let args = aiplatform::UploadModelArgs::new("projects/p/locations/l", Default::default());
    let mut future = client(&server)
        .await
        .upload_model(args, CallOptions::new())
        .await
        .unwrap();

    future.cancel().await.unwrap();
    // The request alone does not finish the future.
    assert!(!future.done());
    assert!(!future.cancelled());

    assert!(future.poll().await.unwrap());
    assert!(future.cancelled());
    let err = future.result().await.unwrap_err();
    assert_eq!(err.code(), Some(Code::Cancelled));
}

#[tokio::test]
async fn operations_client_lists_under_the_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/p/locations/l/operations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "operations": [
                {"name": "projects/p/locations/l/operations/1", "done": false},
                {"name": "projects/p/locations/l/operations/2", "done": true}
            ],
            "nextPageToken": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let mut pager = client
        .operations()
        .list_operations(
            aiplatform::ListOperationsRequest {
                name: "projects/p/locations/l".into(),
                ..Default::default()
            },
            CallOptions::new(),
        )
        .await
        .unwrap();

    let mut done_flags = Vec::new();
    while let Some(operation) = pager.next().await {
        done_flags.push(operation.unwrap().done);
    }
    assert_eq!(done_flags, [false, true]);
}
