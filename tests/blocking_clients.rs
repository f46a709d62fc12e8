//! Blocking-client tests. A manually driven runtime hosts the mock server;
//! the blocking clients run on the test thread itself.
#![cfg(feature = "blocking")]

use aiplatform::blocking::{BlockingModelServiceClient, BlockingRestTransport};
use aiplatform::testing::BlockingStubTransport;
use aiplatform::{CallOptions, ClientOptions, Code, Credentials, Error};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BlockingModelServiceClient<BlockingRestTransport> {
    BlockingModelServiceClient::rest(
        ClientOptions::new()
            .with_endpoint(server.uri())
            .with_credentials(Credentials::api_key("test-key")),
    )
    .unwrap()
}

#[test]
fn get_model_blocks_to_completion() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/p/locations/l/models/m"))
            .and(header(
                "x-goog-request-params",
                "name=projects/p/locations/l/models/m",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/p/locations/l/models/m",
                "displayName": "classifier"
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let model = client(&server)
        .get_model("projects/p/locations/l/models/m", CallOptions::new())
        .unwrap();
    assert_eq!(model.display_name, "classifier");
}

#[test]
fn list_models_iterates_across_pages() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/p/locations/l/models"))
            .and(query_param("pageToken", "t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{"name": "projects/p/locations/l/models/c"}],
                "nextPageToken": ""
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/p/locations/l/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [
                    {"name": "projects/p/locations/l/models/a"},
                    {"name": "projects/p/locations/l/models/b"}
                ],
                "nextPageToken": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let pager = client(&server)
        .list_models("projects/p/locations/l", CallOptions::new())
        .unwrap();
    let names: Vec<String> = pager.map(|model| model.unwrap().name).collect();
    assert_eq!(
        names,
        [
            "projects/p/locations/l/models/a",
            "projects/p/locations/l/models/b",
            "projects/p/locations/l/models/c"
        ]
    );
}

#[test]
fn error_envelopes_map_to_service_errors() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects/p/locations/l/models/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "model not found", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;
        server
    });

    let err = client(&server)
        .get_model("projects/p/locations/l/models/missing", CallOptions::new())
        .unwrap_err();
    assert_eq!(err.code(), Some(Code::NotFound));
}

#[test]
fn stubbed_operation_polls_without_a_runtime() {
    let stub = BlockingStubTransport::new()
        .respond(json!({
            "name": "projects/p/locations/l/operations/9",
            "done": false
        }))
        .respond(json!({
            "name": "projects/p/locations/l/operations/9",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.cloud.aiplatform.v1.UploadModelResponse",
                "model": "projects/p/locations/l/models/m",
                "modelVersionId": "1"
            }
        }));
    let client =
        BlockingModelServiceClient::from_transport(stub.clone(), ClientOptions::new()).unwrap();

    let args = aiplatform::UploadModelArgs::new("projects/p/locations/l", Default::default());
    let mut future = client.upload_model(args, CallOptions::new()).unwrap();
    assert!(!future.done());
    assert!(future.poll().unwrap());
    assert_eq!(future.result().unwrap().model_version_id, "1");

    let calls = stub.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, "UploadModel");
    assert_eq!(calls[1].method, "GetOperation");
}

#[test]
fn conflicting_arguments_fail_before_dispatch() {
    let stub = BlockingStubTransport::new();
    let client =
        BlockingModelServiceClient::from_transport(stub.clone(), ClientOptions::new()).unwrap();
    let args = aiplatform::GetModelArgs {
        request: Some(aiplatform::GetModelRequest {
            name: "projects/p/locations/l/models/m".into(),
        }),
        name: Some("projects/p/locations/l/models/other".into()),
    };
    let err = client.get_model(args, CallOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(stub.calls().is_empty());
}
