//! JSON-transport integration tests for the ModelService facade.

use aiplatform::{
    CallOptions, ClientOptions, Code, Credentials, Error, ModelServiceClient, RestTransport,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> ModelServiceClient<RestTransport> {
    ModelServiceClient::rest(
        ClientOptions::new()
            .with_endpoint(server.uri())
            .with_credentials(Credentials::api_key("test-key")),
    )
    .unwrap()
}

#[tokio::test]
async fn get_model_routes_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/p/locations/l/models/m"))
        .and(header(
            "x-goog-request-params",
            "name=projects/p/locations/l/models/m",
        ))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/locations/l/models/m",
            "displayName": "classifier",
            "versionId": "3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = client(&server)
        .await
        .get_model("projects/p/locations/l/models/m", CallOptions::new())
        .await
        .unwrap();
    assert_eq!(model.display_name, "classifier");
    assert_eq!(model.version_id, "3");
}

#[tokio::test]
async fn list_models_pages_through_tokens() {
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

    let mut pager = client(&server)
        .await
        .list_models("projects/p/locations/l", CallOptions::new())
        .await
        .unwrap();
    let mut names = Vec::new();
    while let Some(model) = pager.next().await {
        names.push(model.unwrap().name);
    }
    assert_eq!(
        names,
        [
            "projects/p/locations/l/models/a",
            "projects/p/locations/l/models/b",
            "projects/p/locations/l/models/c"
        ]
    );
}

#[tokio::test]
async fn update_model_patches_with_a_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/projects/p/locations/l/models/m"))
        .and(query_param("updateMask", "display_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/locations/l/models/m",
            "displayName": "renamed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let args = aiplatform::UpdateModelArgs::new(
        aiplatform::Model {
            name: "projects/p/locations/l/models/m".into(),
            display_name: "renamed".into(),
            ..Default::default()
        },
        aiplatform::FieldMask::new(["display_name"]),
    );
    let model = client(&server)
        .await
        .update_model(args, CallOptions::new())
        .await
        .unwrap();
    assert_eq!(model.display_name, "renamed");
}

#[tokio::test]
async fn error_envelopes_map_to_service_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/p/locations/l/models/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "model not found",
                "status": "NOT_FOUND"
            }
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .get_model("projects/p/locations/l/models/missing", CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(Code::NotFound));
    match err {
        Error::Service(service) => assert_eq!(service.message, "model not found"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn retryable_statuses_are_retried_to_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/p/locations/l/models/m"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/p/locations/l/models/m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/p/locations/l/models/m"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = aiplatform::RetryPolicy {
        initial_delay: std::time::Duration::from_millis(5),
        max_delay: std::time::Duration::from_millis(5),
        multiplier: 1.0,
        total_timeout: std::time::Duration::from_secs(5),
        codes: vec![Code::Unavailable],
    };
    let model = client(&server)
        .await
        .get_model(
            "projects/p/locations/l/models/m",
            CallOptions::new().with_retry(policy),
        )
        .await
        .unwrap();
    assert_eq!(model.name, "projects/p/locations/l/models/m");
}
