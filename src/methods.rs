//! Marker types for every RPC on the model, garden, and pool services.
//!
//! Each marker pairs the request/response messages with the method's static
//! descriptor. The operations surface lives in [`crate::operations`].

use crate::descriptor::{
    BodySelector, HttpRule, HttpVerb, LroMethod, Method, MethodDescriptor, PagedMethod,
    ResultKind, IDEMPOTENT_RETRY, NO_RETRY,
};
use crate::operation::Operation;
use crate::types::*;

// ---------------------------------------------------------------------------
// ModelService
// ---------------------------------------------------------------------------

/// `ModelService.UploadModel`.
pub struct UploadModel;

impl Method for UploadModel {
    type Request = UploadModelRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "UploadModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/UploadModel",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{parent=projects/*/locations/*}/models:upload",
            body: BodySelector::Wildcard,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl LroMethod for UploadModel {
    type OperationResult = UploadModelResponse;
    type OperationMetadata = UploadModelOperationMetadata;
}

/// `ModelService.GetModel`.
pub struct GetModel;

impl Method for GetModel {
    type Request = GetModelRequest;
    type Response = Model;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/GetModel",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*/models/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

/// `ModelService.ListModels`.
pub struct ListModels;

impl Method for ListModels {
    type Request = ListModelsRequest;
    type Response = ListModelsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListModels",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/ListModels",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{parent=projects/*/locations/*}/models",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl PagedMethod for ListModels {
    type Item = Model;

    fn into_items(response: Self::Response) -> Vec<Model> {
        response.models
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

/// `ModelService.UpdateModel`.
pub struct UpdateModel;

impl Method for UpdateModel {
    type Request = UpdateModelRequest;
    type Response = Model;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "UpdateModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/UpdateModel",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Patch,
            template: "/v1/{model.name=projects/*/locations/*/models/*}",
            body: BodySelector::Field("model"),
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        let name = request
            .model
            .as_ref()
            .map(|m| m.name.clone())
            .unwrap_or_default();
        vec![("model.name", name)]
    }
}

/// `ModelService.DeleteModel`.
pub struct DeleteModel;

impl Method for DeleteModel {
    type Request = DeleteModelRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "DeleteModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/DeleteModel",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Delete,
            template: "/v1/{name=projects/*/locations/*/models/*}",
            body: BodySelector::None,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

impl LroMethod for DeleteModel {
    type OperationResult = Empty;
    type OperationMetadata = DeleteOperationMetadata;
}

/// `ModelService.ExportModel`.
pub struct ExportModel;

impl Method for ExportModel {
    type Request = ExportModelRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ExportModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/ExportModel",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{name=projects/*/locations/*/models/*}:export",
            body: BodySelector::Wildcard,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

impl LroMethod for ExportModel {
    type OperationResult = ExportModelResponse;
    type OperationMetadata = ExportModelOperationMetadata;
}

/// `ModelService.ImportModelEvaluation`.
pub struct ImportModelEvaluation;

impl Method for ImportModelEvaluation {
    type Request = ImportModelEvaluationRequest;
    type Response = ModelEvaluation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ImportModelEvaluation",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/ImportModelEvaluation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{parent=projects/*/locations/*/models/*}/evaluations:import",
            body: BodySelector::Wildcard,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

/// `ModelService.GetModelEvaluation`.
pub struct GetModelEvaluation;

impl Method for GetModelEvaluation {
    type Request = GetModelEvaluationRequest;
    type Response = ModelEvaluation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetModelEvaluation",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/GetModelEvaluation",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*/models/*/evaluations/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

/// `ModelService.ListModelEvaluations`.
pub struct ListModelEvaluations;

impl Method for ListModelEvaluations {
    type Request = ListModelEvaluationsRequest;
    type Response = ListModelEvaluationsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListModelEvaluations",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/ListModelEvaluations",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{parent=projects/*/locations/*/models/*}/evaluations",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl PagedMethod for ListModelEvaluations {
    type Item = ModelEvaluation;

    fn into_items(response: Self::Response) -> Vec<ModelEvaluation> {
        response.model_evaluations
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

/// `ModelService.GetModelEvaluationSlice`.
pub struct GetModelEvaluationSlice;

impl Method for GetModelEvaluationSlice {
    type Request = GetModelEvaluationSliceRequest;
    type Response = ModelEvaluationSlice;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetModelEvaluationSlice",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/GetModelEvaluationSlice",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*/models/*/evaluations/*/slices/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

/// `ModelService.ListModelEvaluationSlices`.
pub struct ListModelEvaluationSlices;

impl Method for ListModelEvaluationSlices {
    type Request = ListModelEvaluationSlicesRequest;
    type Response = ListModelEvaluationSlicesResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListModelEvaluationSlices",
        grpc_path: "/google.cloud.aiplatform.v1.ModelService/ListModelEvaluationSlices",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{parent=projects/*/locations/*/models/*/evaluations/*}/slices",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl PagedMethod for ListModelEvaluationSlices {
    type Item = ModelEvaluationSlice;

    fn into_items(response: Self::Response) -> Vec<ModelEvaluationSlice> {
        response.model_evaluation_slices
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

// ---------------------------------------------------------------------------
// ModelGardenService
// ---------------------------------------------------------------------------

/// `ModelGardenService.GetPublisherModel`.
pub struct GetPublisherModel;

impl Method for GetPublisherModel {
    type Request = GetPublisherModelRequest;
    type Response = PublisherModel;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetPublisherModel",
        grpc_path: "/google.cloud.aiplatform.v1.ModelGardenService/GetPublisherModel",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=publishers/*/models/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

/// `ModelGardenService.ListPublisherModels`.
pub struct ListPublisherModels;

impl Method for ListPublisherModels {
    type Request = ListPublisherModelsRequest;
    type Response = ListPublisherModelsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListPublisherModels",
        grpc_path: "/google.cloud.aiplatform.v1.ModelGardenService/ListPublisherModels",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{parent=publishers/*}/models",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl PagedMethod for ListPublisherModels {
    type Item = PublisherModel;

    fn into_items(response: Self::Response) -> Vec<PublisherModel> {
        response.publisher_models
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

/// `ModelGardenService.Deploy`.
pub struct Deploy;

impl Method for Deploy {
    type Request = DeployRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "Deploy",
        grpc_path: "/google.cloud.aiplatform.v1.ModelGardenService/Deploy",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{destination=projects/*/locations/*}:deploy",
            body: BodySelector::Wildcard,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("destination", request.destination.clone())]
    }
}

impl LroMethod for Deploy {
    type OperationResult = DeployResponse;
    type OperationMetadata = DeployOperationMetadata;
}

// ---------------------------------------------------------------------------
// DeploymentResourcePoolService
// ---------------------------------------------------------------------------

/// `DeploymentResourcePoolService.CreateDeploymentResourcePool`.
pub struct CreateDeploymentResourcePool;

impl Method for CreateDeploymentResourcePool {
    type Request = CreateDeploymentResourcePoolRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "CreateDeploymentResourcePool",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/CreateDeploymentResourcePool",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Post,
            template: "/v1/{parent=projects/*/locations/*}/deploymentResourcePools",
            body: BodySelector::Wildcard,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl LroMethod for CreateDeploymentResourcePool {
    type OperationResult = DeploymentResourcePool;
    type OperationMetadata = CreateDeploymentResourcePoolOperationMetadata;
}

/// `DeploymentResourcePoolService.GetDeploymentResourcePool`.
pub struct GetDeploymentResourcePool;

impl Method for GetDeploymentResourcePool {
    type Request = GetDeploymentResourcePoolRequest;
    type Response = DeploymentResourcePool;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "GetDeploymentResourcePool",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/GetDeploymentResourcePool",
        kind: ResultKind::Unary,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{name=projects/*/locations/*/deploymentResourcePools/*}",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

/// `DeploymentResourcePoolService.ListDeploymentResourcePools`.
pub struct ListDeploymentResourcePools;

impl Method for ListDeploymentResourcePools {
    type Request = ListDeploymentResourcePoolsRequest;
    type Response = ListDeploymentResourcePoolsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "ListDeploymentResourcePools",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/ListDeploymentResourcePools",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template: "/v1/{parent=projects/*/locations/*}/deploymentResourcePools",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("parent", request.parent.clone())]
    }
}

impl PagedMethod for ListDeploymentResourcePools {
    type Item = DeploymentResourcePool;

    fn into_items(response: Self::Response) -> Vec<DeploymentResourcePool> {
        response.deployment_resource_pools
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

/// `DeploymentResourcePoolService.UpdateDeploymentResourcePool`.
pub struct UpdateDeploymentResourcePool;

impl Method for UpdateDeploymentResourcePool {
    type Request = UpdateDeploymentResourcePoolRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "UpdateDeploymentResourcePool",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/UpdateDeploymentResourcePool",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Patch,
            template:
                "/v1/{deployment_resource_pool.name=projects/*/locations/*/deploymentResourcePools/*}",
            body: BodySelector::Field("deployment_resource_pool"),
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        let name = request
            .deployment_resource_pool
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        vec![("deployment_resource_pool.name", name)]
    }
}

impl LroMethod for UpdateDeploymentResourcePool {
    type OperationResult = DeploymentResourcePool;
    type OperationMetadata = UpdateDeploymentResourcePoolOperationMetadata;
}

/// `DeploymentResourcePoolService.DeleteDeploymentResourcePool`.
pub struct DeleteDeploymentResourcePool;

impl Method for DeleteDeploymentResourcePool {
    type Request = DeleteDeploymentResourcePoolRequest;
    type Response = Operation;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "DeleteDeploymentResourcePool",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/DeleteDeploymentResourcePool",
        kind: ResultKind::Lro,
        http: HttpRule {
            verb: HttpVerb::Delete,
            template: "/v1/{name=projects/*/locations/*/deploymentResourcePools/*}",
            body: BodySelector::None,
        },
        retry: NO_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![("name", request.name.clone())]
    }
}

impl LroMethod for DeleteDeploymentResourcePool {
    type OperationResult = Empty;
    type OperationMetadata = DeleteOperationMetadata;
}

/// `DeploymentResourcePoolService.QueryDeployedModels`.
pub struct QueryDeployedModels;

impl Method for QueryDeployedModels {
    type Request = QueryDeployedModelsRequest;
    type Response = QueryDeployedModelsResponse;

    const DESCRIPTOR: MethodDescriptor = MethodDescriptor {
        name: "QueryDeployedModels",
        grpc_path:
            "/google.cloud.aiplatform.v1.DeploymentResourcePoolService/QueryDeployedModels",
        kind: ResultKind::Paged,
        http: HttpRule {
            verb: HttpVerb::Get,
            template:
                "/v1/{deployment_resource_pool=projects/*/locations/*/deploymentResourcePools/*}:queryDeployedModels",
            body: BodySelector::None,
        },
        retry: IDEMPOTENT_RETRY,
    };

    fn routing_params(request: &Self::Request) -> Vec<(&'static str, String)> {
        vec![(
            "deployment_resource_pool",
            request.deployment_resource_pool.clone(),
        )]
    }
}

impl PagedMethod for QueryDeployedModels {
    type Item = DeployedModel;

    fn into_items(response: Self::Response) -> Vec<DeployedModel> {
        response.deployed_models
    }

    fn next_page_token(response: &Self::Response) -> &str {
        &response.next_page_token
    }

    fn set_page_token(request: &mut Self::Request, token: String) {
        request.page_token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_model_routes_on_name() {
        let request = GetModelRequest {
            name: "projects/p/locations/l/models/m".into(),
        };
        assert_eq!(
            GetModel::routing_params(&request),
            vec![("name", "projects/p/locations/l/models/m".to_string())]
        );
    }

    #[test]
    fn update_model_routes_on_nested_name() {
        let request = UpdateModelRequest {
            model: Some(Model {
                name: "projects/p/locations/l/models/m".into(),
                ..Default::default()
            }),
            update_mask: None,
        };
        assert_eq!(
            UpdateModel::routing_params(&request),
            vec![("model.name", "projects/p/locations/l/models/m".to_string())]
        );

        let empty = UpdateModelRequest::default();
        assert_eq!(
            UpdateModel::routing_params(&empty),
            vec![("model.name", String::new())]
        );
    }

    #[test]
    fn paged_markers_thread_tokens() {
        let mut request = ListModelsRequest {
            parent: "projects/p/locations/l".into(),
            ..Default::default()
        };
        ListModels::set_page_token(&mut request, "t".into());
        assert_eq!(request.page_token, "t");

        let response = ListModelsResponse {
            models: vec![Model::default()],
            next_page_token: "u".into(),
        };
        assert_eq!(ListModels::next_page_token(&response), "u");
        assert_eq!(ListModels::into_items(response).len(), 1);
    }

    #[test]
    fn descriptors_are_well_formed() {
        for descriptor in [
            UploadModel::DESCRIPTOR,
            GetModel::DESCRIPTOR,
            ListModels::DESCRIPTOR,
            UpdateModel::DESCRIPTOR,
            DeleteModel::DESCRIPTOR,
            ExportModel::DESCRIPTOR,
            ImportModelEvaluation::DESCRIPTOR,
            GetModelEvaluation::DESCRIPTOR,
            ListModelEvaluations::DESCRIPTOR,
            GetModelEvaluationSlice::DESCRIPTOR,
            ListModelEvaluationSlices::DESCRIPTOR,
            GetPublisherModel::DESCRIPTOR,
            ListPublisherModels::DESCRIPTOR,
            Deploy::DESCRIPTOR,
            CreateDeploymentResourcePool::DESCRIPTOR,
            GetDeploymentResourcePool::DESCRIPTOR,
            ListDeploymentResourcePools::DESCRIPTOR,
            UpdateDeploymentResourcePool::DESCRIPTOR,
            DeleteDeploymentResourcePool::DESCRIPTOR,
            QueryDeployedModels::DESCRIPTOR,
        ] {
            assert!(descriptor.grpc_path.starts_with("/google."), "{}", descriptor.name);
            assert!(
                descriptor.grpc_path.ends_with(descriptor.name),
                "{}",
                descriptor.name
            );
            assert!(
                descriptor.http.template.starts_with("/v1/"),
                "{}",
                descriptor.name
            );
        }
    }
}
