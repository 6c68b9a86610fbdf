//! HTTP API routes for the workflow service

use crate::models::workflow::WorkflowDefinition;
use crate::workflow::{WorkflowError, WorkflowService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::Filter;

/// Request body for POST /api/workflow/instances
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInstanceRequest {
    pub definition_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create HTTP API routes
pub fn create_api_routes(
    service: Arc<WorkflowService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map(move || Arc::clone(&service));

    // POST /api/workflow/definitions - Create a definition
    let post_definition = warp::path!("api" / "workflow" / "definitions")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_create_definition);

    // GET /api/workflow/definitions - List all definitions
    let get_definitions = warp::path!("api" / "workflow" / "definitions")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_list_definitions);

    // GET /api/workflow/definitions/:id - Get a definition
    let get_definition = warp::path!("api" / "workflow" / "definitions" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_definition);

    // POST /api/workflow/instances - Start an instance
    let post_instance = warp::path!("api" / "workflow" / "instances")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_start_instance);

    // POST /api/workflow/instances/:id/actions/:actionId - Execute an action
    let post_action = warp::path!("api" / "workflow" / "instances" / Uuid / "actions" / String)
        .and(warp::post())
        .and(service_filter.clone())
        .and_then(handle_execute_action);

    // GET /api/workflow/instances/:id - Get an instance
    let get_instance = warp::path!("api" / "workflow" / "instances" / Uuid)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_instance);

    // GET /api/health - Health check endpoint
    let get_health = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(handle_get_health);

    post_definition
        .or(get_definitions)
        .or(get_definition)
        .or(post_instance)
        .or(post_action)
        .or(get_instance)
        .or(get_health)
}

/// Status code for a service error: absence maps differently from
/// client-caused validation/execution failures.
fn error_status(err: &WorkflowError) -> StatusCode {
    if err.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match err {
        WorkflowError::DefinitionExists(_) => StatusCode::CONFLICT,
        WorkflowError::Validation(_) | WorkflowError::Execution(_) => StatusCode::BAD_REQUEST,
        WorkflowError::InvalidDefinition(_) | WorkflowError::Storage(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

fn error_reply(err: &WorkflowError) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": err.to_string() })),
        error_status(err),
    )
}

/// Handle POST /api/workflow/definitions
async fn handle_create_definition(
    definition: WorkflowDefinition,
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.create_definition(definition).await {
        Ok(created) => Ok(warp::reply::with_status(
            warp::reply::json(&created),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

/// Handle GET /api/workflow/definitions
async fn handle_list_definitions(
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let definitions = service.list_definitions().await;
    Ok(warp::reply::with_status(
        warp::reply::json(&definitions),
        StatusCode::OK,
    ))
}

/// Handle GET /api/workflow/definitions/:id
async fn handle_get_definition(
    id: String,
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.get_definition(&id).await {
        Some(definition) => Ok(warp::reply::with_status(
            warp::reply::json(&definition),
            StatusCode::OK,
        )),
        None => Ok(error_reply(&WorkflowError::DefinitionNotFound(id))),
    }
}

/// Handle POST /api/workflow/instances
async fn handle_start_instance(
    request: StartInstanceRequest,
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.start_instance(&request.definition_id).await {
        Ok(instance) => Ok(warp::reply::with_status(
            warp::reply::json(&instance),
            StatusCode::CREATED,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

/// Handle POST /api/workflow/instances/:id/actions/:actionId
async fn handle_execute_action(
    instance_id: Uuid,
    action_id: String,
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.execute_action(instance_id, &action_id).await {
        Ok(instance) => Ok(warp::reply::with_status(
            warp::reply::json(&instance),
            StatusCode::OK,
        )),
        Err(err) => Ok(error_reply(&err)),
    }
}

/// Handle GET /api/workflow/instances/:id
async fn handle_get_instance(
    id: Uuid,
    service: Arc<WorkflowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.get_instance(id).await {
        Some(instance) => Ok(warp::reply::with_status(
            warp::reply::json(&instance),
            StatusCode::OK,
        )),
        None => Ok(error_reply(&WorkflowError::InstanceNotFound(id))),
    }
}

/// Handle GET /api/health
async fn handle_get_health() -> Result<impl warp::Reply, warp::Rejection> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&response),
        StatusCode::OK,
    ))
}
