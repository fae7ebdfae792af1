use axum::{
    Json, Router,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::hydration::HydrationServiceError;
use crate::hydration::api::{HydrationState, create_hydration_router};
use crate::task::TaskServiceError;
use crate::task::api::{TaskState, create_task_router};
use crate::validation::{FieldViolation, ValidationErrors};

/// JSON response for API errors
#[derive(serde::Serialize, serde::Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error code
    pub error: String,
    /// Human readable error message
    pub message: String,
    /// Offending fields, present only for validation errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            violations: Vec::new(),
        }
    }
}

/// Error type for JSON API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The identifier in the path is missing or blank.
    #[error("Invalid ID")]
    InvalidId,
    /// The request body is not JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Any other failure of the database.
    #[error("Database error: {0}")]
    Store(#[from] sea_orm::DbErr),
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::TaskNotFound(_) => ApiError::NotFound("Task"),
            TaskServiceError::Database(db_err) => ApiError::Store(db_err),
        }
    }
}

impl From<HydrationServiceError> for ApiError {
    fn from(err: HydrationServiceError) -> Self {
        match err {
            HydrationServiceError::RecordMissing => ApiError::NotFound("Water hydration record"),
            HydrationServiceError::Database(db_err) => ApiError::Store(db_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    violations: errors.into_violations(),
                    ..ErrorResponse::new("VALIDATION_ERROR", "Invalid data")
                },
            ),
            ApiError::InvalidId => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_ID", "Invalid ID"),
            ),
            ApiError::InvalidBody(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_BODY", message),
            ),
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("NOT_FOUND", format!("{resource} not found")),
            ),
            ApiError::Store(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An unexpected error occurred while processing your request. Please try again later.",
                    ),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Raw JSON request body. Rejections are reported as `400 INVALID_BODY` in the API error format
/// instead of axum's plain text responses.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::warn!("Rejected request body: {:?}", rejection);
                Err(ApiError::InvalidBody(body_rejection_message(&rejection)))
            }
        }
    }
}

fn body_rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        _ => rejection.body_text(),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::list_tasks_handler,
        crate::task::api::get_task_handler,
        crate::task::api::create_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
        crate::hydration::api::list_hydration_handler,
        crate::hydration::api::record_liters_handler,
    ),
    components(schemas(
        crate::task::api::TaskJson,
        crate::task::api::CreateTaskRequest,
        crate::task::api::UpdateTaskRequest,
        crate::hydration::api::HydrationJson,
        crate::hydration::api::RecordLitersRequest,
        ErrorResponse,
        FieldViolation,
    )),
    tags(
        (name = "Tasks", description = "To-do list"),
        (name = "Water hydration", description = "Daily water intake counter")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api-docs/openapi.json - Returns the OpenAPI document.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(
    task_state: Arc<TaskState>,
    hydration_state: Arc<HydrationState>,
) -> Router {
    Router::new()
        .merge(create_task_router(task_state))
        .merge(create_hydration_router(hydration_state))
        .route("/api-docs/openapi.json", get(openapi_handler))
}
