use crate::task::{Task, TaskService, TaskStatus, TimeOfDay};
use crate::validation::{validate_new_task, validate_task_patch};
use crate::web::api::{ApiError, ErrorResponse, JsonBody};
use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    response::Json,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier for the task
    pub id: String,
    pub title: String,
    pub description: String,
    /// Slot of the day the task is planned for
    pub time: TimeOfDay,
    pub status: TaskStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            time: task.time(),
            status: task.status(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// Request body for POST /tasks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Non-empty title
    pub title: String,
    /// Non-empty description
    pub description: String,
    /// Defaults to `morning`
    pub time: Option<TimeOfDay>,
    /// Defaults to `not_started`
    pub status: Option<TaskStatus>,
}

/// Request body for PATCH /tasks/{id}. Omitted fields are left unchanged.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time: Option<TimeOfDay>,
    pub status: Option<TaskStatus>,
}

/// Extracts the task ID from the path, rejecting blank identifiers before the store is touched.
fn task_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    match path {
        Ok(Path(id)) if !id.trim().is_empty() => Ok(id),
        Ok(_) => Err(ApiError::InvalidId),
        Err(rejection) => {
            tracing::warn!("Rejected task ID: {}", rejection);
            Err(ApiError::InvalidId)
        }
    }
}

/// Handler for GET /tasks - Returns all tasks, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskJson>>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks = service.get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for GET /tasks/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Successfully retrieved task", body = TaskJson),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = task_id(path)?;
    let service = TaskService::new(&state.db);
    let task = service.get_task_by_id(&id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for POST /tasks - Validates the body and creates a task.
#[tracing::instrument(skip(state, body))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Successfully created task", body = TaskJson),
        (status = 400, description = "Invalid data", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    JsonBody(body): JsonBody,
) -> Result<Json<TaskJson>, ApiError> {
    let new_task = validate_new_task(&body)?;
    let service = TaskService::new(&state.db);
    let task = service.create_task(new_task).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PATCH /tasks/{id} - Merges the supplied fields into a task.
#[tracing::instrument(skip(state, body))]
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "ID of the task")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Successfully updated task", body = TaskJson),
        (status = 400, description = "Invalid ID or data", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    path: Result<Path<String>, PathRejection>,
    JsonBody(body): JsonBody,
) -> Result<Json<TaskJson>, ApiError> {
    let id = task_id(path)?;
    let patch = validate_task_patch(&body)?;
    let service = TaskService::new(&state.db);
    let task = service.update_task_by_id(&id, patch).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /tasks/{id} - Removes a task and returns its final state.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Successfully deleted task", body = TaskJson),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TaskJson>, ApiError> {
    let id = task_id(path)?;
    let service = TaskService::new(&state.db);
    let task = service.delete_task_by_id(&id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for GET, PATCH and DELETE /tasks/ - The ID segment is empty.
#[tracing::instrument]
pub async fn missing_task_id_handler() -> ApiError {
    ApiError::InvalidId
}

/// Creates and returns the tasks API router.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .delete(delete_task_handler),
        )
        .route(
            "/tasks/",
            get(missing_task_id_handler)
                .patch(missing_task_id_handler)
                .delete(missing_task_id_handler),
        )
        .with_state(state)
}
