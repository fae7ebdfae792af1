use crate::entities::*;
use chrono::{DateTime, FixedOffset};
use sea_orm::*;

pub mod api;

pub use crate::entities::sea_orm_active_enums::{TaskStatus, TimeOfDay};

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: String,
    title: String,
    description: String,
    time: TimeOfDay,
    status: TaskStatus,
    created_at: DateTime<FixedOffset>,
    updated_at: DateTime<FixedOffset>,
}

impl Task {
    /// Returns the ID of the task.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the slot of the day the task is planned for.
    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    /// Returns the status of the task.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<FixedOffset> {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            time: model.time,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A validated task that is ready to be persisted.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub time: TimeOfDay,
    pub status: TaskStatus,
}

/// A validated set of changes to merge into an existing task.
#[derive(Debug, PartialEq, Clone, Eq, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time: Option<TimeOfDay>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Returns `true` when the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.time.is_none()
            && self.status.is_none()
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a task not found error.
    #[error("Task with ID '{0}' not found")]
    TaskNotFound(String),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The validated task fields.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(new_task.title),
            description: ActiveValue::Set(new_task.description),
            time: ActiveValue::Set(new_task.time),
            status: ActiveValue::Set(new_task.status),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task {}", created_model.id);
        Ok(Task::from(created_model))
    }

    /// Retrieves all tasks, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: &str) -> Result<Task, TaskServiceError> {
        let task_model = self.find_model(id).await?;
        Ok(Task::from(task_model))
    }

    /// Merges the supplied fields into an existing task.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `patch` - The fields to change. Omitted fields keep their current value.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_by_id(
        &self,
        id: &str,
        patch: TaskPatch,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = self.find_model(id).await?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        if let Some(title) = patch.title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(description) = patch.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(time) = patch.time {
            active_model.time = ActiveValue::Set(time);
        }
        if let Some(status) = patch.status {
            active_model.status = ActiveValue::Set(status);
        }

        // The row can disappear between the lookup and the update.
        let updated_model = match active_model.update(self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                return Err(TaskServiceError::TaskNotFound(id.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Task::from(updated_model))
    }

    /// Deletes a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: &str) -> Result<Task, TaskServiceError> {
        let task_to_delete = self.find_model(id).await?;

        let task_copy = Task::from(task_to_delete.clone());
        let result = task::Entity::delete_by_id(task_to_delete.id)
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id.to_string()));
        }
        Ok(task_copy)
    }

    async fn find_model(&self, id: &str) -> Result<task::Model, TaskServiceError> {
        task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| TaskServiceError::TaskNotFound(id.to_string()))
    }
}
