use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Violations of the task and due-date rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Title cannot be empty")]
    TitleEmpty,

    /// The raw input could not be read as a point in time.
    #[error("Invalid due date value: {0}")]
    InvalidDueDate(String),

    /// Carries the canonical form of the rejected instant.
    #[error("Invalid due date: {0} (cannot be in the past)")]
    PastDueDate(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Carries the id as the caller supplied it.
    #[error("Task not found")]
    NotFound(String),

    /// The task was persisted; only the notification enqueue failed.
    #[error("Task {task_id} was saved but its notification could not be enqueued: {reason}")]
    NotificationFailed { task_id: Uuid, reason: String },

    #[error("Repository error: {0}")]
    Repository(String),
}

impl TaskError {
    pub fn not_found(id: impl ToString) -> Self {
        TaskError::NotFound(id.to_string())
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Domain(e) => AppError::ValidationError(e.to_string()),
            TaskError::NotFound(_) => AppError::NotFound("Task not found".to_string()),
            TaskError::NotificationFailed { task_id, reason } => AppError::PartialFailure {
                message: format!("Task saved but due-soon notification failed: {reason}"),
                details: json!({ "taskId": task_id }),
            },
            TaskError::Repository(msg) => {
                AppError::InternalServerError(format!("Repository error: {}", msg))
            }
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
