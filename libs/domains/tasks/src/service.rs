use domain_notifications::NotificationPayload;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::due_date::DueDate;
use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, TaskResponse, TaskStatus, UpdateTask};
use crate::notifier::Notifier;
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Persists tasks through the repository and, whenever a saved task is due
/// within the horizon, enqueues one `due_soon` notification for it.
pub struct TaskService<R: TaskRepository, N: Notifier> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R: TaskRepository, N: Notifier> Clone for TaskService<R, N> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R: TaskRepository, N: Notifier> TaskService<R, N> {
    pub fn new(repository: R, notifier: N) -> Self {
        Self::with_arc(Arc::new(repository), Arc::new(notifier))
    }

    pub fn with_arc(repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Create a task. The due date is validated before the title.
    #[instrument(skip(self, input), fields(task_title = %input.title))]
    pub async fn create(&self, input: CreateTask) -> TaskResult<TaskResponse> {
        let due_date = match input.due_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(DueDate::parse(raw)?),
            _ => None,
        };

        let task = Task::new(
            Uuid::now_v7(),
            input.title,
            input.description,
            due_date,
            TaskStatus::Pending,
        )?;

        let created = self.repository.create(task).await?;
        info!(task_id = %created.id, "Task created");

        self.dispatch_if_due_soon(&created).await?;
        Ok(TaskResponse::from(created))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<TaskResponse>> {
        let tasks = self.repository.find_all(filter).await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get(&self, id: Uuid) -> TaskResult<TaskResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(TaskResponse::from)
            .ok_or_else(|| TaskError::not_found(id))
    }

    #[instrument(skip(self, input), fields(task_id = %id))]
    pub async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<TaskResponse> {
        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskError::not_found(id))?;

        task.update(input)?;

        let updated = self.repository.update(task).await?;
        info!(task_id = %updated.id, status = %updated.status, "Task updated");

        self.dispatch_if_due_soon(&updated).await?;
        Ok(TaskResponse::from(updated))
    }

    /// Deleting an unknown id succeeds.
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn delete(&self, id: Uuid) -> TaskResult<()> {
        self.repository.delete(id).await
    }

    async fn dispatch_if_due_soon(&self, task: &Task) -> TaskResult<()> {
        let Some(due_date) = task.due_date.filter(|due| due.is_due_soon()) else {
            return Ok(());
        };

        let payload = NotificationPayload::due_soon(
            task.id.to_string(),
            task.title.clone(),
            Some(due_date.to_string()),
        );

        match self.notifier.enqueue(&payload).await {
            Ok(()) => {
                info!(task_id = %task.id, due_date = %due_date, "Queued due-soon notification");
                Ok(())
            }
            Err(e) => {
                warn!(task_id = %task.id, error = %e, "Task saved but notification enqueue failed");
                Err(TaskError::NotificationFailed {
                    task_id: task.id,
                    reason: e.to_string(),
                })
            }
        }
    }
}
