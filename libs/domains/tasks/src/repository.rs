use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{Task, TaskFilter};

/// Repository trait for Task persistence
///
/// The service only needs these five operations; any store that can hold a
/// `Task` by id can implement it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task and return it as stored
    async fn create(&self, task: Task) -> TaskResult<Task>;

    /// Get a task by ID
    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// List tasks matching the filter, in insertion order
    async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// Replace an existing task; `NotFound` if it does not exist
    async fn update(&self, task: Task) -> TaskResult<Task>;

    /// Delete a task by ID. Deleting a missing task succeeds.
    async fn delete(&self, id: Uuid) -> TaskResult<()>;
}
