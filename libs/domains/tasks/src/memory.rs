use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskFilter};
use crate::repository::TaskRepository;

/// Process-local task store that keeps insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(TaskError::Repository(format!(
                "task {} already exists",
                task.id
            )));
        }
        tasks.push(task.clone());
        debug!(task_id = %task.id, "Stored task");
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn update(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| TaskError::not_found(task.id))?;
        *slot = task.clone();
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<()> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() < before {
            debug!(task_id = %id, "Deleted task");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    fn task(title: &str) -> Task {
        Task::new(Uuid::now_v7(), title, None, None, TaskStatus::Pending).unwrap()
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryTaskRepository::new();
        for title in ["Task 1", "Task 2", "Task 3"] {
            repo.create(task(title)).await.unwrap();
        }

        let titles: Vec<_> = repo
            .find_all(TaskFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["Task 1", "Task 2", "Task 3"]);
    }

    #[tokio::test]
    async fn test_find_all_filters_by_status() {
        let repo = InMemoryTaskRepository::new();
        repo.create(task("Task 1")).await.unwrap();
        let mut second = repo.create(task("Task 2")).await.unwrap();
        second.status = TaskStatus::Completed;
        repo.update(second).await.unwrap();

        let pending = repo
            .find_all(TaskFilter::with_status(TaskStatus::Pending))
            .await
            .unwrap();
        let completed = repo
            .find_all(TaskFilter::with_status(TaskStatus::Completed))
            .await
            .unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Task 1");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "Task 2");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let repo = InMemoryTaskRepository::new();
        let t = task("Task 1");
        repo.create(t.clone()).await.unwrap();

        let err = repo.create(t).await.unwrap_err();
        assert!(matches!(err, TaskError::Repository(_)));
        assert_eq!(repo.find_all(TaskFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let repo = InMemoryTaskRepository::new();
        let err = repo.update(task("ghost")).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryTaskRepository::new();
        let t = repo.create(task("Task 1")).await.unwrap();

        repo.delete(t.id).await.unwrap();
        repo.delete(t.id).await.unwrap();
        repo.delete(Uuid::now_v7()).await.unwrap();

        assert!(repo.find_all(TaskFilter::default()).await.unwrap().is_empty());
        assert!(repo.find_by_id(t.id).await.unwrap().is_none());
    }
}
