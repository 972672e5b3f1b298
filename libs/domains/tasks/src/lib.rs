//! Tasks Domain
//!
//! Task CRUD with a "due soon" side effect: whenever a created or updated
//! task is due within 24 hours, one notification payload is appended to the
//! notification queue.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routes under /tasks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌──────────────┐
//! │   Service   │ ───► │   Notifier   │  ← QueueNotifier (RPUSH)
//! └──────┬──────┘      └──────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + in-memory implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task, DueDate, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_tasks::{InMemoryTaskRepository, QueueNotifier, TaskService, handlers};
//! use queue_worker::RedisQueueStore;
//!
//! let notifier = QueueNotifier::for_store(Arc::new(RedisQueueStore::new(redis)));
//! let service = TaskService::new(InMemoryTaskRepository::new(), notifier);
//! let app = handlers::router(service);
//! ```

pub mod due_date;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod notifier;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use due_date::{DUE_SOON_HORIZON, DueDate};
pub use error::{DomainError, TaskError, TaskResult};
pub use memory::InMemoryTaskRepository;
pub use models::{CreateTask, Task, TaskFilter, TaskResponse, TaskStatus, UpdateTask};
pub use notifier::{Notifier, QueueNotifier};
pub use repository::TaskRepository;
pub use service::TaskService;
