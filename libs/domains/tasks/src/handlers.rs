//! HTTP surface for tasks.
//!
//! | Method | Path          | Success                     |
//! |--------|---------------|-----------------------------|
//! | POST   | `/tasks`      | 201 + task                  |
//! | GET    | `/tasks`      | 200 + tasks (`?status=`)    |
//! | GET    | `/tasks/{id}` | 200 + task                  |
//! | PUT    | `/tasks/{id}` | 200 + task                  |
//! | DELETE | `/tasks/{id}` | 204, also for unknown ids   |

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::AppError;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::TaskError;
use crate::models::{CreateTask, TaskFilter, TaskResponse, UpdateTask};
use crate::notifier::Notifier;
use crate::repository::TaskRepository;
use crate::service::TaskService;

type ApiResult<T> = Result<T, AppError>;

/// Router serving the task endpoints under `/tasks`.
pub fn router<R, N>(service: TaskService<R, N>) -> Router
where
    R: TaskRepository + 'static,
    N: Notifier + 'static,
{
    let shared_service = Arc::new(service);

    let routes = Router::new()
        .route("/", get(list_tasks::<R, N>).post(create_task::<R, N>))
        .route(
            "/{id}",
            get(get_task::<R, N>)
                .put(update_task::<R, N>)
                .delete(delete_task::<R, N>),
        )
        .with_state(shared_service);

    Router::new().nest("/tasks", routes)
}

/// An id that is not a UUID cannot name a stored task.
fn parse_task_id(raw: &str) -> Result<Uuid, TaskError> {
    Uuid::parse_str(raw).map_err(|_| TaskError::not_found(raw))
}

pub async fn create_task<R: TaskRepository, N: Notifier>(
    State(service): State<Arc<TaskService<R, N>>>,
    input: Result<Json<CreateTask>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = input?;
    let task = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks<R: TaskRepository, N: Notifier>(
    State(service): State<Arc<TaskService<R, N>>>,
    filter: Result<Query<TaskFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let Query(filter) = filter?;
    let tasks = service.list(filter).await?;
    Ok(Json(tasks))
}

pub async fn get_task<R: TaskRepository, N: Notifier>(
    State(service): State<Arc<TaskService<R, N>>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = service.get(parse_task_id(&id)?).await?;
    Ok(Json(task))
}

pub async fn update_task<R: TaskRepository, N: Notifier>(
    State(service): State<Arc<TaskService<R, N>>>,
    Path(id): Path<String>,
    input: Result<Json<UpdateTask>, JsonRejection>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_task_id(&id)?;
    let Json(input) = input?;
    let task = service.update(task_id, input).await?;
    Ok(Json(task))
}

pub async fn delete_task<R: TaskRepository, N: Notifier>(
    State(service): State<Arc<TaskService<R, N>>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if let Ok(task_id) = Uuid::parse_str(&id) {
        service.delete(task_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
