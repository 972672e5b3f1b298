//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{SecondsFormat, TimeDelta, Utc};
use domain_tasks::{InMemoryTaskRepository, QueueNotifier, TaskResponse, TaskService, handlers};
use http_body_util::BodyExt;
use queue_worker::MemoryQueueStore;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    queue: Arc<MemoryQueueStore>,
}

impl TestApp {
    fn new() -> Self {
        let queue = Arc::new(MemoryQueueStore::new());
        let service = TaskService::new(
            InMemoryTaskRepository::new(),
            QueueNotifier::for_store(queue.clone()),
        );
        Self {
            router: handlers::router(service),
            queue,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(&self, body: Value) -> TaskResponse {
        let (status, value) = self.send(Method::POST, "/tasks", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {value}");
        serde_json::from_value(value).unwrap()
    }

    fn queued(&self) -> Vec<Value> {
        self.queue
            .items("task_notifications")
            .iter()
            .map(|raw| serde_json::from_str(raw).unwrap())
            .collect()
    }
}

fn in_hours(hours: i64) -> String {
    (Utc::now() + TimeDelta::hours(hours)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[tokio::test]
async fn test_create_without_due_date() {
    let app = TestApp::new();
    let created = app
        .create(json!({ "title": "Test Task", "description": "Test Description" }))
        .await;

    assert_eq!(created.title, "Test Task");
    assert_eq!(created.description.as_deref(), Some("Test Description"));
    assert!(created.due_date.is_none());
    assert_eq!(created.status.to_string(), "pending");
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn test_create_due_soon_enqueues_payload() {
    let app = TestApp::new();
    let due = in_hours(12);
    let created = app.create(json!({ "title": "Pay rent", "dueDate": due })).await;

    assert_eq!(created.due_date.as_deref(), Some(due.as_str()));
    assert_eq!(
        app.queued(),
        vec![json!({
            "type": "due_soon",
            "taskId": created.id.to_string(),
            "title": "Pay rent",
            "dueDate": due,
        })]
    );
}

#[tokio::test]
async fn test_create_far_due_date_does_not_enqueue() {
    let app = TestApp::new();
    app.create(json!({ "title": "Plan trip", "dueDate": in_hours(48) }))
        .await;
    assert!(app.queued().is_empty());
}

#[tokio::test]
async fn test_create_missing_title_is_unprocessable() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/tasks",
            Some(json!({ "description": "Test Description" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_create_blank_title_is_validation_error() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/tasks", Some(json!({ "title": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Title cannot be empty");
}

#[tokio::test]
async fn test_create_past_due_date_is_validation_error() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/tasks",
            Some(json!({ "title": "Late", "dueDate": "2020-01-01T00:00:00Z" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid due date: 2020-01-01T00:00:00.000Z (cannot be in the past)"
    );
}

#[tokio::test]
async fn test_list_and_filter_by_status() {
    let app = TestApp::new();
    app.create(json!({ "title": "Task 1" })).await;
    let second = app.create(json!({ "title": "Task 2" })).await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/tasks/{}", second.id),
            Some(json!({ "status": "completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = app.send(Method::GET, "/tasks", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["title"], "Task 1");
    assert_eq!(all[1]["title"], "Task 2");

    let (_, pending) = app.send(Method::GET, "/tasks?status=pending", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["title"], "Task 1");

    let (_, completed) = app.send(Method::GET, "/tasks?status=completed", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);
    assert_eq!(completed[0]["title"], "Task 2");
}

#[tokio::test]
async fn test_list_empty() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_blank_status_lists_everything() {
    let app = TestApp::new();
    app.create(json!({ "title": "Task 1" })).await;
    app.create(json!({ "title": "Task 2" })).await;

    let (status, body) = app.send(Method::GET, "/tasks?status=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_unknown_status_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/tasks?status=archived", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_get_by_id_and_not_found() {
    let app = TestApp::new();
    let created = app
        .create(json!({ "title": "Test Task", "description": "Test Description" }))
        .await;

    let (status, body) = app
        .send(Method::GET, &format!("/tasks/{}", created.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created.id.to_string());
    assert_eq!(body["description"], "Test Description");

    let (status, body) = app
        .send(Method::GET, &format!("/tasks/{}", Uuid::now_v7()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");

    let (status, _) = app.send(Method::GET, "/tasks/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_into_horizon_enqueues() {
    let app = TestApp::new();
    let created = app.create(json!({ "title": "Plan trip" })).await;
    assert!(app.queued().is_empty());

    let due = in_hours(6);
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/tasks/{}", created.id),
            Some(json!({ "title": "Plan trip!", "dueDate": due })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Plan trip!");

    let queued = app.queued();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0]["title"], "Plan trip!");
    assert_eq!(queued[0]["dueDate"], due);
}

#[tokio::test]
async fn test_update_unknown_task_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/tasks/{}", Uuid::now_v7()),
            Some(json!({ "title": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = TestApp::new();
    let created = app.create(json!({ "title": "Temp" })).await;
    let uri = format!("/tasks/{}", created.id);

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::DELETE, "/tasks/non-existent-id", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
