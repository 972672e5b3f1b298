use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::due_date::DueDate;
use crate::error::DomainError;

/// Task status
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

/// Task entity
///
/// The title is never blank and the due date, if any, was not in the past
/// when it was set.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DueDate>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        due_date: Option<DueDate>,
        status: TaskStatus,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        ensure_title(&title)?;

        Ok(Self {
            id,
            title,
            description,
            due_date,
            status,
        })
    }

    /// Apply the present fields of `changes` in order: title, description,
    /// due date, status. A failing field returns before it is assigned;
    /// fields before it keep their new values.
    pub fn update(&mut self, changes: UpdateTask) -> Result<(), DomainError> {
        self.update_at(changes, Utc::now())
    }

    pub fn update_at(&mut self, changes: UpdateTask, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = changes.title {
            ensure_title(&title)?;
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(raw) = changes.due_date {
            self.due_date = Some(DueDate::parse_at(&raw, now)?);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        Ok(())
    }

    pub fn is_due_soon(&self) -> bool {
        self.is_due_soon_at(Utc::now())
    }

    pub fn is_due_soon_at(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due.is_due_soon_at(now))
    }
}

fn ensure_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::TitleEmpty);
    }
    Ok(())
}

/// DTO for creating a new task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw due date as sent by the client; an empty string means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// DTO for updating an existing task; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Query filters for listing tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFilter {
    /// `?status=` with an empty value does not filter.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TaskStatus>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<TaskStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("unknown status `{}`", raw))),
        _ => Ok(None),
    }
}

impl TaskFilter {
    pub fn with_status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
    }
}

/// DTO for task response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub status: TaskStatus,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.map(|due| due.to_string()),
            status: task.status,
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}
