//! The queue wire contract.

use queue_worker::QueueJob;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `type` of the payload dispatched for tasks entering the due-soon horizon.
pub const DUE_SOON: &str = "due_soon";

/// Key under which the worker keeps its own delivery bookkeeping.
pub const DELIVERY_KEY: &str = "_delivery";

/// One queue element: a UTF-8 JSON object.
///
/// `type`, `taskId` and `title` are required; `dueDate` is an ISO-8601
/// string. Any other fields a producer adds are kept in `extra` and written
/// back out unchanged, including fields named like worker bookkeeping
/// (`attempts`), since that lives under [`DELIVERY_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub task_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Only present on payloads the worker re-pushed after a failure.
    #[serde(rename = "_delivery", default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub attempts: u32,
}

impl NotificationPayload {
    pub fn due_soon(
        task_id: impl Into<String>,
        title: impl Into<String>,
        due_date: Option<String>,
    ) -> Self {
        Self {
            kind: DUE_SOON.to_string(),
            task_id: task_id.into(),
            title: title.into(),
            due_date,
            delivery: None,
            extra: Map::new(),
        }
    }

    pub fn is_due_soon(&self) -> bool {
        self.kind == DUE_SOON
    }
}

impl QueueJob for NotificationPayload {
    fn job_id(&self) -> String {
        self.task_id.clone()
    }

    fn retry_count(&self) -> u32 {
        self.delivery.map_or(0, |d| d.attempts)
    }

    fn with_retry(&self) -> Self {
        Self {
            delivery: Some(DeliveryInfo {
                attempts: self.retry_count() + 1,
            }),
            ..self.clone()
        }
    }
}
