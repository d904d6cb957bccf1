//! Types for the tasks module
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{parse_iso_date, ColonyResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub agent_id: Option<Uuid>,
    /// Free text, not a reference into the buildings collection
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS]`
    #[serde(default)]
    pub due_date: Option<String>,
}

impl Task {
    /// Date portion of the due date, `None` when the task has no deadline.
    pub fn due_day(&self) -> ColonyResult<Option<NaiveDate>> {
        match self.due_date.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => {
                let day = raw.split('T').next().unwrap_or(raw);
                parse_iso_date(day).map(Some)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub agent_id: Option<Uuid>,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
}

impl CreateTaskRequest {
    pub fn into_task(self) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            agent_id: self.agent_id,
            building: self.building,
            priority: self.priority,
            status: self.status.unwrap_or_default(),
            created_at: Utc::now(),
            due_date: self.due_date,
        }
    }

    /// Replaces the editable fields of `task`. Id and creation time stay;
    /// status only changes when the request names one.
    pub fn apply_to(self, task: &mut Task) {
        let status = self.status.unwrap_or(task.status);
        *task = Task {
            id: task.id,
            created_at: task.created_at,
            status,
            ..self.into_task()
        };
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAssignRequest {
    pub agent_id: Uuid,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkAssignResponse {
    pub assigned: Vec<Uuid>,
}
