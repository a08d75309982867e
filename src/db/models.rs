use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;

/// Workflow label of a task. Any value may replace any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(TaskError::InvalidPayload(format!(
                "Invalid status '{}'. Valid values: todo, in_progress, done",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A task as seen by callers of the repository.
///
/// `subtasks` is only populated by subtree listings and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub parent_task_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Task>,
}

/// Flat row produced by the `tasks LEFT JOIN categories` queries.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub parent_task_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(Category { id, name }),
            _ => None,
        };

        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            status: row.status,
            priority: row.priority,
            due_date: row.due_date,
            completed_at: row.completed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            parent_task_id: row.parent_task_id,
            category,
            subtasks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: i32,
    pub due_date: Option<NaiveDate>,
    pub parent_task_id: Option<i64>,
    pub category_id: Option<i64>,
}

impl CreateTaskInput {
    /// Input with only a title; every other field takes its default.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: 0,
            due_date: None,
            parent_task_id: None,
            category_id: None,
        }
    }

    pub fn with_parent(mut self, parent_task_id: i64) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

/// Change requested for a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Key absent from the request: leave the column alone.
    #[default]
    Unchanged,
    /// Key present with `null`: clear the column.
    Clear,
    /// Key present with a value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldUpdate::Unchanged)
    }

    /// The new value, if one is being set.
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldUpdate::Set(v) => Some(v),
            _ => None,
        }
    }

    /// `None` when unchanged, `Some(None)` when cleared, `Some(Some(v))` when set.
    pub fn into_change(self) -> Option<Option<T>> {
        match self {
            FieldUpdate::Unchanged => None,
            FieldUpdate::Clear => Some(None),
            FieldUpdate::Set(v) => Some(Some(v)),
        }
    }
}

/// Partial update. Non-nullable columns use `Option` (absent or value);
/// nullable columns use [`FieldUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub due_date: FieldUpdate<NaiveDate>,
    pub parent_task_id: FieldUpdate<i64>,
    pub category_id: FieldUpdate<i64>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_unchanged()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_unchanged()
            && self.parent_task_id.is_unchanged()
            && self.category_id.is_unchanged()
    }
}
