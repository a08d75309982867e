//! Request and response shapes for the HTTP API.
//!
//! Outbound tasks carry `parent_task_id` when it is set, in addition to the
//! nested `category` and `subtasks`. Clients that only rely on the documented
//! fields can ignore it.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::db::models::{Category, Task, TaskStatus};

/// Create task request
///
/// Everything is optional at the serde level so that a missing title is a
/// validation failure rather than a decoding failure. See `payload.rs`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub due_date: Option<String>,
    pub parent_task_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Update task request
///
/// `None` here cannot tell "absent" from `null`; the raw key map decides.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<i32>,
    pub due_date: Option<String>,
    pub parent_task_id: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: i64,
    pub name: String,
}

/// Wire representation of a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: i32,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    /// RFC 3339, second precision, UTC
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskItem>,
}

impl From<&Category> for CategoryItem {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

impl From<&Task> for TaskItem {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.as_str().to_string(),
            priority: task.priority,
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            completed_at: task
                .completed_at
                .map(|t| t.date_naive().format("%Y-%m-%d").to_string()),
            created_at: task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            updated_at: task.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            parent_task_id: task.parent_task_id,
            category: task.category.as_ref().map(CategoryItem::from),
            subtasks: to_task_items(&task.subtasks),
        }
    }
}

pub fn to_task_items(tasks: &[Task]) -> Vec<TaskItem> {
    tasks.iter().map(TaskItem::from).collect()
}

pub const STATUS_OK: &str = "ok";
pub const STATUS_DOWN: &str = "down";

/// Basic health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBasic {
    pub app_name: String,
    pub app_version: String,
    pub current_system_time: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthServices {
    pub database: String,
}

/// Detailed health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub app_name: String,
    pub app_version: String,
    pub current_system_time: String,
    pub language: String,
    pub status: HealthServices,
}
