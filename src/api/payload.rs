//! Request body decoding and validation.
//!
//! A body is parsed twice: once into the typed request (values and formats)
//! and once into a raw key map. The map is what tells an absent key apart
//! from an explicit `null`, which the typed request collapses into `None`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::models::{CreateTaskRequest, UpdateTaskRequest};
use crate::db::models::{CreateTaskInput, FieldUpdate, TaskStatus, UpdateTaskInput};
use crate::error::{Result, TaskError};

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;
pub const PRIORITY_MIN: i32 = 0;
pub const PRIORITY_MAX: i32 = 5;

const UPDATE_FIELDS: [&str; 7] = [
    "title",
    "description",
    "status",
    "priority",
    "due_date",
    "parent_task_id",
    "category_id",
];

/// Decode `body` into the typed request plus its top-level key map.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<(T, Map<String, Value>)> {
    let raw: Map<String, Value> = serde_json::from_slice(body)
        .map_err(|e| TaskError::InvalidPayload(format!("body is not a JSON object: {e}")))?;
    let typed: T = serde_json::from_slice(body)
        .map_err(|e| TaskError::InvalidPayload(e.to_string()))?;

    Ok((typed, raw))
}

pub fn build_create_input(
    req: CreateTaskRequest,
    raw: &Map<String, Value>,
) -> Result<CreateTaskInput> {
    reject_null(raw, "status", req.status.is_none())?;
    reject_null(raw, "priority", req.priority.is_none())?;

    let title = validate_title(req.title.as_deref().unwrap_or_default())?;

    if let Some(description) = &req.description {
        validate_description(description)?;
    }

    let priority = match req.priority {
        Some(p) => validate_priority(p)?,
        None => 0,
    };

    let due_date = req.due_date.as_deref().map(parse_date).transpose()?;

    if let Some(id) = req.parent_task_id {
        validate_id("parent_task_id", id)?;
    }
    if let Some(id) = req.category_id {
        validate_id("category_id", id)?;
    }

    Ok(CreateTaskInput {
        title,
        description: req.description,
        status: req.status.unwrap_or(TaskStatus::Todo),
        priority,
        due_date,
        parent_task_id: req.parent_task_id,
        category_id: req.category_id,
    })
}

pub fn build_update_input(
    req: UpdateTaskRequest,
    raw: &Map<String, Value>,
) -> Result<UpdateTaskInput> {
    if !UPDATE_FIELDS.iter().any(|field| raw.contains_key(*field)) {
        return Err(TaskError::InvalidPayload(
            "no updatable field present".into(),
        ));
    }

    // Non-nullable columns: null is not a way to clear them.
    reject_null(raw, "title", req.title.is_none())?;
    reject_null(raw, "status", req.status.is_none())?;
    reject_null(raw, "priority", req.priority.is_none())?;

    let title = req.title.as_deref().map(validate_title).transpose()?;
    let priority = req.priority.map(validate_priority).transpose()?;

    let description = tri_state(raw, "description", req.description)?;
    if let FieldUpdate::Set(text) = &description {
        validate_description(text)?;
    }

    let due_date = match tri_state(raw, "due_date", req.due_date)? {
        FieldUpdate::Set(text) => FieldUpdate::Set(parse_date(&text)?),
        FieldUpdate::Clear => FieldUpdate::Clear,
        FieldUpdate::Unchanged => FieldUpdate::Unchanged,
    };

    let parent_task_id = tri_state(raw, "parent_task_id", req.parent_task_id)?;
    if let FieldUpdate::Set(id) = parent_task_id {
        validate_id("parent_task_id", id)?;
    }

    let category_id = tri_state(raw, "category_id", req.category_id)?;
    if let FieldUpdate::Set(id) = category_id {
        validate_id("category_id", id)?;
    }

    Ok(UpdateTaskInput {
        title,
        description,
        status: req.status,
        priority,
        due_date,
        parent_task_id,
        category_id,
    })
}

/// Combine key presence with the typed value.
fn tri_state<T>(raw: &Map<String, Value>, field: &str, value: Option<T>) -> Result<FieldUpdate<T>> {
    match (raw.get(field), value) {
        (None, _) => Ok(FieldUpdate::Unchanged),
        (Some(Value::Null), _) => Ok(FieldUpdate::Clear),
        (Some(_), Some(v)) => Ok(FieldUpdate::Set(v)),
        (Some(_), None) => Err(TaskError::InvalidPayload(format!(
            "{field} has an unexpected value"
        ))),
    }
}

fn reject_null(raw: &Map<String, Value>, field: &str, missing: bool) -> Result<()> {
    if raw.contains_key(field) && missing {
        return Err(TaskError::InvalidPayload(format!("{field} cannot be null")));
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::InvalidPayload("title cannot be blank".into()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(TaskError::InvalidPayload(format!(
            "title exceeds {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<()> {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(TaskError::InvalidPayload(format!(
            "description exceeds {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_priority(priority: i32) -> Result<i32> {
    if !(PRIORITY_MIN..=PRIORITY_MAX).contains(&priority) {
        return Err(TaskError::InvalidPayload(format!(
            "priority must be between {PRIORITY_MIN} and {PRIORITY_MAX}"
        )));
    }
    Ok(priority)
}

fn validate_id(field: &str, id: i64) -> Result<()> {
    if id < 1 {
        return Err(TaskError::InvalidPayload(format!(
            "{field} must be a positive integer"
        )));
    }
    Ok(())
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| TaskError::InvalidPayload(format!("invalid date '{text}', expected YYYY-MM-DD")))
}
