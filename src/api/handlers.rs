use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::time::Duration;

use super::error::ApiError;
use super::language::request_language;
use super::models::*;
use super::payload::{build_create_input, build_update_input, decode_body};
use super::server::AppState;
use crate::i18n::MessageKey;

const HEALTH_DB_TIMEOUT: Duration = Duration::from_secs(2);

/// Path ids are positive integers; anything else is rejected before the service is called.
fn parse_task_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

fn invalid_id(state: &AppState, language: &str) -> Response {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        &state.translator,
        language,
        MessageKey::InvalidTaskId,
    )
    .into_response()
}

fn invalid_payload(state: &AppState, language: &str, reason: &str) -> Response {
    tracing::debug!(reason, "Rejected task payload");
    ApiError::new(
        StatusCode::BAD_REQUEST,
        &state.translator,
        language,
        MessageKey::InvalidTaskPayload,
    )
    .into_response()
}

/// List root tasks
pub async fn list_root_tasks(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let language = request_language(&headers);

    match state.service.list_root_tasks().await {
        Ok(tasks) => (StatusCode::OK, Json(to_task_items(&tasks))).into_response(),
        Err(e) => ApiError::from_task_error(&e, &state.translator, &language, MessageKey::ErrorListTask)
            .into_response(),
    }
}

/// List the full subtree below a task
pub async fn list_root_subtasks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let language = request_language(&headers);
    let Some(task_id) = parse_task_id(&id) else {
        return invalid_id(&state, &language);
    };

    match state.service.list_root_subtasks(task_id).await {
        Ok(subtasks) => (StatusCode::OK, Json(to_task_items(&subtasks))).into_response(),
        Err(e) => ApiError::from_task_error(
            &e,
            &state.translator,
            &language,
            MessageKey::FailListSubtasks,
        )
        .into_response(),
    }
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let language = request_language(&headers);
    let Some(task_id) = parse_task_id(&id) else {
        return invalid_id(&state, &language);
    };

    match state.service.get_task(task_id).await {
        Ok(task) => (StatusCode::OK, Json(TaskItem::from(&task))).into_response(),
        Err(e) => ApiError::from_task_error(&e, &state.translator, &language, MessageKey::FailGetTask)
            .into_response(),
    }
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let language = request_language(&headers);

    let input = match decode_body::<CreateTaskRequest>(&body)
        .and_then(|(req, raw)| build_create_input(req, &raw))
    {
        Ok(input) => input,
        Err(e) => return invalid_payload(&state, &language, &e.to_string()),
    };

    match state.service.create_task(input).await {
        Ok(task) => (StatusCode::CREATED, Json(TaskItem::from(&task))).into_response(),
        Err(e) => ApiError::from_task_error(
            &e,
            &state.translator,
            &language,
            MessageKey::FailCreateTask,
        )
        .into_response(),
    }
}

/// Apply a partial update
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let language = request_language(&headers);
    let Some(task_id) = parse_task_id(&id) else {
        return invalid_id(&state, &language);
    };

    let input = match decode_body::<UpdateTaskRequest>(&body)
        .and_then(|(req, raw)| build_update_input(req, &raw))
    {
        Ok(input) => input,
        Err(e) => return invalid_payload(&state, &language, &e.to_string()),
    };

    match state.service.update_task(task_id, input).await {
        Ok(task) => (StatusCode::OK, Json(TaskItem::from(&task))).into_response(),
        Err(e) => ApiError::from_task_error(
            &e,
            &state.translator,
            &language,
            MessageKey::FailUpdateTask,
        )
        .into_response(),
    }
}

/// Delete a task and everything below it
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let language = request_language(&headers);
    let Some(task_id) = parse_task_id(&id) else {
        return invalid_id(&state, &language);
    };

    match state.service.delete_task(task_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from_task_error(
            &e,
            &state.translator,
            &language,
            MessageKey::FailDeleteTask,
        )
        .into_response(),
    }
}

async fn database_reachable(state: &AppState) -> bool {
    let ping = sqlx::query("SELECT 1").execute(&state.db_pool);
    match tokio::time::timeout(HEALTH_DB_TIMEOUT, ping).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        },
        Err(_) => {
            tracing::warn!("Database ping timed out");
            false
        },
    }
}

fn system_time() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Liveness plus database ping
pub async fn health(State(state): State<AppState>) -> Response {
    let (status, message) = if database_reachable(&state).await {
        (StatusCode::OK, STATUS_OK)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, STATUS_DOWN)
    };

    (
        status,
        Json(HealthBasic {
            app_name: state.app_name.clone(),
            app_version: state.app_version.clone(),
            current_system_time: system_time(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Per-service status report. Always 200; the body says what is down.
pub async fn health_report(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let database = if database_reachable(&state).await {
        STATUS_OK
    } else {
        STATUS_DOWN
    };

    (
        StatusCode::OK,
        Json(HealthReport {
            app_name: state.app_name.clone(),
            app_version: state.app_version.clone(),
            current_system_time: system_time(),
            language: request_language(&headers),
            status: HealthServices {
                database: database.to_string(),
            },
        }),
    )
        .into_response()
}

/// Fallback for unknown routes
pub async fn not_found(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let language = request_language(&headers);
    ApiError::new(
        StatusCode::NOT_FOUND,
        &state.translator,
        &language,
        MessageKey::RouteNotFound,
    )
    .into_response()
}
