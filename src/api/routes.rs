use axum::{routing::get, Router};

use super::handlers;
use super::server::AppState;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/report", get(handlers::health_report))
        .route(
            "/tasks",
            get(handlers::list_root_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:id/subtasks", get(handlers::list_root_subtasks))
}
