//! Common utilities for integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::time::Duration;
use tasktree::api::{create_router, AppState};
use tasktree::db::{create_pool, run_migrations};
use tasktree::i18n::Translator;
use tasktree::tasks::SqliteTaskRepository;
use tempfile::TempDir;
use tower::ServiceExt;

/// Fresh migrated database in a temporary directory.
///
/// Keep the `TempDir` alive for as long as the pool is used.
pub async fn setup_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("tasktree_test.db");
    let pool = create_pool(&db_path, 5)
        .await
        .expect("Failed to create test database");

    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    (temp_dir, pool)
}

pub async fn setup_repository() -> (TempDir, SqliteTaskRepository) {
    let (temp_dir, pool) = setup_test_db().await;
    (temp_dir, SqliteTaskRepository::new(pool))
}

/// Router wired exactly like the server, on a temporary database.
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let (temp_dir, pool) = setup_test_db().await;
        let state = AppState::new(pool.clone(), Translator::new(), "tasktree", "test");
        let router = create_router(state, Duration::from_secs(5));

        Self {
            router,
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<&str>,
        language: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(language) = language {
            builder = builder.header(header::ACCEPT_LANGUAGE, language);
        }

        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body), None).await
    }

    pub async fn patch(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        self.request("PATCH", uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None, None).await
    }

    /// POST a task and return its id
    pub async fn create(&self, body: &str) -> i64 {
        let (status, json) = self.post("/api/tasks", body).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
        json["id"].as_i64().unwrap()
    }
}
