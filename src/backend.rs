//! Storage seam for the task hierarchy.
//!
//! [`TaskRepository`] is the interface the service layer depends on. The
//! SQLite implementation lives in `tasks.rs`; tests may substitute their own.

use std::future::Future;

use crate::db::models::{CreateTaskInput, Task, UpdateTaskInput};
use crate::error::Result;

/// Task persistence and the hierarchy invariants that go with it.
pub trait TaskRepository: Send + Sync {
    // ── Read ────────────────────────────────────────────────────────

    /// Tasks without a parent, ordered by id, subtrees not populated.
    fn list_root_tasks(&self) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// Children of `task_id` with their full subtrees populated.
    fn list_root_subtasks(&self, task_id: i64) -> impl Future<Output = Result<Vec<Task>>> + Send;

    fn get_task(&self, task_id: i64) -> impl Future<Output = Result<Task>> + Send;

    // ── Write ───────────────────────────────────────────────────────

    fn create_task(&self, input: CreateTaskInput) -> impl Future<Output = Result<Task>> + Send;

    fn update_task(
        &self,
        task_id: i64,
        input: UpdateTaskInput,
    ) -> impl Future<Output = Result<Task>> + Send;

    fn delete_task(&self, task_id: i64) -> impl Future<Output = Result<()>> + Send;
}
