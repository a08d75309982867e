use crate::db::models::{
    CreateTaskInput, FieldUpdate, Task, TaskRow, TaskStatus, UpdateTaskInput,
};
use crate::error::{Result, TaskError};
use crate::sql_constants::{
    BEGIN_IMMEDIATE, CHECK_CATEGORY_EXISTS, CHECK_TASK_EXISTS, DELETE_TASK_BY_ID, INSERT_TASK,
    LIST_CHILD_TASKS, LIST_ROOT_TASKS, SELECT_TASK_BY_ID, SELECT_TASK_PARENT_ID,
};
use chrono::Utc;
use futures_util::future::BoxFuture;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;

/// SQLite-backed task hierarchy.
///
/// Owns the invariants of the parent graph: references point at existing rows
/// and following `parent_task_id` upward always terminates.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// List tasks that have no parent, ordered by id
    pub async fn list_root_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(LIST_ROOT_TASKS)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    /// List the children of a task, each with its complete subtree attached.
    ///
    /// The whole walk runs inside one read transaction so every level sees the
    /// same snapshot. One query is issued per visited task.
    pub async fn list_root_subtasks(&self, task_id: i64) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;

        check_task_exists(&mut tx, task_id).await?;
        let subtasks = load_subtree(&mut tx, task_id).await?;

        tx.commit().await?;
        Ok(subtasks)
    }

    /// Get a task by ID
    pub async fn get_task(&self, task_id: i64) -> Result<Task> {
        let mut conn = self.pool.acquire().await?;
        fetch_task(&mut conn, task_id).await
    }

    /// Create a task.
    ///
    /// Referenced rows are checked up front; if one disappears before the
    /// insert lands, the foreign key violation is translated into the same
    /// not-found error the check would have produced.
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        let mut conn = self.pool.acquire().await?;

        if let Some(parent_id) = input.parent_task_id {
            check_task_exists(&mut conn, parent_id).await?;
        }
        if let Some(category_id) = input.category_id {
            check_category_exists(&mut conn, category_id).await?;
        }

        let now = Utc::now();
        let completed_at = (input.status == TaskStatus::Done).then_some(now);

        let outcome = sqlx::query(INSERT_TASK)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .bind(completed_at)
            .bind(now)
            .bind(now)
            .bind(input.parent_task_id)
            .bind(input.category_id)
            .execute(&mut *conn)
            .await;

        let id = match outcome {
            Ok(result) => result.last_insert_rowid(),
            Err(e) => {
                return Err(classify_write_error(
                    &mut conn,
                    e.into(),
                    input.parent_task_id,
                    input.category_id,
                )
                .await)
            },
        };

        tracing::debug!(
            task_id = id,
            parent_task_id = ?input.parent_task_id,
            category_id = ?input.category_id,
            "Created task"
        );

        fetch_task(&mut conn, id).await
    }

    /// Apply a partial update.
    ///
    /// Only fields present in `input` are written. The existence checks, the
    /// cycle walk and the write share one immediate transaction, so a
    /// concurrent reparent cannot slip between the check and the update.
    /// Writers queue behind each other on the busy timeout.
    pub async fn update_task(&self, task_id: i64, input: UpdateTaskInput) -> Result<Task> {
        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await?;

        check_task_exists(&mut tx, task_id).await?;

        if let FieldUpdate::Set(parent_id) = input.parent_task_id {
            if parent_id == task_id {
                return Err(TaskError::HierarchyCycle { task_id, parent_id });
            }
            check_task_exists(&mut tx, parent_id).await?;
            if would_create_cycle(&mut tx, task_id, parent_id).await? {
                return Err(TaskError::HierarchyCycle { task_id, parent_id });
            }
        }

        if let FieldUpdate::Set(category_id) = input.category_id {
            check_category_exists(&mut tx, category_id).await?;
        }

        if input.is_empty() {
            let task = fetch_task(&mut tx, task_id).await?;
            tx.commit().await?;
            return Ok(task);
        }

        let parent_ref = input.parent_task_id.value().copied();
        let category_ref = input.category_id.value().copied();
        let now = Utc::now();

        // Build dynamic update query using QueryBuilder for SQL injection safety
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
        {
            let mut set = builder.separated(", ");

            if let Some(title) = input.title {
                set.push("title = ").push_bind_unseparated(title);
            }

            match input.description.into_change() {
                Some(Some(description)) => {
                    set.push("description = ").push_bind_unseparated(description);
                },
                Some(None) => {
                    set.push("description = NULL");
                },
                None => {},
            }

            if let Some(status) = input.status {
                set.push("status = ").push_bind_unseparated(status);
                if status == TaskStatus::Done {
                    set.push("completed_at = COALESCE(completed_at, ")
                        .push_bind_unseparated(now)
                        .push_unseparated(")");
                } else {
                    set.push("completed_at = NULL");
                }
            }

            if let Some(priority) = input.priority {
                set.push("priority = ").push_bind_unseparated(priority);
            }

            match input.due_date.into_change() {
                Some(Some(due_date)) => {
                    set.push("due_date = ").push_bind_unseparated(due_date);
                },
                Some(None) => {
                    set.push("due_date = NULL");
                },
                None => {},
            }

            match input.parent_task_id.into_change() {
                Some(Some(parent_id)) => {
                    set.push("parent_task_id = ").push_bind_unseparated(parent_id);
                },
                Some(None) => {
                    set.push("parent_task_id = NULL");
                },
                None => {},
            }

            match input.category_id.into_change() {
                Some(Some(category_id)) => {
                    set.push("category_id = ").push_bind_unseparated(category_id);
                },
                Some(None) => {
                    set.push("category_id = NULL");
                },
                None => {},
            }

            set.push("updated_at = ").push_bind_unseparated(now);
        }
        builder.push(" WHERE id = ").push_bind(task_id);

        let outcome = builder.build().execute(&mut *tx).await;
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                return Err(
                    classify_write_error(&mut tx, e.into(), parent_ref, category_ref).await,
                )
            },
        };

        if result.rows_affected() == 0 {
            return Err(TaskError::TaskNotFound(task_id));
        }

        let task = fetch_task(&mut tx, task_id).await?;
        tx.commit().await?;

        tracing::debug!(task_id, "Updated task");
        Ok(task)
    }

    /// Delete a task. Descendants are removed with it by the schema's cascade.
    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        let result = sqlx::query(DELETE_TASK_BY_ID)
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::TaskNotFound(task_id));
        }

        tracing::debug!(task_id, "Deleted task");
        Ok(())
    }
}

impl crate::backend::TaskRepository for SqliteTaskRepository {
    fn list_root_tasks(&self) -> impl std::future::Future<Output = Result<Vec<Task>>> + Send {
        self.list_root_tasks()
    }

    fn list_root_subtasks(
        &self,
        task_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Task>>> + Send {
        self.list_root_subtasks(task_id)
    }

    fn get_task(&self, task_id: i64) -> impl std::future::Future<Output = Result<Task>> + Send {
        self.get_task(task_id)
    }

    fn create_task(
        &self,
        input: CreateTaskInput,
    ) -> impl std::future::Future<Output = Result<Task>> + Send {
        self.create_task(input)
    }

    fn update_task(
        &self,
        task_id: i64,
        input: UpdateTaskInput,
    ) -> impl std::future::Future<Output = Result<Task>> + Send {
        self.update_task(task_id, input)
    }

    fn delete_task(&self, task_id: i64) -> impl std::future::Future<Output = Result<()>> + Send {
        self.delete_task(task_id)
    }
}

async fn fetch_task(conn: &mut SqliteConnection, task_id: i64) -> Result<Task> {
    let row = sqlx::query_as::<_, TaskRow>(SELECT_TASK_BY_ID)
        .bind(task_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(TaskError::TaskNotFound(task_id))?;

    Ok(Task::from(row))
}

/// Depth-first expansion: every child gets its own children attached.
fn load_subtree(conn: &mut SqliteConnection, parent_id: i64) -> BoxFuture<'_, Result<Vec<Task>>> {
    Box::pin(async move {
        let rows = sqlx::query_as::<_, TaskRow>(LIST_CHILD_TASKS)
            .bind(parent_id)
            .fetch_all(&mut *conn)
            .await?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let mut task = Task::from(row);
            task.subtasks = load_subtree(&mut *conn, task.id).await?;
            tasks.push(task);
        }

        Ok(tasks)
    })
}

async fn task_exists(conn: &mut SqliteConnection, task_id: i64) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(CHECK_TASK_EXISTS)
        .bind(task_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

async fn category_exists(conn: &mut SqliteConnection, category_id: i64) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(CHECK_CATEGORY_EXISTS)
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

async fn check_task_exists(conn: &mut SqliteConnection, task_id: i64) -> Result<()> {
    if !task_exists(conn, task_id).await? {
        return Err(TaskError::TaskNotFound(task_id));
    }

    Ok(())
}

async fn check_category_exists(conn: &mut SqliteConnection, category_id: i64) -> Result<()> {
    if !category_exists(conn, category_id).await? {
        return Err(TaskError::CategoryNotFound(category_id));
    }

    Ok(())
}

/// Walk the ancestors of `new_parent_id`. Reaching `task_id` (or any node
/// twice) means the reparent would close a loop; reaching a root means it is
/// safe. Relies on the existing graph being acyclic.
async fn would_create_cycle(
    conn: &mut SqliteConnection,
    task_id: i64,
    new_parent_id: i64,
) -> Result<bool> {
    let mut visited = HashSet::from([task_id]);
    let mut current_id = new_parent_id;

    loop {
        if !visited.insert(current_id) {
            return Ok(true);
        }

        let parent = sqlx::query_scalar::<_, Option<i64>>(SELECT_TASK_PARENT_ID)
            .bind(current_id)
            .fetch_optional(&mut *conn)
            .await?;

        match parent.flatten() {
            Some(parent_id) => current_id = parent_id,
            None => return Ok(false),
        }
    }
}

/// Map a foreign key failure on write back to the reference that vanished.
///
/// SQLite does not name the violated constraint, so the candidates are probed
/// again. Anything else is passed through unchanged.
async fn classify_write_error(
    conn: &mut SqliteConnection,
    err: TaskError,
    parent_task_id: Option<i64>,
    category_id: Option<i64>,
) -> TaskError {
    if !err.is_foreign_key_violation() {
        return err;
    }

    if let Some(parent_id) = parent_task_id {
        if matches!(task_exists(conn, parent_id).await, Ok(false)) {
            tracing::warn!(parent_id, "Parent task vanished before write");
            return TaskError::TaskNotFound(parent_id);
        }
    }

    if let Some(category_id) = category_id {
        if matches!(category_exists(conn, category_id).await, Ok(false)) {
            tracing::warn!(category_id, "Category vanished before write");
            return TaskError::CategoryNotFound(category_id);
        }
    }

    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::TestContext;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_create_task_defaults() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let task = repo.create_task(CreateTaskInput::new("X")).await.unwrap();

        assert_eq!(task.title, "X");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, 0);
        assert_eq!(task.parent_task_id, None);
        assert!(task.category.is_none());
        assert!(task.completed_at.is_none());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn test_create_task_with_all_fields() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let category = ctx.category("Backend").await;
        let parent = repo.create_task(CreateTaskInput::new("Parent")).await.unwrap();

        let due = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let task = repo
            .create_task(CreateTaskInput {
                title: "Child".into(),
                description: Some("Details".into()),
                status: TaskStatus::InProgress,
                priority: 2,
                due_date: Some(due),
                parent_task_id: Some(parent.id),
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        assert_eq!(task.description.as_deref(), Some("Details"));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, 2);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.parent_task_id, Some(parent.id));
        assert_eq!(task.category, Some(category));
    }

    #[tokio::test]
    async fn test_create_done_task_sets_completed_at() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let mut input = CreateTaskInput::new("Already done");
        input.status = TaskStatus::Done;
        let task = repo.create_task(input).await.unwrap();

        assert!(task.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_create_task_missing_parent() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let result = repo
            .create_task(CreateTaskInput::new("Orphan").with_parent(999))
            .await;
        assert!(matches!(result, Err(TaskError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn test_create_task_missing_category() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let result = repo
            .create_task(CreateTaskInput::new("Uncategorised").with_category(42))
            .await;
        assert!(matches!(result, Err(TaskError::CategoryNotFound(42))));
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let result = repo.get_task(999).await;
        assert!(matches!(result, Err(TaskError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn test_list_root_tasks_excludes_children() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let root1 = repo.create_task(CreateTaskInput::new("Root 1")).await.unwrap();
        let _child = repo
            .create_task(CreateTaskInput::new("Child").with_parent(root1.id))
            .await
            .unwrap();
        let root2 = repo.create_task(CreateTaskInput::new("Root 2")).await.unwrap();

        let roots = repo.list_root_tasks().await.unwrap();
        let ids: Vec<i64> = roots.iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![root1.id, root2.id]);
        assert!(roots.iter().all(|t| t.subtasks.is_empty()));
    }

    #[tokio::test]
    async fn test_list_root_subtasks_builds_tree() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let a = repo.create_task(CreateTaskInput::new("A")).await.unwrap();
        let b = repo
            .create_task(CreateTaskInput::new("B").with_parent(a.id))
            .await
            .unwrap();
        let c = repo
            .create_task(CreateTaskInput::new("C").with_parent(b.id))
            .await
            .unwrap();
        let d = repo
            .create_task(CreateTaskInput::new("D").with_parent(a.id))
            .await
            .unwrap();

        let tree = repo.list_root_subtasks(a.id).await.unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, b.id);
        assert_eq!(tree[1].id, d.id);
        assert_eq!(tree[0].subtasks.len(), 1);
        assert_eq!(tree[0].subtasks[0].id, c.id);
        assert!(tree[0].subtasks[0].subtasks.is_empty());
        assert!(tree[1].subtasks.is_empty());
    }

    #[tokio::test]
    async fn test_list_root_subtasks_leaf_is_empty() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let leaf = repo.create_task(CreateTaskInput::new("Leaf")).await.unwrap();
        let tree = repo.list_root_subtasks(leaf.id).await.unwrap();

        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn test_list_root_subtasks_missing_task() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let result = repo.list_root_subtasks(999).await;
        assert!(matches!(result, Err(TaskError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let mut input = CreateTaskInput::new("Original");
        input.description = Some("Keep me".into());
        input.priority = 3;
        let task = repo.create_task(input).await.unwrap();

        let updated = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.description.as_deref(), Some("Keep me"));
        assert_eq!(updated.priority, 3);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_clear_versus_unchanged_description() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let mut input = CreateTaskInput::new("Task");
        input.description = Some("Text".into());
        let task = repo.create_task(input).await.unwrap();

        let untouched = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    priority: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(untouched.description.as_deref(), Some("Text"));

        let cleared = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    description: FieldUpdate::Clear,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[tokio::test]
    async fn test_update_status_maintains_completed_at() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let done = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let completed_at = done.completed_at.expect("completed_at set");

        let still_done = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(still_done.completed_at, Some(completed_at));

        let reopened = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    status: Some(TaskStatus::Todo),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(reopened.completed_at, None);
    }

    #[tokio::test]
    async fn test_update_without_fields_is_plain_read() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let same = repo
            .update_task(task.id, UpdateTaskInput::default())
            .await
            .unwrap();

        assert_eq!(same, task);
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let result = repo.update_task(999, UpdateTaskInput::default()).await;
        assert!(matches!(result, Err(TaskError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn test_update_self_parent_is_cycle() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let result = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    title: Some("Should not apply".into()),
                    parent_task_id: FieldUpdate::Set(task.id),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(TaskError::HierarchyCycle { .. })));
        assert_eq!(repo.get_task(task.id).await.unwrap().title, "Task");
    }

    #[tokio::test]
    async fn test_update_missing_parent() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let result = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    parent_task_id: FieldUpdate::Set(999),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(TaskError::TaskNotFound(999))));
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let result = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    category_id: FieldUpdate::Set(77),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(TaskError::CategoryNotFound(77))));
    }

    #[tokio::test]
    async fn test_update_category_set_and_clear() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let category = ctx.category("Ops").await;
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        let set = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    category_id: FieldUpdate::Set(category.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(set.category, Some(category));

        let cleared = repo
            .update_task(
                task.id,
                UpdateTaskInput {
                    category_id: FieldUpdate::Clear,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.category.is_none());
    }

    #[tokio::test]
    async fn test_would_create_cycle_walks_ancestors() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();

        let a = repo.create_task(CreateTaskInput::new("A")).await.unwrap();
        let b = repo
            .create_task(CreateTaskInput::new("B").with_parent(a.id))
            .await
            .unwrap();
        let c = repo
            .create_task(CreateTaskInput::new("C").with_parent(b.id))
            .await
            .unwrap();
        let other = repo.create_task(CreateTaskInput::new("Other")).await.unwrap();

        let mut conn = ctx.pool().acquire().await.unwrap();
        assert!(would_create_cycle(&mut conn, a.id, c.id).await.unwrap());
        assert!(would_create_cycle(&mut conn, a.id, b.id).await.unwrap());
        assert!(!would_create_cycle(&mut conn, c.id, other.id).await.unwrap());
        assert!(!would_create_cycle(&mut conn, other.id, c.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_classify_write_error_maps_vanished_parent() {
        let ctx = TestContext::new().await;
        let now = Utc::now();
        let mut conn = ctx.pool().acquire().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO tasks (title, created_at, updated_at, parent_task_id) VALUES (?, ?, ?, ?)",
        )
        .bind("Raced")
        .bind(now)
        .bind(now)
        .bind(555_i64)
        .execute(&mut *conn)
        .await
        .unwrap_err();

        let classified = classify_write_error(&mut conn, err.into(), Some(555), None).await;
        assert!(matches!(classified, TaskError::TaskNotFound(555)));
    }

    #[tokio::test]
    async fn test_classify_write_error_maps_vanished_category() {
        let ctx = TestContext::new().await;
        let now = Utc::now();
        let mut conn = ctx.pool().acquire().await.unwrap();

        let err = sqlx::query(
            "INSERT INTO tasks (title, created_at, updated_at, category_id) VALUES (?, ?, ?, ?)",
        )
        .bind("Raced")
        .bind(now)
        .bind(now)
        .bind(12_i64)
        .execute(&mut *conn)
        .await
        .unwrap_err();

        let classified = classify_write_error(&mut conn, err.into(), None, Some(12)).await;
        assert!(matches!(classified, TaskError::CategoryNotFound(12)));
    }

    #[tokio::test]
    async fn test_classify_write_error_passes_other_errors_through() {
        let ctx = TestContext::new().await;
        let mut conn = ctx.pool().acquire().await.unwrap();

        let classified = classify_write_error(
            &mut conn,
            TaskError::DatabaseError(sqlx::Error::RowNotFound),
            Some(1),
            Some(1),
        )
        .await;
        assert!(matches!(
            classified,
            TaskError::DatabaseError(sqlx::Error::RowNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let ctx = TestContext::new().await;
        let repo = ctx.repository();
        let task = repo.create_task(CreateTaskInput::new("Task")).await.unwrap();

        repo.delete_task(task.id).await.unwrap();

        assert!(matches!(
            repo.get_task(task.id).await,
            Err(TaskError::TaskNotFound(_))
        ));
        assert!(matches!(
            repo.delete_task(task.id).await,
            Err(TaskError::TaskNotFound(_))
        ));
    }
}
