pub mod models;

use crate::error::Result;
use crate::sql_constants::{COUNT_CATEGORIES, INSERT_CATEGORY, SELECT_CATEGORY_BY_ID};
use chrono::Utc;
use models::Category;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;

pub async fn create_pool(db_path: &Path, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            CHECK (name != '')
        )
        "#,
    )
    .execute(pool)
    .await?;

    // parent_task_id cascades: deleting a task removes its whole subtree,
    // so the parent graph never holds dangling references.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'todo',
            priority INTEGER NOT NULL DEFAULT 0,
            due_date DATE,
            completed_at DATETIME,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL,
            parent_task_id INTEGER,
            category_id INTEGER,
            CONSTRAINT fk_task_parent FOREIGN KEY (parent_task_id)
                REFERENCES tasks(id) ON DELETE CASCADE,
            CONSTRAINT fk_task_category FOREIGN KEY (category_id)
                REFERENCES categories(id) ON DELETE SET NULL,
            CHECK (status IN ('todo', 'in_progress', 'done')),
            CHECK (title != ''),
            CHECK (parent_task_id IS NULL OR parent_task_id != id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tasks_parent
        ON tasks(parent_task_id, id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_tasks_category
        ON tasks(category_id)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a category. Categories have no HTTP surface; this is for bootstrap and tests.
pub async fn insert_category(pool: &SqlitePool, name: &str) -> Result<Category> {
    let id = sqlx::query(INSERT_CATEGORY)
        .bind(name)
        .execute(pool)
        .await?
        .last_insert_rowid();

    let category = sqlx::query_as::<_, Category>(SELECT_CATEGORY_BY_ID)
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(category)
}

/// Populate an empty store with a few categories and a small task tree.
///
/// Returns `false` without touching anything when categories already exist.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool> {
    let existing: i64 = sqlx::query_scalar(COUNT_CATEGORIES)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(false);
    }

    let mut tx = pool.begin().await?;
    let now = Utc::now();

    for name in ["Backend", "Frontend", "Operations"] {
        sqlx::query(INSERT_CATEGORY)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    // (title, status, priority, parent row index, category id)
    let tree: [(&str, &str, i32, Option<usize>, i64); 5] = [
        ("Build task API", "in_progress", 2, None, 1),
        ("Design dashboard", "todo", 1, None, 2),
        ("Set up CI pipeline", "done", 0, None, 3),
        ("Create task endpoints", "todo", 2, Some(0), 1),
        ("Write API documentation", "todo", 1, Some(0), 1),
    ];

    let mut ids: Vec<i64> = Vec::with_capacity(tree.len());
    for (title, status, priority, parent, category_id) in tree {
        let parent_id = parent.map(|idx| ids[idx]);
        let completed_at = (status == "done").then_some(now);
        let id = sqlx::query(
            r#"
            INSERT INTO tasks (title, status, priority, completed_at, created_at, updated_at, parent_task_id, category_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(status)
        .bind(priority)
        .bind(completed_at)
        .bind(now)
        .bind(now)
        .bind(parent_id)
        .bind(category_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        ids.push(id);
    }

    tx.commit().await?;
    tracing::info!(tasks = ids.len(), "Seeded demo data");

    Ok(true)
}
