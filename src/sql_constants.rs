//! SQL query constants and fragments
//!
//! Task reads always go through the same `tasks LEFT JOIN categories`
//! projection so every query decodes into [`crate::db::models::TaskRow`].
//! The partial update statement is built dynamically in `tasks.rs`.

// ============================================================================
// Task Queries
// ============================================================================

/// Column list for task reads, joined with the category name.
pub const TASK_JOIN_COLUMNS: &str = "t.id, t.parent_task_id, t.title, t.description, t.status, t.priority, \
     t.due_date, t.completed_at, t.created_at, t.updated_at, t.category_id, c.name AS category_name";

/// Base SELECT for tasks with their category. Add WHERE clauses as needed.
pub const SELECT_TASK_JOINED: &str = const_format::formatcp!(
    "SELECT {} FROM tasks t LEFT JOIN categories c ON c.id = t.category_id",
    TASK_JOIN_COLUMNS
);

/// Tasks without a parent, oldest first
pub const LIST_ROOT_TASKS: &str = const_format::formatcp!(
    "{} WHERE t.parent_task_id IS NULL ORDER BY t.id",
    SELECT_TASK_JOINED
);

/// Immediate children of a task, oldest first
pub const LIST_CHILD_TASKS: &str = const_format::formatcp!(
    "{} WHERE t.parent_task_id = ? ORDER BY t.id",
    SELECT_TASK_JOINED
);

/// Single task by id
pub const SELECT_TASK_BY_ID: &str =
    const_format::formatcp!("{} WHERE t.id = ? LIMIT 1", SELECT_TASK_JOINED);

/// Check if a task exists by ID
pub const CHECK_TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?)";

/// Check if a category exists by ID
pub const CHECK_CATEGORY_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?)";

/// Get parent_task_id for a task
pub const SELECT_TASK_PARENT_ID: &str = "SELECT parent_task_id FROM tasks WHERE id = ?";

pub const INSERT_TASK: &str = r#"
    INSERT INTO tasks (
        title,
        description,
        status,
        priority,
        due_date,
        completed_at,
        created_at,
        updated_at,
        parent_task_id,
        category_id
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const DELETE_TASK_BY_ID: &str = "DELETE FROM tasks WHERE id = ?";

/// Take the write lock up front so concurrent writers wait on the busy
/// timeout instead of failing when a read snapshot is upgraded
pub const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

// ============================================================================
// Category Queries
// ============================================================================

pub const INSERT_CATEGORY: &str = "INSERT INTO categories (name) VALUES (?)";

pub const SELECT_CATEGORY_BY_ID: &str = "SELECT id, name FROM categories WHERE id = ?";

pub const COUNT_CATEGORIES: &str = "SELECT COUNT(*) FROM categories";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_queries_share_projection() {
        for query in [LIST_ROOT_TASKS, LIST_CHILD_TASKS, SELECT_TASK_BY_ID] {
            assert!(query.starts_with("SELECT t.id, t.parent_task_id"));
            assert!(query.contains("LEFT JOIN categories c ON c.id = t.category_id"));
            assert!(query.contains("c.name AS category_name"));
        }
    }

    #[test]
    fn test_listings_are_ordered_by_id() {
        assert!(LIST_ROOT_TASKS.ends_with("ORDER BY t.id"));
        assert!(LIST_CHILD_TASKS.ends_with("ORDER BY t.id"));
    }
}
