use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Task hierarchy cycle: task {task_id} cannot be placed under task {parent_id}")]
    HierarchyCycle { task_id: i64, parent_id: i64 },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Coarse classification used by the HTTP boundary to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    CategoryNotFound,
    HierarchyCycle,
    InvalidPayload,
    Internal,
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::TaskNotFound(_) => ErrorKind::NotFound,
            TaskError::CategoryNotFound(_) => ErrorKind::CategoryNotFound,
            TaskError::HierarchyCycle { .. } => ErrorKind::HierarchyCycle,
            TaskError::InvalidPayload(_) => ErrorKind::InvalidPayload,
            _ => ErrorKind::Internal,
        }
    }

    pub fn to_error_code(&self) -> &'static str {
        match self {
            TaskError::TaskNotFound(_) => "TASK_NOT_FOUND",
            TaskError::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            TaskError::HierarchyCycle { .. } => "HIERARCHY_CYCLE",
            TaskError::InvalidPayload(_) => "INVALID_PAYLOAD",
            TaskError::InvalidConfig(_) => "INVALID_CONFIG",
            TaskError::DatabaseError(_) => "DATABASE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    /// True when the underlying storage error is a foreign key violation.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            TaskError::DatabaseError(e) => e.as_database_error().is_some_and(|db| {
                db.is_foreign_key_violation()
                    || db.message().contains("FOREIGN KEY constraint failed")
            }),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
