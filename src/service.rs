use crate::backend::TaskRepository;
use crate::db::models::{CreateTaskInput, Task, UpdateTaskInput};
use crate::error::Result;

/// Entry point used by the HTTP layer. Every call goes straight to the repository.
#[derive(Clone)]
pub struct TaskService<R> {
    repository: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn list_root_tasks(&self) -> Result<Vec<Task>> {
        self.repository.list_root_tasks().await
    }

    pub async fn list_root_subtasks(&self, task_id: i64) -> Result<Vec<Task>> {
        self.repository.list_root_subtasks(task_id).await
    }

    pub async fn get_task(&self, task_id: i64) -> Result<Task> {
        self.repository.get_task(task_id).await
    }

    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Task> {
        self.repository.create_task(input).await
    }

    pub async fn update_task(&self, task_id: i64, input: UpdateTaskInput) -> Result<Task> {
        self.repository.update_task(task_id, input).await
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        self.repository.delete_task(task_id).await
    }
}
