#[cfg(test)]
pub mod test_helpers {
    use crate::db::models::Category;
    use crate::db::{create_pool, insert_category, run_migrations};
    use crate::tasks::SqliteTaskRepository;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let db_path = temp_dir.path().join("tasktree.db");

            let pool = create_pool(&db_path, 5).await.unwrap();
            run_migrations(&pool).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }

        pub fn repository(&self) -> SqliteTaskRepository {
            SqliteTaskRepository::new(self.pool.clone())
        }

        pub async fn category(&self, name: &str) -> Category {
            insert_category(&self.pool, name).await.unwrap()
        }
    }
}
