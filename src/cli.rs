use clap::Parser;
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Tasktree - REST backend for hierarchical tasks

Tasks form a forest: every task may have a parent, reparenting is checked
for cycles, and PATCH requests only touch the fields they mention.

Endpoints:
  GET    /api/tasks                 Root tasks
  POST   /api/tasks                 Create a task
  GET    /api/tasks/{id}            One task
  PATCH  /api/tasks/{id}            Partial update
  DELETE /api/tasks/{id}            Delete a task and its subtree
  GET    /api/tasks/{id}/subtasks   Full subtree below a task
  GET    /api/health                Liveness and database ping
  GET    /api/health/report         Service report

Flags override the matching environment variables (APP_HOST, APP_PORT,
TASKTREE_DB_PATH, TASKTREE_LOG_FILE).
"#;

#[derive(Parser, Debug, Clone)]
#[command(name = "tasktree")]
#[command(about = "REST backend for hierarchical tasks")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// SQLite database file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Insert demo categories and tasks when the database is empty
    #[arg(long)]
    pub seed: bool,

    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
