use anyhow::{Context, Result};
use axum::{http::Method, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::db::{create_pool, run_migrations, seed_demo_data};
use crate::i18n::Translator;
use crate::service::TaskService;
use crate::tasks::SqliteTaskRepository;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: TaskService<SqliteTaskRepository>,
    pub translator: Arc<Translator>,
    pub db_pool: SqlitePool,
    pub app_name: String,
    pub app_version: String,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        translator: Translator,
        app_name: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            service: TaskService::new(SqliteTaskRepository::new(db_pool.clone())),
            translator: Arc::new(translator),
            db_pool,
            app_name: app_name.into(),
            app_version: app_version.into(),
        }
    }
}

/// HTTP server instance
pub struct ApiServer {
    config: AppConfig,
    seed: bool,
}

impl ApiServer {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            seed: false,
        }
    }

    /// Insert demo data on startup when the database is empty
    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Run until Ctrl-C or SIGTERM
    pub async fn run(self) -> Result<()> {
        let config = self.config;

        let db_pool = create_pool(&config.db_path, config.db_max_connections)
            .await
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
        run_migrations(&db_pool)
            .await
            .context("Failed to run migrations")?;

        if self.seed && !seed_demo_data(&db_pool).await.context("Failed to seed")? {
            tracing::info!("Database already populated, skipping seed");
        }

        let translator = load_translator(&config);
        let state = AppState::new(
            db_pool.clone(),
            translator,
            config.app_name.clone(),
            config.app_version.clone(),
        );
        let app = create_router(state, config.request_timeout);

        let addr = config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        tracing::info!(
            address = %addr,
            database = %config.db_path.display(),
            version = %config.app_version,
            "{} listening",
            config.app_name
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        db_pool.close().await;
        tracing::info!("Server stopped");

        Ok(())
    }
}

fn load_translator(config: &AppConfig) -> Translator {
    let mut translator = Translator::new();

    if let Some(dir) = &config.translations_dir {
        match translator.load_dir(dir) {
            Ok(count) => tracing::info!(count, dir = %dir.display(), "Loaded translation catalogs"),
            Err(e) => {
                tracing::warn!(error = %e, dir = %dir.display(), "Failed to read translation folder")
            },
        }
    }

    translator
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    use super::{handlers, routes};

    Router::new()
        .nest("/api", routes::api_routes())
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
