//! HTTP API server

use super::middleware::{AuthMiddleware, AuthState, RequestLogger, cors_layer};
use super::routes::{
    BuildContext, ExecContext, FileContext, ProjectContext, SyncContext, build_routes,
    endpoint_not_found, exec_routes, file_routes, health_routes, project_routes, sync_routes,
};
use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit, middleware};
use keel_core::KeelConfig;
use keel_exec::{BuildDetector, CommandRunner, ShellCommandRunner};
use keel_store::SqliteStore;
use keel_vfs::{ProjectRegistry, Synchronizer, VirtualFileStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// HTTP API server
pub struct ApiServer {
    config: Arc<KeelConfig>,
    store: Arc<SqliteStore>,
    runner: Arc<dyn CommandRunner>,
}

impl ApiServer {
    /// Open the record store named in `config` and use the system shell.
    pub async fn new(config: Arc<KeelConfig>) -> Result<Self> {
        info!("Initializing API server");

        let store = SqliteStore::open(
            &config.store.database_path,
            Duration::from_millis(config.store.busy_timeout_ms),
            config.store.max_connections,
        )
        .await
        .with_context(|| {
            format!(
                "Failed to open record store at {}",
                config.store.database_path.display()
            )
        })?;

        Ok(Self::with_parts(
            config,
            Arc::new(store),
            Arc::new(ShellCommandRunner::new()),
        ))
    }

    /// Assemble a server from already constructed parts.
    pub fn with_parts(
        config: Arc<KeelConfig>,
        store: Arc<SqliteStore>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            config,
            store,
            runner,
        }
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind to {}", addr))?;

        info!("keel API listening on http://{}", addr);
        info!("  GET|PUT|DELETE /api/file?project=&path=");
        info!("  ANY            /api/sync?project=");
        info!("  ANY            /api/build?project=");
        info!("  POST           /api/exec");
        info!("  GET|POST       /api/projects");
        info!("  GET            /health (no key required)");
        if self.config.exec.enabled {
            warn!("Command execution is ENABLED: any holder of the API key can run shell commands on this host");
        } else {
            info!("Command execution is disabled; /api/exec and /api/build answer 403");
        }

        let store = self.store.clone();
        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        store.close().await;
        info!("API server stopped");
        Ok(())
    }

    /// Build the application router with all routes and middleware
    pub fn router(&self) -> Router {
        let registry = ProjectRegistry::new(self.store.clone());
        let files = VirtualFileStore::new(self.store.clone());
        let sync = Synchronizer::new(registry.clone(), files.clone());
        let enabled = self.config.exec.enabled;

        let file_context = FileContext { files };
        let sync_context = SyncContext { sync };
        let build_context = BuildContext {
            registry: registry.clone(),
            detector: BuildDetector::new(self.runner.clone()),
            enabled,
        };
        let exec_context = ExecContext {
            registry: registry.clone(),
            runner: self.runner.clone(),
            enabled,
            default_working_dir: self.config.default_working_dir().to_path_buf(),
        };
        let project_context = ProjectContext { registry };

        let auth_state = AuthState::new(self.config.api_key());

        Router::new()
            .merge(health_routes())
            .merge(file_routes(file_context))
            .merge(sync_routes(sync_context))
            .merge(build_routes(build_context))
            .merge(exec_routes(exec_context))
            .merge(project_routes(project_context))
            .fallback(endpoint_not_found)
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .layer(middleware::from_fn_with_state(
                auth_state,
                AuthMiddleware::validate,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors_layer())
                    .layer(middleware::from_fn(RequestLogger::log)),
            )
    }
}
