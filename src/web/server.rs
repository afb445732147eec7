//! HTTP server for the roster API, monitoring endpoints and static front-end

use crate::service::AppState;
use crate::web::health::{
    alive_handler, health_handler, metrics_handler, ready_handler, stats_handler,
};
use crate::web::routes::{
    get_activity_handler, list_activities_handler, root_handler, signup_handler,
    unregister_handler,
};
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the application router over a shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().http.static_dir.clone();

    Router::new()
        .route("/", get(root_handler))
        .route("/activities", get(list_activities_handler))
        .route("/activities/{activity_name}", get(get_activity_handler))
        .route("/activities/{activity_name}/signup", post(signup_handler))
        .route(
            "/activities/{activity_name}/unregister",
            post(unregister_handler),
        )
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/alive", get(alive_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

/// HTTP server with graceful shutdown
pub struct HttpServer {
    state: Arc<AppState>,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    pub fn new(state: Arc<AppState>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self { state, shutdown_tx }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until stopped
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config()
            .bind_address()
            .parse()
            .context("Invalid HTTP server address")?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        self.serve(listener).await
    }

    /// Serve on an already-bound listener until stopped
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", addr);

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Signal the server to stop accepting connections
    pub fn stop(&self) {
        info!("Stopping HTTP server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }
    }
}
