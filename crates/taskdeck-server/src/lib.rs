//! REST service exposing the task store.
//!
//! The service is a thin pass-through: request bodies are the core wire
//! types, responses are the stored documents, and the error taxonomy maps
//! straight to HTTP statuses (validation 400, unknown id 404, store trouble
//! 500). CORS is wide open so a browser client on another origin can talk to
//! it directly.

/// Error-to-response mapping.
pub mod error;
/// Route handlers.
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use taskdeck_store_json::JsonStore;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared state handed to every route handler.
pub struct AppState {
    /// The backing document store.
    pub store: JsonStore,
}

impl AppState {
    /// Wrap a store for use by the router.
    #[must_use]
    pub const fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

/// Build the service router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/will", get(routes::greeting))
        .route("/api/tasks", get(routes::list_tasks).post(routes::create_task))
        .route(
            "/api/tasks/{id}",
            axum::routing::put(routes::update_task).delete(routes::delete_task),
        )
        .layer(cors)
        .with_state(state)
}

/// Bind `addr` and serve the task API until the process is stopped.
///
/// # Errors
/// Returns an error when the listener cannot be bound or the server loop
/// fails.
pub async fn serve(addr: SocketAddr, store: JsonStore) -> Result<()> {
    let app = router(Arc::new(AppState::new(store)));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "task service listening");
    axum::serve(listener, app).await.context("server loop failed")?;
    Ok(())
}
