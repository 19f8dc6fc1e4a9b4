//! HTTP surface: router, handlers, error mapping.

pub mod error;
mod handlers;
mod state;

pub use state::{AppState, HealthProbe};

use axum::{
    Router,
    routing::{get, post},
};
use tracing::info;

use crate::config::ServerSettings;
use crate::infra::error::InfraError;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/authors", get(handlers::list_authors))
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/posts/{id}", get(handlers::get_post))
        .route("/posts/{id}/unpublish", post(handlers::unpublish_post))
        .route("/health", get(handlers::health))
        .with_state(state)
}

pub async fn serve(server: &ServerSettings, router: Router) -> Result<(), InfraError> {
    let listener = tokio::net::TcpListener::bind(server.listen).await?;
    info!(target: "foglio::http", addr = %server.listen, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InfraError::Io)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!(target: "foglio::http", "shutdown signal received");
}
