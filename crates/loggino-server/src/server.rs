//! API server setup

use axum::Router;
use loggino_core::LogginoConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes::create_router;
use crate::state::AppState;

/// Router with request tracing
pub fn create_server(state: AppState) -> Router {
    create_router(state).layer(TraceLayer::new_for_http())
}

/// Serve on the configured host and port until the process stops
pub async fn run_server(config: &LogginoConfig, state: AppState) -> std::io::Result<()> {
    let router = create_server(state);
    let listener = TcpListener::bind(config.bind_addr()).await?;

    tracing::info!("Loggino listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await
}
