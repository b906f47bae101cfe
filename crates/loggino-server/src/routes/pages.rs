//! Dashboard page, version and collector config passthrough

use axum::{extract::State, http::StatusCode, response::Html};

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn about(State(state): State<AppState>) -> String {
    format!("App version: {}", state.version)
}

/// Collector config file verbatim
pub async fn collector_config(
    State(state): State<AppState>,
) -> Result<String, (StatusCode, String)> {
    tokio::fs::read_to_string(&state.collector_config_path)
        .await
        .map_err(|e| {
            tracing::error!(
                path = %state.collector_config_path.display(),
                error = %e,
                "error reading collector config"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error reading config: {}", e),
            )
        })
}
