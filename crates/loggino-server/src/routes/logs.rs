use axum::{extract::State, Json};
use loggino_core::LogView;

use crate::query::list_logs;
use crate::state::AppState;

/// Always 200; a failed query is logged and served as an empty list
pub async fn get_logs(State(state): State<AppState>) -> Json<Vec<LogView>> {
    match list_logs(&state).await {
        Ok(logs) => Json(logs),
        Err(e) => {
            tracing::error!(error = %e, "error fetching logs");
            Json(Vec::new())
        }
    }
}
