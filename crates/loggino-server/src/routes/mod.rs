//! Route handlers

pub mod logs;
pub mod pages;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/get_logs", get(logs::get_logs))
        .route("/about", get(pages::about))
        .route("/config", get(pages::collector_config))
        .with_state(state)
}
