use loggino_core::{AnnotationMode, ApiSettings, LogginoConfig};
use loggino_server::{run_server, AppState};
use loggino_store::{ensure_schema, Gateway};
use std::path::Path;

pub async fn run(config_path: &Path, api_config_path: &Path) -> anyhow::Result<()> {
    let config = LogginoConfig::load(config_path);
    let api = ApiSettings::load(api_config_path);

    // Schema problems are not fatal; /get_logs degrades to an empty list
    match ensure_schema(&Gateway::new(&config.database_url)).await {
        Ok(report) if report.is_complete() => {
            tracing::info!(added = ?report.added, "schema check complete");
        }
        Ok(report) => {
            tracing::warn!(failed = ?report.failed, "schema check incomplete");
        }
        Err(e) => tracing::warn!(error = %e, "schema check skipped"),
    }

    if config.annotation_mode == AnnotationMode::Live && api.api_key.is_none() {
        tracing::warn!("live annotation enabled but no API key configured");
    }

    let state = AppState::new(&config, api);
    run_server(&config, state).await?;
    Ok(())
}
