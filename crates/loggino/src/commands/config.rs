use loggino_core::{ApiSettings, LogginoConfig};
use std::path::Path;

/// Effective settings after defaults, API key masked
pub fn render(config: &LogginoConfig, api: &ApiSettings) -> anyhow::Result<String> {
    let output = serde_json::json!({
        "loggino": config,
        "api": api.redacted(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn run(config_path: &Path, api_config_path: &Path) -> anyhow::Result<()> {
    let config = LogginoConfig::load(config_path);
    let api = ApiSettings::load(api_config_path);
    println!("{}", render(&config, &api)?);
    Ok(())
}
