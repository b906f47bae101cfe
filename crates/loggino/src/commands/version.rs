use loggino_core::LogginoConfig;
use std::path::Path;

/// Binary version plus the deployment version `/about` reports
pub fn render(config: &LogginoConfig) -> String {
    format!(
        "loggino {}\nApp version: {}",
        env!("CARGO_PKG_VERSION"),
        config.app_version
    )
}

pub fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = LogginoConfig::load(config_path);
    println!("{}", render(&config));
    Ok(())
}
