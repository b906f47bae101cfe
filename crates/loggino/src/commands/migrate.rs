use loggino_core::LogginoConfig;
use loggino_store::{ensure_schema, Gateway};
use std::path::Path;

pub async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = LogginoConfig::load(config_path);
    let gateway = Gateway::new(&config.database_url);

    let report = ensure_schema(&gateway).await?;

    println!("Schema check: {}", gateway.describe());
    for column in &report.present {
        println!("  {:<14} present", column);
    }
    for column in &report.added {
        println!("  {:<14} added", column);
    }
    for (column, error) in &report.failed {
        println!("  {:<14} FAILED: {}", column, error);
    }

    if !report.is_complete() {
        anyhow::bail!("{} column(s) could not be added", report.failed.len());
    }
    Ok(())
}
