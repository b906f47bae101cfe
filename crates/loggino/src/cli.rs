use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loggino")]
#[command(version)]
#[command(about = "Deduplicating dashboard for collector-shipped error logs")]
pub struct Cli {
    /// Dashboard settings file
    #[arg(long, global = true, default_value = "loggino_config.json")]
    pub config: PathBuf,

    /// Text-generation API settings file
    #[arg(long, global = true, default_value = "api_config.json")]
    pub api_config: PathBuf,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Check the schema, then serve the dashboard
    Serve,

    /// Add missing working columns to the log table and exit
    Migrate,

    /// Print the effective configuration
    Config,

    /// Print version information
    Version,
}
