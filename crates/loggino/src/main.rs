mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => commands::serve::run(&cli.config, &cli.api_config).await,
        Commands::Migrate => commands::migrate::run(&cli.config).await,
        Commands::Config => commands::config::run(&cli.config, &cli.api_config),
        Commands::Version => commands::version::run(&cli.config),
    }
}
