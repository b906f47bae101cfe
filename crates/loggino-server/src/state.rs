//! Application state shared by the handlers

use loggino_annotate::{Annotator, OpenAiClient, TextGenerator};
use loggino_core::{ApiSettings, LogginoConfig, Normalizer};
use loggino_store::Gateway;
use std::path::PathBuf;
use std::sync::Arc;

/// Immutable settings and services, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub normalizer: Arc<Normalizer>,
    pub annotator: Arc<Annotator>,
    /// Max entries per `/get_logs` response
    pub log_limit: usize,
    pub version: String,
    /// Collector config served by `/config`
    pub collector_config_path: PathBuf,
}

impl AppState {
    /// State whose live annotations go to the configured OpenAI-compatible API
    pub fn new(config: &LogginoConfig, api: ApiSettings) -> Self {
        Self::with_generator(config, Arc::new(OpenAiClient::new(api)))
    }

    pub fn with_generator(config: &LogginoConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let gateway = Gateway::new(&config.database_url);
        let annotator = Annotator::new(
            gateway.clone(),
            generator,
            config.annotation_mode,
            config.annotation_placeholder.clone(),
        );

        Self {
            gateway,
            normalizer: Arc::new(Normalizer::new(config.timestamp_cleaning_patterns.as_slice())),
            annotator: Arc::new(annotator),
            log_limit: config.log_limit,
            version: config.app_version.clone(),
            collector_config_path: config.fluent_bit_config_path.clone(),
        }
    }
}
