//! Configuration, signature normalization and log record types

mod config;
mod normalize;
mod types;

pub use config::{AnnotationMode, ApiSettings, ConfigError, LogginoConfig};
pub use normalize::Normalizer;
pub use types::{LogPayload, LogRecord, LogView};
