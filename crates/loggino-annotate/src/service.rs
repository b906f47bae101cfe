//! Cache-first annotation of error signatures

use loggino_core::{AnnotationMode, LogView};
use loggino_store::{Gateway, StoreError};
use std::sync::Arc;

use crate::{GenerateError, TextGenerator};

pub const DB_CONNECTION_ERROR: &str = "Database connection error";
pub const STORAGE_ERROR: &str = "AI response storage error";
const MISSING_KEY: &str = "OpenAI API key is missing.";

/// Returns the annotation for an entry's signature, producing and storing
/// one on a cache miss.
///
/// The first annotation stored for a signature wins: later rows with the
/// same `unique_error` reuse it and nothing is regenerated. Failures never
/// escape; they become the annotation text.
pub struct Annotator {
    gateway: Gateway,
    generator: Arc<dyn TextGenerator>,
    mode: AnnotationMode,
    placeholder: String,
}

impl Annotator {
    pub fn new(
        gateway: Gateway,
        generator: Arc<dyn TextGenerator>,
        mode: AnnotationMode,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            generator,
            mode,
            placeholder: placeholder.into(),
        }
    }

    pub async fn annotate(&self, entry: &LogView) -> String {
        match self.gateway.cached_annotation(&entry.unique_error).await {
            Ok(Some(cached)) => {
                tracing::debug!(id = entry.id, "annotation cache hit");
                return cached;
            }
            Ok(None) => {}
            Err(e) => return degrade(e),
        }

        let text = self.produce(entry).await;

        match self.gateway.set_ai_response(entry.id, &text).await {
            Ok(_) => text,
            Err(e) => degrade(e),
        }
    }

    async fn produce(&self, entry: &LogView) -> String {
        match self.mode {
            AnnotationMode::Placeholder => self.placeholder.clone(),
            AnnotationMode::Live => {
                tracing::info!(id = entry.id, signature = %entry.unique_error, "requesting annotation");
                match self
                    .generator
                    .generate(&entry.error, &entry.description, &entry.resource)
                    .await
                {
                    Ok(text) => text,
                    Err(GenerateError::MissingApiKey) => MISSING_KEY.to_string(),
                    Err(e) => {
                        tracing::warn!(id = entry.id, error = %e, "annotation request failed");
                        format!("OpenAI request failed: {}", e)
                    }
                }
            }
        }
    }
}

fn degrade(e: StoreError) -> String {
    match e {
        StoreError::Connect { .. } => DB_CONNECTION_ERROR.to_string(),
        other => {
            tracing::error!(error = %other, "error saving annotation");
            STORAGE_ERROR.to_string()
        }
    }
}
