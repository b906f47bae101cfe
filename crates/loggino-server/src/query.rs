//! Deduplicated, annotated view of recent log rows

use loggino_core::LogView;
use loggino_store::StoreError;
use std::collections::HashSet;
use thiserror::Error;

use crate::AppState;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("row {id} has an undecodable payload: {source}")]
    Payload {
        id: i64,
        #[source]
        source: serde_json::Error,
    },
}

/// Newest entry per error signature, at most `state.log_limit` of them.
///
/// Rows are scanned newest first. Each kept row gets its signature written
/// back, and an annotation if it has none; rows after the limit is reached
/// are not examined.
pub async fn list_logs(state: &AppState) -> Result<Vec<LogView>, QueryError> {
    let mut logs = Vec::new();
    if state.log_limit == 0 {
        return Ok(logs);
    }

    let records = state.gateway.fetch_newest_first().await?;
    let mut seen = HashSet::new();

    for record in records {
        let id = record.id;
        let needs_annotation = record.needs_annotation();
        let mut entry = LogView::from_record(record, &state.normalizer)
            .map_err(|source| QueryError::Payload { id, source })?;

        // Older duplicate of a signature already listed
        if !seen.insert(entry.unique_error.clone()) {
            continue;
        }

        if let Err(e) = state.gateway.set_unique_error(id, &entry.unique_error).await {
            tracing::warn!(id, error = %e, "error saving unique_error");
        }

        if needs_annotation {
            entry.ai_response = Some(state.annotator.annotate(&entry).await);
        }

        logs.push(entry);
        if logs.len() >= state.log_limit {
            break;
        }
    }

    Ok(logs)
}
