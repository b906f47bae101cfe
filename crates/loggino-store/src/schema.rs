//! Additive startup migration of the collector's table

use crate::{Gateway, StoreError, LOG_TABLE};

/// A column this service needs on the log table
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    /// Type and constraints, as written after the column name
    pub definition: &'static str,
    /// Statements run in the same transaction once the column exists.
    /// `{table}` stands for the log table.
    pub follow_up: &'static [&'static str],
}

impl ColumnSpec {
    pub(crate) fn follow_up_statements(&self) -> impl Iterator<Item = String> + '_ {
        self.follow_up
            .iter()
            .map(|statement| statement.replace("{table}", LOG_TABLE))
    }
}

/// Outcome of a schema check, per column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub added: Vec<&'static str>,
    pub present: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl SchemaReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Ok(true)` when the column was added, `Ok(false)` when already there
    pub(crate) fn record(&mut self, column: &'static str, outcome: Result<bool, StoreError>) {
        match outcome {
            Ok(true) => {
                tracing::info!(column, "added column");
                self.added.push(column);
            }
            Ok(false) => self.present.push(column),
            Err(e) => {
                tracing::error!(column, error = %e, "schema check failed");
                self.failed.push((column, e.to_string()));
            }
        }
    }
}

/// Add whichever working columns (`ai_response`, `id`, `unique_error`) the
/// log table lacks, using the definitions of the gateway's backend
pub async fn ensure_schema(gateway: &Gateway) -> Result<SchemaReport, StoreError> {
    ensure_columns(gateway, gateway.working_columns()).await
}

/// Add each missing column in `specs`.
///
/// Safe to run on every start. A failed addition (another process may have
/// won the race) is logged and recorded; the remaining columns are still
/// checked.
pub async fn ensure_columns(gateway: &Gateway, specs: &[ColumnSpec]) -> Result<SchemaReport, StoreError> {
    let result = gateway.ensure_columns(specs).await;
    if let Err(StoreError::MissingTable(table)) = &result {
        tracing::warn!(table, "log table not found, has the collector run yet?");
    }
    result
}
