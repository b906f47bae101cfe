//! Access to the collector's `logs` table, in PostgreSQL or SQLite

mod error;
mod gateway;
mod postgres;
mod schema;
mod sqlite;

pub use error::StoreError;
pub use gateway::Gateway;
pub use schema::{ensure_columns, ensure_schema, ColumnSpec, SchemaReport};

/// Table the collector writes to
const LOG_TABLE: &str = "logs";
