//! Per-operation database connections

use loggino_core::LogRecord;

use crate::postgres::{self, PgStore};
use crate::schema::{ColumnSpec, SchemaReport};
use crate::sqlite::{self, SqliteStore};
use crate::StoreError;

/// Opens a fresh connection for each operation.
///
/// Nothing is pooled, and every connection is released before the
/// operation returns, on success and on error. The backend follows the
/// connection string: `postgres://` and `postgresql://` URLs go to
/// PostgreSQL, anything else is a SQLite path (optionally `sqlite://`).
/// SQLite calls run on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct Gateway {
    backend: Backend,
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(PgStore),
    Sqlite(SqliteStore),
}

impl Gateway {
    pub fn new(database_url: &str) -> Self {
        let backend = if database_url.starts_with("postgres://")
            || database_url.starts_with("postgresql://")
        {
            Backend::Postgres(PgStore::new(database_url))
        } else {
            let path = database_url
                .strip_prefix("sqlite://")
                .unwrap_or(database_url);
            Backend::Sqlite(SqliteStore::new(path))
        };
        Self { backend }
    }

    /// Where this gateway connects, safe to log
    pub fn describe(&self) -> String {
        match &self.backend {
            Backend::Postgres(store) => store.target(),
            Backend::Sqlite(store) => store.path().display().to_string(),
        }
    }

    /// Definitions of the working columns for this backend
    pub fn working_columns(&self) -> &'static [ColumnSpec] {
        match &self.backend {
            Backend::Postgres(_) => postgres::COLUMNS,
            Backend::Sqlite(_) => sqlite::COLUMNS,
        }
    }

    /// Every row, highest id first
    pub async fn fetch_newest_first(&self) -> Result<Vec<LogRecord>, StoreError> {
        match &self.backend {
            Backend::Postgres(store) => store.fetch_newest_first().await,
            Backend::Sqlite(store) => blocking(store, |s| s.fetch_newest_first()).await,
        }
    }

    pub async fn set_unique_error(&self, id: i64, signature: &str) -> Result<usize, StoreError> {
        match &self.backend {
            Backend::Postgres(store) => store.set_unique_error(id, signature).await,
            Backend::Sqlite(store) => {
                let signature = signature.to_string();
                blocking(store, move |s| s.set_unique_error(id, &signature)).await
            }
        }
    }

    /// First stored annotation for `signature`, if any
    pub async fn cached_annotation(&self, signature: &str) -> Result<Option<String>, StoreError> {
        match &self.backend {
            Backend::Postgres(store) => store.cached_annotation(signature).await,
            Backend::Sqlite(store) => {
                let signature = signature.to_string();
                blocking(store, move |s| s.cached_annotation(&signature)).await
            }
        }
    }

    pub async fn set_ai_response(&self, id: i64, text: &str) -> Result<usize, StoreError> {
        match &self.backend {
            Backend::Postgres(store) => store.set_ai_response(id, text).await,
            Backend::Sqlite(store) => {
                let text = text.to_string();
                blocking(store, move |s| s.set_ai_response(id, &text)).await
            }
        }
    }

    pub(crate) async fn ensure_columns(&self, specs: &[ColumnSpec]) -> Result<SchemaReport, StoreError> {
        match &self.backend {
            Backend::Postgres(store) => store.ensure_columns(specs).await,
            Backend::Sqlite(store) => {
                let specs = specs.to_vec();
                blocking(store, move |s| s.ensure_columns(&specs)).await
            }
        }
    }
}

async fn blocking<T, F>(store: &SqliteStore, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&SqliteStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || op(&store)).await?
}
