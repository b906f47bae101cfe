use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot open database {target}: {source}")]
    Connect {
        /// Path or URL with any password masked
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("table `{0}` does not exist")]
    MissingTable(&'static str),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
