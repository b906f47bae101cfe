use async_trait::async_trait;
use axum_test::TestServer;
use loggino_annotate::{GenerateError, TextGenerator};
use loggino_core::{AnnotationMode, LogginoConfig};
use loggino_server::{create_router, AppState};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const ISO_TS: &str = r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}";

#[derive(Default)]
pub struct CountingGenerator {
    calls: AtomicUsize,
}

impl CountingGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn generate(
        &self,
        error: &str,
        _description: &str,
        _resource: &str,
    ) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("advice for {}", error))
    }
}

/// A row as seeded: id, error line, existing annotation, existing signature
pub struct Row<'a> {
    pub id: i64,
    pub log: &'a str,
    pub ai_response: Option<&'a str>,
    pub unique_error: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn new(id: i64, log: &'a str) -> Self {
        Self {
            id,
            log,
            ai_response: None,
            unique_error: None,
        }
    }
}

pub fn seed_database(path: &Path, rows: &[Row<'_>]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE logs (id INTEGER PRIMARY KEY, tag TEXT, time TEXT, data TEXT,
                            ai_response TEXT, unique_error TEXT)",
    )
    .unwrap();
    for row in rows {
        let data = serde_json::json!({
            "log": row.log,
            "filename": "/var/log/app.log",
            "description": "app-host",
            "resource": "https://runbooks.example/app",
        });
        conn.execute(
            "INSERT INTO logs (id, tag, time, data, ai_response, unique_error)
             VALUES (?1, 'app.web', '2024-01-01 10:00:00', ?2, ?3, ?4)",
            params![row.id, data.to_string(), row.ai_response, row.unique_error],
        )
        .unwrap();
    }
}

pub fn column(path: &Path, name: &str, id: i64) -> Option<String> {
    Connection::open(path)
        .unwrap()
        .query_row(
            &format!("SELECT {} FROM logs WHERE id = ?1", name),
            params![id],
            |row| row.get(0),
        )
        .unwrap()
}

pub fn test_config(dir: &TempDir) -> LogginoConfig {
    LogginoConfig {
        database_url: dir.path().join("logs.db").to_string_lossy().into_owned(),
        log_limit: 20,
        fluent_bit_config_path: dir.path().join("fluent-bit.conf"),
        app_version: "2.3.4".to_string(),
        timestamp_cleaning_patterns: vec![ISO_TS.to_string()],
        annotation_mode: AnnotationMode::Placeholder,
        ..LogginoConfig::default()
    }
}

pub fn test_server(config: &LogginoConfig, generator: Arc<CountingGenerator>) -> TestServer {
    let state = AppState::with_generator(config, generator);
    TestServer::new(create_router(state)).unwrap()
}
