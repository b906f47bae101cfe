//! Log table rows and the view served to the dashboard

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Normalizer;

/// A row of the `logs` table as written by the collector
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub id: i64,
    pub tag: String,
    /// Ingestion time (UTC)
    pub time: NaiveDateTime,
    /// Raw JSON payload text
    pub data: String,
    pub ai_response: Option<String>,
    pub unique_error: Option<String>,
}

impl LogRecord {
    /// Annotation still to be produced (null or empty)
    pub fn needs_annotation(&self) -> bool {
        self.ai_response.as_deref().map_or(true, str::is_empty)
    }
}

/// Decoded `data` column
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LogPayload {
    fields: Map<String, Value>,
}

impl LogPayload {
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Field as text; strings verbatim, other values as JSON, `default` if absent or null
    pub fn text(&self, key: &str, default: &str) -> String {
        match self.fields.get(key) {
            None | Some(Value::Null) => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn log(&self) -> String {
        self.text("log", "No message")
    }

    pub fn filename(&self) -> String {
        self.text("filename", "Unknown File")
    }

    pub fn description(&self) -> String {
        self.text("description", "No description")
    }

    pub fn resource(&self) -> String {
        self.text("resource", "No resource")
    }
}

/// Entry returned by `/get_logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogView {
    pub id: i64,
    pub tag: String,
    /// ISO-8601 ingestion time
    pub timestamp: String,
    pub error: String,
    pub filename: String,
    pub description: String,
    pub resource: String,
    pub ai_response: Option<String>,
    pub unique_error: String,
}

impl LogView {
    /// Decode the payload of `record` and compute its signature
    pub fn from_record(record: LogRecord, normalizer: &Normalizer) -> Result<Self, serde_json::Error> {
        let payload = LogPayload::parse(&record.data)?;
        let error = payload.log();
        let unique_error = normalizer.normalize(&error);

        Ok(Self {
            id: record.id,
            tag: record.tag,
            timestamp: record.time.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            error,
            filename: payload.filename(),
            description: payload.description(),
            resource: payload.resource(),
            ai_response: record.ai_response,
            unique_error,
        })
    }
}
