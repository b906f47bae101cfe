//! Remediation annotations for error signatures, cached in the log table

pub mod client;
mod prompt;
mod service;

pub use client::{GenerateError, OpenAiClient, TextGenerator};
pub use prompt::{build_user_prompt, SYSTEM_PROMPT};
pub use service::{Annotator, DB_CONNECTION_ERROR, STORAGE_ERROR};
