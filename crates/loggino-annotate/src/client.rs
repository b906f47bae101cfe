//! Text-generation client for OpenAI-compatible chat APIs

use async_trait::async_trait;
use loggino_core::ApiSettings;
use thiserror::Error;

use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key is missing")]
    MissingApiKey,

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response contained no message")]
    EmptyResponse,
}

/// Produces remediation advice for an error line
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        error: &str,
        description: &str,
        resource: &str,
    ) -> Result<String, GenerateError>;
}

/// Chat-completions client; settings are fixed at construction
pub struct OpenAiClient {
    http: reqwest::Client,
    settings: ApiSettings,
}

impl OpenAiClient {
    pub fn new(settings: ApiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.api_base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(
        &self,
        error: &str,
        description: &str,
        resource: &str,
    ) -> Result<String, GenerateError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(GenerateError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": self.settings.model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": build_user_prompt(error, description, resource)}
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(String::from)
            .ok_or(GenerateError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: Option<&str>, base: &str) -> ApiSettings {
        ApiSettings {
            api_key: api_key.map(String::from),
            model: "gpt-4".to_string(),
            api_base_url: base.to_string(),
        }
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = OpenAiClient::new(settings(None, "https://api.example.com/v1/"));
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = OpenAiClient::new(settings(None, "http://127.0.0.1:1"));
        let result = client.generate("disk full", "db", "none").await;
        assert!(matches!(result, Err(GenerateError::MissingApiKey)));

        let empty = OpenAiClient::new(settings(Some(""), "http://127.0.0.1:1"));
        let result = empty.generate("disk full", "db", "none").await;
        assert!(matches!(result, Err(GenerateError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let client = OpenAiClient::new(settings(Some("sk-test"), "http://127.0.0.1:1"));
        let result = client.generate("disk full", "db", "none").await;
        assert!(matches!(result, Err(GenerateError::Http(_))));
    }
}
