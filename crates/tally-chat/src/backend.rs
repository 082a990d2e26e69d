//! Expense backend adapter.
//!
//! [`AskBackend`] is the seam between the chat session and the network;
//! [`HttpBackend`] is the reqwest implementation used by the binary.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tally_core::config::BackendConfig;
use tracing::{debug, warn};

use crate::error::ChatError;

/// Something that can answer a free-text question with a JSON payload.
#[async_trait]
pub trait AskBackend: Send + Sync {
    /// Send `text` and return the decoded JSON payload.
    async fn ask(&self, text: &str) -> Result<Value, ChatError>;

    /// Check that the backend is reachable and healthy.
    async fn health(&self) -> Result<(), ChatError>;
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
}

/// HTTP client for the expense backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, ChatError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AskBackend for HttpBackend {
    async fn ask(&self, text: &str) -> Result<Value, ChatError> {
        let url = self.url("/api/ask");
        debug!(url = %url, chars = text.chars().count(), "Posting question");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { text })
            .send()
            .await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::Transport(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Backend rejected question");
            return Err(match serde_json::from_str::<ErrorBody>(&body) {
                Ok(ErrorBody {
                    detail: Some(detail),
                }) => ChatError::Rejected {
                    status: status.as_u16(),
                    detail,
                },
                _ => ChatError::HttpStatus(status.as_u16()),
            });
        }

        serde_json::from_str(&body).map_err(|e| ChatError::InvalidBody(e.to_string()))
    }

    async fn health(&self) -> Result<(), ChatError> {
        let response = self.client.get(self.url("/health")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Unhealthy(format!("status {}", status.as_u16())));
        }

        let body: HealthBody = response
            .json()
            .await
            .map_err(|e| ChatError::Unhealthy(format!("unexpected health body: {}", e)))?;
        if body.status != "ok" {
            return Err(ChatError::Unhealthy(format!("reported {:?}", body.status)));
        }
        Ok(())
    }
}
