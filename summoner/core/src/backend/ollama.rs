//! Ollama Backend Implementation
//!
//! Uses the non-streaming `/api/generate` endpoint; the description is shown
//! only once it is complete. `/api/tags` doubles as the health probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::traits::{LlmBackend, LlmRequest, LlmResponse};
use crate::config::BackendConfig;

/// Ollama backend client
#[derive(Clone)]
pub struct OllamaBackend {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });
        Self {
            host: host.into(),
            port,
            http_client,
        }
    }

    /// Create from the backend section of the config
    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.host.clone(), config.port)
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url())
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    /// Build the full prompt including the system prompt
    fn build_prompt(&self, request: &LlmRequest) -> String {
        match request.system {
            Some(ref system) => format!("{system}\n\n{}", request.prompt),
            None => request.prompt.clone(),
        }
    }

    fn request_body(&self, request: &LlmRequest) -> serde_json::Value {
        let mut options = serde_json::json!({ "temperature": request.temperature });
        if request.max_tokens > 0 {
            options["num_predict"] = serde_json::json!(request.max_tokens);
        }
        serde_json::json!({
            "model": request.model,
            "prompt": self.build_prompt(request),
            "stream": false,
            "options": options,
        })
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.generate_url())
            .json(&self.request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama returned {status}: {body}");
        }

        let data: serde_json::Value = response.json().await?;
        let content = data
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(LlmResponse {
            content,
            model: request.model.clone(),
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}
