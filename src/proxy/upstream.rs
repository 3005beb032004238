//! Client for the hosted chat-completion API.

use std::time::Duration;

use reqwest::Client;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{ApiKey, UpstreamConfig};
use crate::error::{Error, Result};

/// Forwards single-turn queries to an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    url: String,
    model: String,
    api_key: Option<ApiKey>,
    system_prompt: String,
}

impl ChatClient {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            url: config.url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint that completion requests are posted to.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.url.trim_end_matches('/'))
    }

    /// Send `query` and return the assistant's reply text.
    pub async fn complete(&self, query: &str) -> Result<String> {
        let body = ChatCompletionRequest::single_turn(&self.model, &self.system_prompt, query);

        let mut request = self
            .http
            .post(self.completions_url())
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, url = %self.url, "Failed to reach upstream");
            Error::Upstream(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %error_body,
                "Upstream returned error"
            );
            return Err(Error::Provider(format!(
                "Upstream returned {}: {}",
                status, error_body
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse upstream response");
            Error::Provider(format!("Failed to parse upstream response: {}", e))
        })?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Upstream usage"
            );
        }

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| Error::Provider("Upstream returned no choices".to_string()))
    }
}
