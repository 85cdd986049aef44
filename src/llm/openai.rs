//! OpenAI互換 Chat Completions クライアント

use super::types::{CompletionRequest, CompletionResponse};
use super::CompletionClient;
use crate::config::Config;
use crate::error::{ReefIdError, Result};
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("reef-id/", env!("CARGO_PKG_VERSION"));

pub struct OpenAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_seconds: u64,
}

impl OpenAiClient {
    pub fn new(api_base_url: &str, api_key: String, timeout_seconds: u64) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ReefIdError::ApiCall(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", api_base_url.trim_end_matches('/')),
            api_key,
            timeout_seconds,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.get_api_key()?, config.timeout_seconds)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "calling chat completions"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReefIdError::Timeout(self.timeout_seconds)
                } else {
                    ReefIdError::ApiCall(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReefIdError::ApiCall(format!("{}: {}", status, body.trim())));
        }

        let payload: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ReefIdError::Timeout(self.timeout_seconds)
            } else {
                ReefIdError::ApiParse(e.to_string())
            }
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ReefIdError::ApiParse("レスポンスに本文がありません".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiClient::new("https://api.openai.com/v1/", "sk-test".into(), 30).unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
