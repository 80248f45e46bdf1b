//! Gemini API client
//!
//! Direct HTTP client for the Gemini REST API. One-shot calls go to
//! `generateContent`; chat replies stream from `streamGenerateContent` as
//! server-sent events.

use super::sse;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use super::{AiProvider, ChatHandle, ChunkStream};
use crate::config::GeminiConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Gemini REST implementation of [`AiProvider`]
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// An empty key is accepted here; every call then fails with
    /// [`ProviderError::MissingApiKey`].
    pub fn new(config: &GeminiConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.trim().to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Point the client at another endpoint (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn require_key(&self) -> Result<(), ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }
        Ok(())
    }
}

/// Map a non-success response to an error, passing successes through
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());

    tracing::error!(
        status_code = status_code,
        error_body = %error_body,
        "Gemini API returned error status"
    );

    if status_code == 429 {
        return Err(ProviderError::RateLimited(error_body));
    }
    Err(ProviderError::Status {
        code: status_code,
        body: error_body,
    })
}

#[async_trait]
impl AiProvider for GeminiClient {
    async fn generate_once(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        self.require_key()?;

        let url = self.endpoint(model, "generateContent");
        let request_body = GenerateContentRequest::single(prompt);

        tracing::debug!(
            url = %url,
            model = %model,
            prompt_len = prompt.len(),
            "Calling Gemini API"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let response_body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_body).map_err(|e| {
            ProviderError::InvalidResponse(format!("{} - Response body: {}", e, response_body))
        })?;

        if let Some(reason) = parsed.block_reason() {
            return Err(ProviderError::Blocked(reason.to_string()));
        }

        let text = parsed.text();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        tracing::debug!(
            response_len = text.len(),
            "Successfully received response from Gemini API"
        );

        Ok(text)
    }

    async fn stream_reply(
        &self,
        handle: &ChatHandle,
        message: &str,
    ) -> Result<ChunkStream, ProviderError> {
        self.require_key()?;

        let url = self.endpoint(&handle.model, "streamGenerateContent");
        let request_body = GenerateContentRequest::conversation(
            &handle.system_instruction,
            &handle.history,
            message,
        );

        tracing::debug!(
            url = %url,
            model = %handle.model,
            history_len = handle.history.len(),
            message_len = message.len(),
            "Opening Gemini stream"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("alt", "sse"), ("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(sse::reply_chunks(response.bytes_stream()))
    }
}
