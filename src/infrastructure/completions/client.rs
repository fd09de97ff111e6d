use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::error::CompletionApiError;
use super::retry::RetryPolicy;
use super::types::{ChatRequest, ChatResponse};
use crate::domain::models::{GenerationConfig, RetryConfig};
use crate::domain::ports::CompletionClient;

/// Configuration for the completions HTTP client
#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    /// API key for authentication; empty means no credential available
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per completion
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retry attempts
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,
}

impl ChatClientConfig {
    /// Assemble client configuration from the loaded application config.
    /// Credential resolution happens here, once, at construction time.
    pub fn from_config(generation: &GenerationConfig, retry: &RetryConfig) -> Self {
        Self {
            api_key: generation.resolve_api_key(),
            base_url: generation.base_url.clone(),
            model: generation.model.clone(),
            temperature: generation.temperature,
            max_tokens: generation.max_tokens,
            timeout_secs: generation.timeout_secs,
            max_retries: retry.max_retries,
            initial_backoff_ms: retry.initial_backoff_ms,
            max_backoff_ms: retry.max_backoff_ms,
        }
    }
}

/// HTTP client for an OpenAI-compatible chat completions API
///
/// Provides robust HTTP communication with:
/// - Connection pooling and reuse
/// - Exponential backoff retry logic for transient errors
/// - Structured error classification (transient vs permanent)
/// - Configurable request timeout
pub struct ChatCompletionsClient {
    http_client: ReqwestClient,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    retry_policy: RetryPolicy,
}

impl ChatCompletionsClient {
    /// Create a new completions client
    ///
    /// A missing API key is not a construction error: the credential is
    /// checked at invocation time so callers can still exercise the
    /// fallback path.
    pub fn new(config: ChatClientConfig) -> Result<Self, CompletionApiError> {
        // Scrub the API key from logs
        let api_key_scrubbed = if config.api_key.len() > 8 {
            format!("{}...[REDACTED]", &config.api_key[..8])
        } else {
            "[REDACTED]".to_string()
        };

        info!(
            "Initializing completions client: base_url={}, model={}, timeout={}s, api_key={}",
            config.base_url, config.model, config.timeout_secs, api_key_scrubbed
        );

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()
            .map_err(CompletionApiError::NetworkError)?;

        Ok(Self {
            http_client,
            api_key: config.api_key,
            base_url: config.base_url,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    /// Send a chat request and return the typed response
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionApiError> {
        if self.api_key.is_empty() {
            return Err(CompletionApiError::MissingApiKey);
        }

        self.retry_policy
            .execute(|| async { self.execute_chat_request(request).await })
            .await
    }

    /// Execute a single chat request (called by retry logic)
    async fn execute_chat_request(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatResponse, CompletionApiError> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle HTTP response and convert to typed result
    async fn handle_response(
        &self,
        response: Response,
    ) -> Result<ChatResponse, CompletionApiError> {
        let status = response.status();

        debug!("response status: {}", status);

        if !status.is_success() {
            return Err(self.handle_error_response(status, response).await);
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response)
    }

    /// Handle error response and classify error type
    async fn handle_error_response(
        &self,
        status: StatusCode,
        response: Response,
    ) -> CompletionApiError {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());

        warn!("API error ({}): {}", status, body);

        CompletionApiError::from_status(status, body)
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::json_completion(
            self.model.clone(),
            system_prompt,
            user_prompt,
            self.temperature,
            self.max_tokens,
        );

        let response = self.send_chat(&request).await?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(CompletionApiError::EmptyResponse.into());
        }

        if let Some(usage) = &response.usage {
            info!(
                "completion succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(content)
    }
}
