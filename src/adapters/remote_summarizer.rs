use crate::domain::ports::Summarizer;
use crate::utils::error::{EtlError, Result, ServiceErrorKind};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that creates concise summaries of social media posts. Keep summaries to 1-2 sentences and focus on the main point or sentiment.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSummarizerConfig {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
}

impl Default for RemoteSummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 100,
            temperature: 0.7,
            timeout_seconds: 30,
            retry_attempts: 3,
            retry_delay_ms: 1000,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Summaries from an OpenAI-compatible chat completions endpoint.
pub struct RemoteSummarizer {
    client: Client,
    config: RemoteSummarizerConfig,
    api_key: Option<String>,
}

impl RemoteSummarizer {
    pub fn new(config: RemoteSummarizerConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Reads the credential from `config.api_key_env`. A missing key is not an
    /// error here; every call then fails as unauthorized and the caller falls
    /// back to rule-based summaries.
    pub fn from_env(config: RemoteSummarizerConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "⚠️ {} is not set; remote summaries will fall back to rule-based ones",
                config.api_key_env
            );
        }
        Self::new(config, api_key)
    }

    pub fn config(&self) -> &RemoteSummarizerConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, cleaned_text: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "Please provide a brief summary of this confession post: {}",
                        cleaned_text
                    ),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn request_once(&self, api_key: &str, cleaned_text: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&self.build_request(cleaned_text))
            .send()
            .await
            .map_err(|e| EtlError::external(classify_transport(&e), e.to_string()))?;

        let status = response.status();
        tracing::debug!("Summarization response status: {}", status);
        if !status.is_success() {
            return Err(EtlError::external(
                classify_status(status),
                format!("service responded with {}", status),
            ));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EtlError::external(classify_transport(&e), e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|summary| !summary.is_empty())
            .ok_or_else(|| {
                EtlError::external(ServiceErrorKind::Unavailable, "response contained no summary")
            })
    }
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    async fn summarize(&self, cleaned_text: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            EtlError::external(
                ServiceErrorKind::Unauthorized,
                format!("no API key in {}", self.config.api_key_env),
            )
        })?;

        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 0;
        loop {
            match self.request_once(api_key, cleaned_text).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    attempt += 1;
                    let transient = e.service_kind().is_some_and(|kind| kind.is_transient());
                    if !transient || attempt >= attempts {
                        return Err(e);
                    }
                    let delay = self.config.retry_delay_ms.saturating_mul(1 << (attempt - 1).min(16));
                    tracing::warn!(
                        "Summarization attempt {}/{} failed: {}; retrying in {}ms",
                        attempt,
                        attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

pub fn classify_status(status: StatusCode) -> ServiceErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceErrorKind::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS => ServiceErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ServiceErrorKind::Timeout,
        _ => ServiceErrorKind::Unavailable,
    }
}

fn classify_transport(error: &reqwest::Error) -> ServiceErrorKind {
    if error.is_timeout() {
        ServiceErrorKind::Timeout
    } else if let Some(status) = error.status() {
        classify_status(status)
    } else {
        ServiceErrorKind::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn test_config(server: &MockServer) -> RemoteSummarizerConfig {
        RemoteSummarizerConfig {
            endpoint: server.url("/v1/chat/completions"),
            retry_attempts: 3,
            retry_delay_ms: 0,
            timeout_seconds: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summarize_success() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .body_contains("gpt-3.5-turbo")
                .body_contains("confession post: Lifts are slow.");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "  Complaint about slow lifts. "}}]
                }));
        });

        let summarizer =
            RemoteSummarizer::new(test_config(&server), Some("test-key".to_string())).unwrap();
        let summary = summarizer.summarize("Lifts are slow.").await.unwrap();

        api_mock.assert();
        assert_eq!(summary, "Complaint about slow lifts.");
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401);
        });

        let summarizer =
            RemoteSummarizer::new(test_config(&server), Some("bad-key".to_string())).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();

        api_mock.assert_hits(1);
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Unauthorized));
    }

    #[tokio::test]
    async fn test_rate_limited_is_retried_then_fails() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429);
        });

        let summarizer =
            RemoteSummarizer::new(test_config(&server), Some("key".to_string())).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();

        api_mock.assert_hits(3);
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::RateLimited));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(503);
        });

        let summarizer =
            RemoteSummarizer::new(test_config(&server), Some("key".to_string())).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Unavailable));
    }

    #[tokio::test]
    async fn test_empty_choices_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let config = RemoteSummarizerConfig {
            retry_attempts: 1,
            ..test_config(&server)
        };
        let summarizer = RemoteSummarizer::new(config, Some("key".to_string())).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Unavailable));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_millis(2500))
                .json_body(serde_json::json!({"choices": []}));
        });

        let config = RemoteSummarizerConfig {
            timeout_seconds: 1,
            retry_attempts: 1,
            ..test_config(&server)
        };
        let summarizer = RemoteSummarizer::new(config, Some("key".to_string())).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Timeout));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200);
        });

        let summarizer = RemoteSummarizer::new(test_config(&server), None).unwrap();
        let err = summarizer.summarize("text").await.unwrap_err();

        api_mock.assert_hits(0);
        assert_eq!(err.service_kind(), Some(ServiceErrorKind::Unauthorized));
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::FORBIDDEN), ServiceErrorKind::Unauthorized);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS), ServiceErrorKind::RateLimited);
        assert_eq!(classify_status(StatusCode::GATEWAY_TIMEOUT), ServiceErrorKind::Timeout);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY), ServiceErrorKind::Unavailable);
    }
}
