//! Model gateway: chat-completion calls behind a uniform absent-on-failure
//! contract.
//!
//! [`ChatBackend`] is the transport seam; [`OpenAiCompatBackend`] talks to
//! any OpenAI-compatible `/chat/completions` endpoint. Strategies never see a
//! backend directly. They go through [`GatewayClient`], which enforces the
//! request timeout, counts calls and turns every failure into `None`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GatewaySettings;
use crate::errors::GatewayError;

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion request as handed to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Content of the first message with `role`, if any.
    pub fn content_of(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

/// Transport for chat completions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Run one completion and return the generated text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError>;
}

// ── OpenAI-compatible backend ───────────────────────────────────────

/// `POST {base_url}/chat/completions` with bearer auth.
pub struct OpenAiCompatBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatBackend {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        });

        let mut builder = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let resp_json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        parse_completion(&resp_json)
    }
}

/// Pull `choices[0].message.content` out of a completion body.
///
/// A present message with `null` content yields an empty string, which the
/// client reports as an absent result.
fn parse_completion(resp_json: &serde_json::Value) -> Result<String, GatewayError> {
    let message = resp_json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| {
            GatewayError::MalformedResponse("missing choices[0].message".to_string())
        })?;

    Ok(message["content"].as_str().unwrap_or("").to_string())
}

// ── Client ──────────────────────────────────────────────────────────

/// Counting, failure-absorbing wrapper around a [`ChatBackend`].
///
/// `api_calls` counts successful completions only. Failures and timeouts go
/// to `failed_calls`; their sum is the true request volume. Both
/// counters live for the client's lifetime and are never reset.
pub struct GatewayClient {
    backend: Arc<dyn ChatBackend>,
    timeout: Duration,
    api_calls: AtomicU64,
    failed_calls: AtomicU64,
}

impl GatewayClient {
    pub fn new(backend: Arc<dyn ChatBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            api_calls: AtomicU64::new(0),
            failed_calls: AtomicU64::new(0),
        }
    }

    /// Build a client for an OpenAI-compatible endpoint.
    pub fn from_settings(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let backend = OpenAiCompatBackend::new(settings)?;
        Ok(Self::new(
            Arc::new(backend),
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    /// Issue one chat completion. Returns `None` on any failure, timeout or
    /// empty response; never retries.
    pub async fn call(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Option<String> {
        let request = ChatRequest {
            messages,
            temperature,
            max_tokens,
        };

        let start = Instant::now();
        let outcome = match tokio::time::timeout(self.timeout, self.backend.complete(&request)).await
        {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(text) => {
                self.api_calls.fetch_add(1, Ordering::Relaxed);
                debug!(
                    max_tokens,
                    chars = text.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Model call succeeded"
                );
                if text.is_empty() {
                    warn!("Model returned empty content");
                    None
                } else {
                    Some(text)
                }
            }
            Err(e) => {
                self.failed_calls.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Model call failed");
                None
            }
        }
    }

    /// Successful calls so far.
    pub fn api_calls(&self) -> u64 {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed_calls.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(mock: MockChatBackend) -> GatewayClient {
        GatewayClient::new(Arc::new(mock), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_success_counts_call() {
        let mut mock = MockChatBackend::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Ok("FINAL_ANSWER: 3".to_string()));
        let client = client_with(mock);

        let reply = client.call(vec![Message::user("q")], 0.3, 500).await;
        assert_eq!(reply.as_deref(), Some("FINAL_ANSWER: 3"));
        assert_eq!(client.api_calls(), 1);
        assert_eq!(client.failed_calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_absent_and_not_counted() {
        let mut mock = MockChatBackend::new();
        mock.expect_complete()
            .returning(|_| Err(GatewayError::RequestFailed("connection refused".into())));
        let client = client_with(mock);

        assert_eq!(client.call(vec![Message::user("q")], 0.3, 500).await, None);
        assert_eq!(client.api_calls(), 0);
        assert_eq!(client.failed_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_content_counts_but_is_absent() {
        let mut mock = MockChatBackend::new();
        mock.expect_complete().returning(|_| Ok(String::new()));
        let client = client_with(mock);

        assert_eq!(client.call(vec![Message::user("q")], 0.3, 500).await, None);
        assert_eq!(client.api_calls(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_sampling_parameters() {
        let mut mock = MockChatBackend::new();
        mock.expect_complete()
            .withf(|req| {
                req.temperature == 0.1
                    && req.max_tokens == 50
                    && req.content_of(Role::System) == Some("sys")
                    && req.content_of(Role::User) == Some("usr")
            })
            .times(1)
            .returning(|_| Ok("ok".to_string()));
        let client = client_with(mock);

        let reply = client
            .call(vec![Message::system("sys"), Message::user("usr")], 0.1, 50)
            .await;
        assert_eq!(reply.as_deref(), Some("ok"));
    }

    struct StalledBackend;

    #[async_trait]
    impl ChatBackend for StalledBackend {
        async fn complete(&self, _request: &ChatRequest) -> Result<String, GatewayError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_a_failure() {
        let client = GatewayClient::new(Arc::new(StalledBackend), Duration::from_secs(30));
        assert_eq!(client.call(vec![Message::user("q")], 0.3, 500).await, None);
        assert_eq!(client.api_calls(), 0);
        assert_eq!(client.failed_calls(), 1);
    }

    #[test]
    fn test_parse_completion() {
        let body = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "FINAL_ANSWER: 1"}}]
        });
        assert_eq!(parse_completion(&body).unwrap(), "FINAL_ANSWER: 1");

        let null_content = serde_json::json!({"choices": [{"message": {"content": null}}]});
        assert_eq!(parse_completion(&null_content).unwrap(), "");

        let no_choices = serde_json::json!({"error": "boom"});
        assert!(matches!(
            parse_completion(&no_choices),
            Err(GatewayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::system("hi")).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hi");
    }
}
