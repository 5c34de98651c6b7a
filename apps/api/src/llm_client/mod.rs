//! LLM Client: the single point of entry for chat-completion calls.
//!
//! Talks to the OpenRouter chat completions endpoint. The API key is injected at
//! construction; nothing in here reads files or the environment.
//!
//! No retries: a failed call is reported once and the caller decides how to render it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Lets OpenRouter pick the model when the caller does not name one.
pub const DEFAULT_MODEL: &str = "openrouter/auto";
const MAX_TOKENS: u32 = 256;
const TEMPERATURE: f32 = 0.2;

/// Why a completion produced no answer text.
/// The display strings double as the text shown to chat users.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OpenRouter API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("No answer from OpenRouter API.")]
    NoChoices,

    #[error("OpenRouter API call failed: {source}\nRaw response: {raw}")]
    Malformed {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("OpenRouter API call failed: {message}\nRaw response: {raw}")]
    Transport { message: String, raw: String },
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Only the first choice is ever inspected, so choices stay untyped until then.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Anything that can answer a system + user prompt pair.
/// `AppState` carries an `Arc<dyn Completer>` so handlers can be driven by a stub.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn ask(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, CompletionError>;
}

/// OpenRouter chat-completions client.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenRouterClient {
    /// `timeout` of `None` keeps the transport default.
    pub fn new(
        api_key: String,
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Completer for OpenRouterClient {
    async fn ask(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, CompletionError> {
        let request_body = ChatCompletionRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport {
                message: e.to_string(),
                raw: String::new(),
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| CompletionError::Transport {
                message: e.to_string(),
                raw: String::new(),
            })?;

        if !status.is_success() {
            warn!("OpenRouter returned {}: {}", status, raw);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: raw,
            });
        }

        parse_completion(&raw)
    }
}

/// Extracts the first choice's message text from a chat-completions body.
///
/// - invalid JSON or a first choice without `message` → `Malformed`
/// - no `choices`, an empty list, or a message without string content → `NoChoices`
pub fn parse_completion(raw: &str) -> Result<String, CompletionError> {
    let malformed = |source: serde_json::Error| CompletionError::Malformed {
        source,
        raw: raw.to_string(),
    };

    let response: ChatCompletionResponse = serde_json::from_str(raw).map_err(malformed)?;

    if let Some(usage) = &response.usage {
        debug!(
            "Completion succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let Some(first) = response
        .choices
        .and_then(|choices| choices.into_iter().next())
    else {
        return Err(CompletionError::NoChoices);
    };

    let choice: Choice = serde_json::from_value(first).map_err(malformed)?;
    choice.message.content.ok_or(CompletionError::NoChoices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/v1/chat/completions")
    }

    fn client(endpoint: String) -> OpenRouterClient {
        OpenRouterClient::new("sk-or-test".to_string(), endpoint, None).unwrap()
    }

    #[test]
    fn test_parse_completion_success() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"Jane Doe"}}],
                      "usage":{"prompt_tokens":10,"completion_tokens":2}}"#;
        assert_eq!(parse_completion(raw).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_parse_completion_partial_usage() {
        let raw = r#"{"choices":[{"message":{"content":"Jane Doe"}}],"usage":{"total_tokens":12}}"#;
        assert_eq!(parse_completion(raw).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_parse_completion_ignores_later_choices() {
        let raw = r#"{"choices":[{"message":{"content":"Jane Doe"}},{"delta":{}}]}"#;
        assert_eq!(parse_completion(raw).unwrap(), "Jane Doe");
    }

    #[test]
    fn test_parse_completion_no_choices() {
        for raw in [
            r#"{}"#,
            r#"{"choices":[]}"#,
            r#"{"choices":null}"#,
            r#"{"choices":[{"message":{"role":"assistant"}}]}"#,
        ] {
            assert!(
                matches!(parse_completion(raw), Err(CompletionError::NoChoices)),
                "expected NoChoices for {raw}"
            );
        }
    }

    #[test]
    fn test_parse_completion_malformed() {
        let err = parse_completion("{not json").unwrap_err();
        assert!(matches!(err, CompletionError::Malformed { .. }));

        let err = parse_completion(r#"{"choices":[{"text":"legacy shape"}]}"#).unwrap_err();
        assert!(matches!(err, CompletionError::Malformed { .. }));
    }

    #[test]
    fn test_error_text() {
        let err = CompletionError::Api {
            status: 401,
            body: "{\"error\":\"bad key\"}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "OpenRouter API error: 401 - {\"error\":\"bad key\"}"
        );
        assert_eq!(
            CompletionError::NoChoices.to_string(),
            "No answer from OpenRouter API."
        );
    }

    #[tokio::test]
    async fn test_ask_sends_chat_request() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let echo = format!(
                    "{}|{}|{}|{}|{}|{}",
                    body["model"].as_str().unwrap_or_default(),
                    body["max_tokens"],
                    body["temperature"],
                    body["messages"][0]["role"].as_str().unwrap_or_default(),
                    body["messages"][1]["content"].as_str().unwrap_or_default(),
                    auth
                );
                Json(json!({ "choices": [{ "message": { "content": echo } }] }))
            }),
        );
        let endpoint = spawn_upstream(app).await;

        let answer = client(endpoint)
            .ask("openrouter/auto", "system rules", "What is his name?")
            .await
            .unwrap();

        assert_eq!(
            answer,
            "openrouter/auto|256|0.2|system|What is his name?|Bearer sk-or-test"
        );
    }

    #[tokio::test]
    async fn test_ask_non_success_status() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream exploded") }),
        );
        let endpoint = spawn_upstream(app).await;

        let err = client(endpoint)
            .ask(DEFAULT_MODEL, "system", "user")
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(matches!(err, CompletionError::Api { status: 502, .. }));
        assert!(text.contains("502"));
        assert!(text.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_ask_malformed_body() {
        let app = Router::new().route(
            "/api/v1/chat/completions",
            post(|| async { (StatusCode::OK, "{\"choices\": [") }),
        );
        let endpoint = spawn_upstream(app).await;

        let err = client(endpoint)
            .ask(DEFAULT_MODEL, "system", "user")
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(text.starts_with("OpenRouter API call failed: EOF while parsing"));
        assert!(text.ends_with("Raw response: {\"choices\": ["));
    }

    #[tokio::test]
    async fn test_ask_unreachable_upstream() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{addr}/api/v1/chat/completions"))
            .ask(DEFAULT_MODEL, "system", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Transport { .. }));
    }
}
