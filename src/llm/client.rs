use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, LlmResult};

const KEY_CHECK_MESSAGE: &str = "Hello, this is a test message.";

/// One buffered request/response exchange with a text-generation service.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> LlmResult<String>;
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

// OpenAI-compatible chat completions format (used by Groq)
#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
    stop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
struct KeyCheckRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Outcome of validating a credential against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCheck {
    Valid,
    Invalid,
    Missing,
}

fn user_message(content: &str) -> Vec<ChatMessage> {
    vec![ChatMessage {
        role: "user".to_string(),
        content: content.to_string(),
    }]
}

impl LlmClient {
    pub fn new(api_key: Option<&str>, base_url: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string),
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }

    /// Sends a 10-token probe with `api_key`. Any non-2xx answer counts as an
    /// invalid key; only transport failures are errors.
    pub async fn validate_key(&self, api_key: &str) -> LlmResult<KeyCheck> {
        if api_key.trim().is_empty() {
            return Ok(KeyCheck::Missing);
        }

        let request = KeyCheckRequest {
            model: self.model.clone(),
            messages: user_message(KEY_CHECK_MESSAGE),
            max_tokens: 10,
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", api_key.trim()))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, "key validation response");
        if status.is_success() {
            Ok(KeyCheck::Valid)
        } else {
            Ok(KeyCheck::Invalid)
        }
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: user_message(prompt),
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 1.0,
            stream: false,
            stop: None,
        };

        tracing::info!(model = %self.model, "requesting recommendation from LLM API");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::info!(%status, "LLM API response status");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status { status, body });
        }

        let body = response.text().await?;
        extract_content(&body)
    }
}

/// Pulls `choices[0].message.content` out of a response body.
fn extract_content(body: &str) -> LlmResult<String> {
    let api_response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::MalformedResponse(format!("Failed to parse LLM API response: {}", e)))?;

    api_response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LlmError::MalformedResponse("missing choices[0].message.content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_wire_contract() {
        let request = ChatCompletionRequest {
            model: "llama-3.1-8b-instant".into(),
            messages: user_message("hi"),
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 1.0,
            stream: false,
            stop: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "llama-3.1-8b-instant",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 1.0,
                "max_tokens": 1024,
                "top_p": 1.0,
                "stream": false,
                "stop": null
            })
        );
    }

    #[test]
    fn extracts_first_choice_verbatim() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "TITLE: Mushishi\nGENRE: Mystery"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        })
        .to_string();
        assert_eq!(extract_content(&body).unwrap(), "TITLE: Mushishi\nGENRE: Mystery");
    }

    #[test]
    fn missing_or_empty_content_is_malformed() {
        for body in [
            json!({}).to_string(),
            json!({"choices": []}).to_string(),
            json!({"choices": [{"message": {"content": null}}]}).to_string(),
            json!({"choices": [{"message": {"content": ""}}]}).to_string(),
            json!({"choices": [{}]}).to_string(),
            "not json".to_string(),
        ] {
            assert!(matches!(
                extract_content(&body),
                Err(LlmError::MalformedResponse(_))
            ));
        }
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        // Unroutable URL: reaching the network would be a transport error instead.
        let client = LlmClient::new(None, "http://127.0.0.1:1/v1/chat/completions", "m");
        let err = client.complete("prompt").await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let client = LlmClient::new(Some("key"), "http://127.0.0.1:1/v1/chat/completions", "m");
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Transport(_)));
        assert!(!err.is_config());
    }

    #[tokio::test]
    async fn blank_key_check_reports_missing() {
        let client = LlmClient::new(None, "http://127.0.0.1:1/v1/chat/completions", "m");
        assert_eq!(client.validate_key("   ").await.unwrap(), KeyCheck::Missing);
    }
}
