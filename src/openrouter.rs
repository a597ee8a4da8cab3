//! OpenRouter chat completions client
//!
//! Every configured model is reached through the same OpenAI-compatible
//! endpoint, so there is exactly one HTTP client and one request shape.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::{AssistantError, Result};

/// OpenRouter uses this to attribute traffic to the app
const REFERER: &str = "https://github.com/claude-mcp/ai-assistant";
const TITLE: &str = "AI Assistant MCP Server";

/// A single completion to run upstream
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// OpenRouter model identifier (not the friendly name)
    pub model_id: String,
    pub prompt: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Trait for completion backends
///
/// The MCP handler is synchronous, so the seam is too. `OpenRouterClient`
/// blocks on its own runtime; tests substitute canned backends.
pub trait Completion: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenRouter API client
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    rt: Arc<Runtime>,
}

impl OpenRouterClient {
    /// Create a client for `base_url` (the full chat completions URL)
    pub fn new(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let rt = Runtime::new().map_err(|e| {
            AssistantError::Internal(format!("Failed to create tokio runtime: {}", e))
        })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            rt: Arc::new(rt),
        })
    }

    /// Build a client from configuration, reading the key from the environment
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_key()?,
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat completion and return the first choice's text
    pub async fn complete_async(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &request.model_id,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            "OpenRouter request - Model: {}, Temperature: {}, Max tokens: {}",
            request.model_id,
            request.temperature,
            request.max_tokens
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter API error {}: {}", status, text);
            return Err(AssistantError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            AssistantError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        let content = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::InvalidResponse("Response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| {
                AssistantError::InvalidResponse("First choice has no message content".to_string())
            })?;

        tracing::debug!("OpenRouter response received - Length: {}", content.len());
        Ok(content)
    }
}

impl Completion for OpenRouterClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.rt.block_on(self.complete_async(request))
    }
}
