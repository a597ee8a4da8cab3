//! Server configuration: friendly model names and OpenRouter settings
//!
//! The configuration lives in a JSON file next to the server binary
//! (`~/.claude-mcp-servers/ai-assistant/config.json` by default):
//!
//! ```json
//! {
//!   "api_key_env": "OPENROUTER_API_KEY",
//!   "default_model": "Gemini",
//!   "models": {
//!     "Gemini": {"model_id": "google/gemini-2.5-pro", "max_tokens": 8192, "supports_images": true}
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AssistantError, Result};

/// OpenRouter chat completions endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Environment variable holding the OpenRouter key unless overridden
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Friendly name used when a tool call does not pick a model
pub const DEFAULT_MODEL: &str = "Gemini";

/// Upper bound accepted for any sampling temperature
pub const MAX_TEMPERATURE: f64 = 2.0;

/// A single upstream model reachable through OpenRouter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// OpenRouter model identifier, e.g. "anthropic/claude-sonnet-4"
    pub model_id: String,
    /// Completion token limit sent with every request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature used by `pair` when the caller does not pass one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub supports_images: bool,
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl ModelConfig {
    pub fn new(model_id: impl Into<String>, max_tokens: u32, supports_images: bool) -> Self {
        Self {
            model_id: model_id.into(),
            max_tokens,
            temperature: None,
            supports_images,
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the environment variable that holds the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Chat completions URL of the unified API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Friendly model name -> upstream model
    #[serde(default)]
    pub models: BTreeMap<String, ModelConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let mut models = BTreeMap::new();
        models.insert(
            "Gemini".to_string(),
            ModelConfig::new("google/gemini-2.5-pro", 8192, true),
        );
        models.insert(
            "Claude".to_string(),
            ModelConfig::new("anthropic/claude-sonnet-4", 8192, true),
        );
        models.insert("GPT".to_string(), ModelConfig::new("openai/gpt-4o", 4096, true));
        models.insert(
            "DeepSeek".to_string(),
            ModelConfig::new("deepseek/deepseek-chat", 4096, false),
        );
        models.insert("Grok".to_string(), ModelConfig::new("x-ai/grok-3", 4096, false));

        Self {
            api_key_env: default_api_key_env(),
            default_model: default_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            models,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Load configuration, falling back to the built-in models when the file
    /// does not exist. A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(
                "Config file {} not found, using built-in model list",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| AssistantError::Config(format!("Invalid config JSON: {}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration for values that would only fail at call time
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(AssistantError::Config(
                "At least one model must be configured".to_string(),
            ));
        }

        if !self.models.contains_key(&self.default_model) {
            return Err(AssistantError::Config(format!(
                "Default model '{}' is not configured. Available models: {}",
                self.default_model,
                self.available_models()
            )));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(AssistantError::Config(
                "api_key_env must name an environment variable".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AssistantError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        for (name, model) in &self.models {
            if model.model_id.trim().is_empty() {
                return Err(AssistantError::Config(format!(
                    "Model '{}' has an empty model_id",
                    name
                )));
            }
            if model.max_tokens == 0 {
                return Err(AssistantError::Config(format!(
                    "Model '{}' must allow at least one token",
                    name
                )));
            }
            if let Some(t) = model.temperature {
                if !(0.0..=MAX_TEMPERATURE).contains(&t) {
                    return Err(AssistantError::Config(format!(
                        "Model '{}' temperature {} is outside 0.0-{}",
                        name, t, MAX_TEMPERATURE
                    )));
                }
            }
        }

        Ok(())
    }

    /// Comma-separated list of friendly model names
    pub fn available_models(&self) -> String {
        self.models.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
    }

    /// Look up a model by friendly name.
    ///
    /// Exact match wins; otherwise names are compared ignoring ASCII case so
    /// "gemini" and "GEMINI" both reach "Gemini".
    pub fn resolve_model(&self, name: &str) -> Result<(&str, &ModelConfig)> {
        let name = name.trim();
        if let Some((key, model)) = self.models.get_key_value(name) {
            return Ok((key.as_str(), model));
        }

        self.models
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, model)| (key.as_str(), model))
            .ok_or_else(|| AssistantError::UnknownModel {
                requested: name.to_string(),
                available: self.available_models(),
            })
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(AssistantError::Config(format!(
                "OpenRouter API key not found. Please set the {} environment variable",
                self.api_key_env
            ))),
        }
    }
}
