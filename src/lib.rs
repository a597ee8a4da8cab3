//! AI Assistant - MCP server for second opinions from other models
//!
//! Exposes `pair`, `review`, `brainstorm`, `review_performance` and
//! `review_security` as MCP tools. Each call is rendered into a prompt and
//! forwarded to a model picked by friendly name (Gemini, Claude, ...) through
//! OpenRouter's unified chat completions API.

pub mod config;
pub mod error;
pub mod handler;
pub mod install;
pub mod mcp;
pub mod openrouter;
pub mod prompts;

pub use config::{Config, ModelConfig};
pub use error::{AssistantError, Result};
pub use handler::AssistantHandler;
pub use openrouter::{Completion, CompletionRequest, OpenRouterClient};
pub use prompts::{ToolArguments, ToolKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
