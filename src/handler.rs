//! MCP request handler: routes the five tools to the completion backend

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use crate::config::{Config, MAX_TEMPERATURE};
use crate::error::{AssistantError, Result};
use crate::mcp::{
    get_tool_definitions, methods, InitializeResult, McpHandler, McpRequest, McpResponse,
    ToolCallResult,
};
use crate::openrouter::{Completion, CompletionRequest};
use crate::prompts::{render, ToolArguments, ToolKind};

/// Turn a tool call into the request sent upstream, without sending it.
///
/// The model is the caller's choice or the configured default. Only `pair`
/// lets the caller set temperature (falling back to the model's configured
/// value, then 0.5); the templated tools always use their own.
pub fn build_request(
    config: &Config,
    kind: ToolKind,
    args: &ToolArguments,
) -> Result<CompletionRequest> {
    let requested = args
        .model
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(config.default_model.as_str());
    let (_, model) = config.resolve_model(requested)?;

    let temperature = if kind.accepts_temperature() {
        args.temperature
            .or(model.temperature)
            .unwrap_or_else(|| kind.default_temperature())
    } else {
        kind.default_temperature()
    };

    if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(AssistantError::InvalidInput(format!(
            "Temperature must be between 0.0 and {}, got {}",
            MAX_TEMPERATURE, temperature
        )));
    }

    Ok(CompletionRequest {
        model_id: model.model_id.clone(),
        prompt: render(kind, args)?,
        temperature,
        max_tokens: model.max_tokens,
    })
}

/// MCP request handler
pub struct AssistantHandler {
    config: Arc<Config>,
    backend: Arc<dyn Completion>,
}

impl AssistantHandler {
    pub fn new(config: Config, backend: Arc<dyn Completion>) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one tool and return the model's text
    pub fn call_tool(&self, name: &str, arguments: Value) -> Result<String> {
        let kind =
            ToolKind::from_name(name).ok_or_else(|| AssistantError::UnknownTool(name.to_string()))?;
        let args = ToolArguments::from_value(arguments)?;
        let model_name = args
            .model
            .clone()
            .unwrap_or_else(|| self.config.default_model.clone());

        tracing::info!("Tool called: {} with model: {}", kind, model_name);

        let request = build_request(&self.config, kind, &args)?;
        let started = Instant::now();
        let response = self.backend.complete(&request)?;

        tracing::info!(
            "Tool {} completed successfully using model {} ({} chars, {}ms)",
            kind,
            model_name,
            response.len(),
            started.elapsed().as_millis()
        );

        Ok(response)
    }

    fn handle_call(&self, params: &Value) -> Result<ToolCallResult> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AssistantError::InvalidInput("Missing tool name".to_string()))?;
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match self.call_tool(name, arguments) {
            Ok(text) => Ok(ToolCallResult::text(text)),
            Err(e) => {
                tracing::error!(
                    "Error in tool {}: {} (retryable: {})",
                    name,
                    e,
                    e.is_retryable()
                );
                Err(e)
            }
        }
    }
}

impl McpHandler for AssistantHandler {
    fn handle_request(&self, request: McpRequest) -> McpResponse {
        match request.method.as_str() {
            methods::INITIALIZE => {
                let result = InitializeResult::default();
                McpResponse::success(request.id, json!(result))
            }
            methods::INITIALIZED | methods::CANCELLED => {
                // Notification, no response needed
                McpResponse::success(request.id, json!({}))
            }
            methods::PING => McpResponse::success(request.id, json!({})),
            methods::LIST_TOOLS => {
                tracing::debug!("list_tools called");
                let tools = get_tool_definitions(&self.config);
                McpResponse::success(request.id, json!({"tools": tools}))
            }
            methods::CALL_TOOL => match self.handle_call(&request.params) {
                Ok(result) => McpResponse::success(request.id, json!(result)),
                Err(e) => McpResponse::from_error(request.id, e),
            },
            _ => McpResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }
}
