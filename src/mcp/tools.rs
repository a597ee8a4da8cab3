//! MCP tool definitions for the AI assistant

use serde_json::{json, Value};

use super::protocol::ToolDefinition;
use crate::config::Config;
use crate::prompts::ToolKind;

/// Schema properties describing each tool's main and optional inputs
fn input_properties(kind: ToolKind) -> Vec<(&'static str, &'static str, bool)> {
    // (argument, description, required)
    match kind {
        ToolKind::Pair => vec![("prompt", "Your question or topic to discuss", true)],
        ToolKind::Review => vec![
            ("code", "Code to review", true),
            ("context", "Additional context about the code", false),
        ],
        ToolKind::Brainstorm => vec![
            ("topic", "Topic to brainstorm about", true),
            ("constraints", "Any constraints or requirements", false),
        ],
        ToolKind::ReviewPerformance => vec![
            ("code", "Code to analyze for performance", true),
            ("context", "Context about expected usage patterns", false),
        ],
        ToolKind::ReviewSecurity => vec![
            ("code", "Code to analyze for security issues", true),
            ("context", "Security context or requirements", false),
        ],
    }
}

/// JSON schema for one tool's arguments
pub fn input_schema(kind: ToolKind, config: &Config) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for (name, description, is_required) in input_properties(kind) {
        let mut property = json!({"type": "string", "description": description});
        if is_required {
            required.push(name);
        } else {
            property["default"] = json!("");
        }
        properties.insert(name.to_string(), property);
    }

    properties.insert(
        "model".to_string(),
        json!({
            "type": "string",
            "description": format!("Model to use: {}", config.available_models()),
            "default": config.default_model,
        }),
    );

    if kind.accepts_temperature() {
        properties.insert(
            "temperature".to_string(),
            json!({
                "type": "number",
                "description": "Response creativity (0.0-1.0)",
                "default": kind.default_temperature(),
            }),
        );
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Get all tool definitions for the configured models
pub fn get_tool_definitions(config: &Config) -> Vec<ToolDefinition> {
    ToolKind::ALL
        .iter()
        .map(|kind| ToolDefinition {
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            input_schema: input_schema(*kind, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_tools_in_order() {
        let names: Vec<String> = get_tool_definitions(&Config::default())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "pair",
                "review",
                "brainstorm",
                "review_performance",
                "review_security"
            ]
        );
    }

    #[test]
    fn test_schema_required_fields() {
        let config = Config::default();
        for kind in ToolKind::ALL {
            let schema = input_schema(kind, &config);
            assert_eq!(schema["type"], json!("object"));
            assert_eq!(schema["required"], json!([kind.required_argument()]));
            if let Some(ctx) = kind.context_argument() {
                assert_eq!(schema["properties"][ctx]["default"], json!(""));
            }
        }
    }

    #[test]
    fn test_model_property_reflects_config() {
        let mut config = Config::default();
        config.default_model = "Claude".to_string();
        let schema = input_schema(ToolKind::Review, &config);
        let model = &schema["properties"]["model"];
        assert_eq!(model["default"], json!("Claude"));
        assert_eq!(
            model["description"],
            json!("Model to use: Claude, DeepSeek, GPT, Gemini, Grok")
        );
    }

    #[test]
    fn test_only_pair_takes_temperature() {
        let config = Config::default();
        let pair = input_schema(ToolKind::Pair, &config);
        assert_eq!(pair["properties"]["temperature"]["default"], json!(0.5));

        let review = input_schema(ToolKind::Review, &config);
        assert!(review["properties"].get("temperature").is_none());
    }
}
