//! Property-based tests for the AI assistant
//!
//! These tests verify invariants that must hold for all inputs:
//! - Prompt rendering never panics and never drops the caller's input
//! - Model lookup ignores case
//! - Temperatures sent upstream stay in range
//! - The stdio loop answers every non-empty line that is not a request
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;

// ============================================================================
// PROMPT RENDERING TESTS
// ============================================================================

mod prompt_tests {
    use super::*;
    use ai_assistant::prompts::{render, ToolArguments, ToolKind};

    fn any_tool() -> impl Strategy<Value = ToolKind> {
        prop::sample::select(ToolKind::ALL.to_vec())
    }

    fn arguments(kind: ToolKind, input: &str, context: &str) -> ToolArguments {
        let input = Some(input.to_string());
        let context = Some(context.to_string());
        match kind {
            ToolKind::Pair => ToolArguments {
                prompt: input,
                ..Default::default()
            },
            ToolKind::Brainstorm => ToolArguments {
                topic: input,
                constraints: context,
                ..Default::default()
            },
            _ => ToolArguments {
                code: input,
                context,
                ..Default::default()
            },
        }
    }

    proptest! {
        /// Invariant: render never panics on any input
        #[test]
        fn never_panics(kind in any_tool(), input in "\\PC*", context in "\\PC*") {
            let _ = render(kind, &arguments(kind, &input, &context));
        }

        /// Invariant: non-blank input always renders and appears verbatim
        #[test]
        fn input_preserved(kind in any_tool(), input in "[a-zA-Z0-9(){};=+ ]{0,40}[a-z]", context in "[a-z ]{0,30}") {
            let prompt = render(kind, &arguments(kind, &input, &context)).unwrap();
            prop_assert!(prompt.contains(&input));
        }

        /// Invariant: code tools wrap the code in a fenced block
        #[test]
        fn code_is_fenced(input in "[a-z_]{1,20}\\([a-z, ]{0,20}\\)") {
            for kind in [ToolKind::Review, ToolKind::ReviewPerformance, ToolKind::ReviewSecurity] {
                let prompt = render(kind, &arguments(kind, &input, "")).unwrap();
                let fenced = format!("```\n{}\n```", input);
                prop_assert!(prompt.contains(&fenced));
            }
        }

        /// Invariant: blank input is always rejected
        #[test]
        fn blank_input_rejected(kind in any_tool(), input in "[ \\t\\n]*") {
            prop_assert!(render(kind, &arguments(kind, &input, "")).is_err());
        }
    }
}

// ============================================================================
// MODEL RESOLUTION TESTS
// ============================================================================

mod model_tests {
    use super::*;
    use ai_assistant::Config;

    proptest! {
        /// Invariant: any casing of a configured name resolves to that name
        #[test]
        fn case_insensitive(index in 0usize..5, flips in prop::collection::vec(any::<bool>(), 8)) {
            let config = Config::default();
            let name = config.models.keys().nth(index).unwrap().clone();
            let variant: String = name
                .chars()
                .zip(flips.iter().cycle())
                .map(|(c, flip)| if *flip { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
                .collect();

            let (resolved, _) = config.resolve_model(&variant).unwrap();
            prop_assert_eq!(resolved, name.as_str());
        }

        /// Invariant: unknown names fail and list what is available
        #[test]
        fn unknown_names_fail(name in "[a-z]{12,20}") {
            let config = Config::default();
            let err = config.resolve_model(&name).unwrap_err();
            prop_assert!(err.to_string().contains("Available models"));
        }
    }
}

// ============================================================================
// REQUEST BUILDING TESTS
// ============================================================================

mod request_tests {
    use super::*;
    use ai_assistant::config::MAX_TEMPERATURE;
    use ai_assistant::handler::build_request;
    use ai_assistant::prompts::{ToolArguments, ToolKind};
    use ai_assistant::Config;

    proptest! {
        /// Invariant: accepted pair temperatures are forwarded unchanged, others rejected
        #[test]
        fn pair_temperature_bounds(temperature in -5.0f64..5.0) {
            let config = Config::default();
            let args = ToolArguments {
                prompt: Some("hello".to_string()),
                temperature: Some(temperature),
                ..Default::default()
            };

            match build_request(&config, ToolKind::Pair, &args) {
                Ok(request) => {
                    prop_assert!((0.0..=MAX_TEMPERATURE).contains(&temperature));
                    prop_assert_eq!(request.temperature, temperature);
                }
                Err(_) => prop_assert!(!(0.0..=MAX_TEMPERATURE).contains(&temperature)),
            }
        }

        /// Invariant: templated tools ignore caller temperature
        #[test]
        fn templated_temperature_fixed(temperature in -5.0f64..5.0) {
            let config = Config::default();
            let args = ToolArguments {
                code: Some("x = 1".to_string()),
                temperature: Some(temperature),
                ..Default::default()
            };

            let request = build_request(&config, ToolKind::Review, &args).unwrap();
            prop_assert_eq!(request.temperature, ToolKind::Review.default_temperature());
        }
    }
}

// ============================================================================
// STDIO FRAMING TESTS
// ============================================================================

mod framing_tests {
    use super::*;
    use ai_assistant::mcp::{McpHandler, McpRequest, McpResponse, McpServer};
    use serde_json::json;

    struct Pong;

    impl McpHandler for Pong {
        fn handle_request(&self, request: McpRequest) -> McpResponse {
            McpResponse::success(request.id, json!({}))
        }
    }

    proptest! {
        /// Invariant: every non-empty line that is not a request gets exactly one error
        #[test]
        fn garbage_gets_error(line in "[^\\n\\r{]{1,80}") {
            prop_assume!(!line.trim().is_empty());
            let server = McpServer::new(Pong);
            let mut output = Vec::new();
            server.run_with(format!("{}\n", line).as_bytes(), &mut output).unwrap();

            let text = String::from_utf8(output).unwrap();
            let responses: Vec<serde_json::Value> =
                text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
            prop_assert_eq!(responses.len(), 1);
            // Valid JSON that is not a request object is an invalid request
            let expected = if serde_json::from_str::<serde_json::Value>(&line).is_ok() {
                -32600
            } else {
                -32700
            };
            prop_assert_eq!(&responses[0]["error"]["code"], &json!(expected));
        }
    }
}
