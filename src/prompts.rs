//! Tool kinds and the prompt templates they render

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AssistantError, Result};

/// Temperature used by `pair` when neither caller nor model config sets one
pub const PAIR_DEFAULT_TEMPERATURE: f64 = 0.5;

/// The five tools exposed to the host assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Pair,
    Review,
    Brainstorm,
    ReviewPerformance,
    ReviewSecurity,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Pair,
        ToolKind::Review,
        ToolKind::Brainstorm,
        ToolKind::ReviewPerformance,
        ToolKind::ReviewSecurity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pair => "pair",
            ToolKind::Review => "review",
            ToolKind::Brainstorm => "brainstorm",
            ToolKind::ReviewPerformance => "review_performance",
            ToolKind::ReviewSecurity => "review_security",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::Pair => "Collaborate with AI on any topic - ask questions, brainstorm ideas, or work through problems together",
            ToolKind::Review => "Get comprehensive code review with actionable feedback",
            ToolKind::Brainstorm => "Brainstorm creative solutions and explore ideas",
            ToolKind::ReviewPerformance => {
                "Analyze code for performance issues and optimization opportunities"
            }
            ToolKind::ReviewSecurity => "Security-focused code review to identify vulnerabilities",
        }
    }

    /// Argument that carries the main input for this tool
    pub fn required_argument(&self) -> &'static str {
        match self {
            ToolKind::Pair => "prompt",
            ToolKind::Brainstorm => "topic",
            ToolKind::Review | ToolKind::ReviewPerformance | ToolKind::ReviewSecurity => "code",
        }
    }

    /// Name of the optional free-text argument, if the tool has one
    pub fn context_argument(&self) -> Option<&'static str> {
        match self {
            ToolKind::Pair => None,
            ToolKind::Brainstorm => Some("constraints"),
            ToolKind::Review | ToolKind::ReviewPerformance | ToolKind::ReviewSecurity => {
                Some("context")
            }
        }
    }

    /// Sampling temperature for the templated tools.
    ///
    /// `pair` is the only tool where the caller controls temperature; the
    /// value here is its fallback.
    pub fn default_temperature(&self) -> f64 {
        match self {
            ToolKind::Pair => PAIR_DEFAULT_TEMPERATURE,
            ToolKind::Review => 0.3,
            ToolKind::Brainstorm => 0.7,
            ToolKind::ReviewPerformance => 0.3,
            ToolKind::ReviewSecurity => 0.2,
        }
    }

    pub fn accepts_temperature(&self) -> bool {
        matches!(self, ToolKind::Pair)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments of a `tools/call` request, shared by all five tools
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolArguments {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl ToolArguments {
    /// Parse the MCP `arguments` object. `null` is treated as no arguments.
    pub fn from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
            .map_err(|e| AssistantError::InvalidInput(format!("Invalid arguments: {}", e)))
    }

    /// Main input for `kind`, rejecting missing or blank values
    pub fn required(&self, kind: ToolKind) -> Result<&str> {
        let value = match kind {
            ToolKind::Pair => self.prompt.as_deref(),
            ToolKind::Brainstorm => self.topic.as_deref(),
            ToolKind::Review | ToolKind::ReviewPerformance | ToolKind::ReviewSecurity => {
                self.code.as_deref()
            }
        };

        match value {
            Some(v) if !v.trim().is_empty() => Ok(v),
            Some(_) => Err(AssistantError::InvalidInput(format!(
                "Argument '{}' must not be empty",
                kind.required_argument()
            ))),
            None => Err(AssistantError::InvalidInput(format!(
                "Missing required argument: {}",
                kind.required_argument()
            ))),
        }
    }

    /// Optional free-text argument for `kind`, passed through untouched.
    ///
    /// Empty when absent or blank, so the template picks its fallback text.
    pub fn optional_context(&self, kind: ToolKind) -> &str {
        let value = match kind {
            ToolKind::Pair => None,
            ToolKind::Brainstorm => self.constraints.as_deref(),
            ToolKind::Review | ToolKind::ReviewPerformance | ToolKind::ReviewSecurity => {
                self.context.as_deref()
            }
        };
        value.filter(|v| !v.trim().is_empty()).unwrap_or_default()
    }
}

/// Render the prompt sent upstream for a tool call
pub fn render(kind: ToolKind, args: &ToolArguments) -> Result<String> {
    let input = args.required(kind)?;
    let context = args.optional_context(kind);

    let prompt = match kind {
        ToolKind::Pair => input.to_string(),
        ToolKind::Review => review_prompt(input, context),
        ToolKind::Brainstorm => brainstorm_prompt(input, context),
        ToolKind::ReviewPerformance => performance_prompt(input, context),
        ToolKind::ReviewSecurity => security_prompt(input, context),
    };

    Ok(prompt)
}

fn or_default<'a>(context: &'a str, fallback: &'a str) -> &'a str {
    if context.is_empty() {
        fallback
    } else {
        context
    }
}

fn review_prompt(code: &str, context: &str) -> String {
    format!(
        "Please provide a comprehensive code review for the following code.\n\n\
         Context: {context}\n\n\
         Code to review:\n\
         ```\n\
         {code}\n\
         ```\n\n\
         Please analyze:\n\
         1. Code quality and readability\n\
         2. Potential bugs or issues\n\
         3. Performance considerations\n\
         4. Security concerns\n\
         5. Best practices and improvements\n\
         6. Overall architecture and design\n\n\
         Provide specific, actionable feedback with examples where appropriate.",
        context = or_default(context, "No additional context provided"),
        code = code,
    )
}

fn brainstorm_prompt(topic: &str, constraints: &str) -> String {
    let constraints_line = if constraints.is_empty() {
        String::new()
    } else {
        format!("Constraints/Requirements: {}", constraints)
    };

    format!(
        "Let's brainstorm creative ideas and solutions for: {topic}\n\n\
         {constraints_line}\n\n\
         Please provide:\n\
         1. Multiple creative approaches or solutions\n\
         2. Pros and cons of each approach\n\
         3. Unconventional or innovative ideas\n\
         4. Practical implementation considerations\n\
         5. Potential challenges and how to address them\n\n\
         Be creative and think outside the box!",
    )
}

fn performance_prompt(code: &str, context: &str) -> String {
    format!(
        "Please analyze the following code for performance issues and optimization opportunities.\n\n\
         Usage context: {context}\n\n\
         Code to analyze:\n\
         ```\n\
         {code}\n\
         ```\n\n\
         Please identify:\n\
         1. Performance bottlenecks\n\
         2. Time complexity analysis\n\
         3. Space complexity concerns\n\
         4. Optimization opportunities\n\
         5. Caching strategies\n\
         6. Algorithm improvements\n\
         7. Resource usage concerns\n\n\
         Provide specific recommendations with code examples where applicable.",
        context = or_default(context, "General purpose usage"),
        code = code,
    )
}

fn security_prompt(code: &str, context: &str) -> String {
    format!(
        "Please perform a security-focused review of the following code.\n\n\
         Security context: {context}\n\n\
         Code to analyze:\n\
         ```\n\
         {code}\n\
         ```\n\n\
         Please identify:\n\
         1. Security vulnerabilities (injection, XSS, etc.)\n\
         2. Authentication/authorization issues\n\
         3. Data validation concerns\n\
         4. Cryptographic weaknesses\n\
         5. Information disclosure risks\n\
         6. OWASP Top 10 considerations\n\
         7. Security best practices violations\n\n\
         Provide specific vulnerabilities with severity levels and remediation recommendations.",
        context = or_default(context, "Standard security requirements"),
        code = code,
    )
}
