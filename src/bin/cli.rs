//! AI Assistant CLI
//!
//! Command-line access to the same tools the MCP server exposes, plus setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

use ai_assistant::config::Config;
use ai_assistant::error::{AssistantError, Result};
use ai_assistant::handler::{build_request, AssistantHandler};
use ai_assistant::install::{self, InstallOptions};
use ai_assistant::mcp::get_tool_definitions;
use ai_assistant::openrouter::OpenRouterClient;
use ai_assistant::prompts::{ToolArguments, ToolKind};

#[derive(Parser)]
#[command(name = "ai-assistant")]
#[command(about = "Ask other models for pair programming help, reviews and ideas")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(
        long,
        env = "AI_ASSISTANT_CONFIG",
        default_value = "~/.claude-mcp-servers/ai-assistant/config.json"
    )]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured models
    Models,
    /// Print the MCP tool definitions as JSON
    Tools,
    /// Run one tool against a model
    Call {
        /// Tool name (pair, review, brainstorm, review_performance, review_security)
        tool: String,
        /// Prompt, code or topic; with --file, a path to read it from
        input: String,
        /// Treat INPUT as a file path
        #[arg(short, long)]
        file: bool,
        /// Friendly model name
        #[arg(short, long)]
        model: Option<String>,
        /// Context (reviews) or constraints (brainstorm)
        #[arg(short, long)]
        context: Option<String>,
        /// Temperature (pair only)
        #[arg(short, long)]
        temperature: Option<f64>,
        /// Print the rendered prompt instead of calling the model
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the config file and API key
    Validate,
    /// Install config, instructions and server binary for the host assistant
    Install {
        /// Server directory
        #[arg(long)]
        server_dir: Option<String>,
        /// Host instruction file to append to
        #[arg(long)]
        claude_md: Option<String>,
        /// Do not touch CLAUDE.md
        #[arg(long)]
        no_claude_md: bool,
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Build the MCP `arguments` object a host would send for this call
fn tool_arguments(
    kind: ToolKind,
    input: String,
    model: Option<String>,
    context: Option<String>,
    temperature: Option<f64>,
) -> Result<Value> {
    let mut args = Map::new();
    args.insert(kind.required_argument().to_string(), json!(input));

    if let Some(context) = context {
        let name = kind.context_argument().ok_or_else(|| {
            AssistantError::InvalidInput(format!("{} does not take --context", kind))
        })?;
        args.insert(name.to_string(), json!(context));
    }
    if let Some(model) = model {
        args.insert("model".to_string(), json!(model));
    }
    if let Some(temperature) = temperature {
        if !kind.accepts_temperature() {
            return Err(AssistantError::InvalidInput(format!(
                "{} uses a fixed temperature",
                kind
            )));
        }
        args.insert("temperature".to_string(), json!(temperature));
    }

    Ok(Value::Object(args))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = expand(&cli.config);

    match cli.command {
        Commands::Models => {
            let config = Config::load_or_default(&config_path)?;
            for (name, model) in &config.models {
                let marker = if *name == config.default_model { "*" } else { " " };
                println!(
                    "{} {:<10} {:<32} max_tokens={}{}",
                    marker,
                    name,
                    model.model_id,
                    model.max_tokens,
                    if model.supports_images { " images" } else { "" }
                );
            }
        }

        Commands::Tools => {
            let config = Config::load_or_default(&config_path)?;
            let tools = get_tool_definitions(&config);
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }

        Commands::Call {
            tool,
            input,
            file,
            model,
            context,
            temperature,
            dry_run,
        } => {
            let config = Config::load_or_default(&config_path)?;
            config.validate()?;

            let kind =
                ToolKind::from_name(&tool).ok_or_else(|| AssistantError::UnknownTool(tool))?;
            let input = if file {
                std::fs::read_to_string(expand(&input))?
            } else {
                input
            };
            let arguments = tool_arguments(kind, input, model, context, temperature)?;

            if dry_run {
                let parsed = ToolArguments::from_value(arguments)?;
                let request = build_request(&config, kind, &parsed)?;
                println!(
                    "model: {}\ntemperature: {}\nmax_tokens: {}\n\n{}",
                    request.model_id, request.temperature, request.max_tokens, request.prompt
                );
                return Ok(());
            }

            let client = OpenRouterClient::from_config(&config)?;
            let handler = AssistantHandler::new(config, Arc::new(client));
            let response = handler.call_tool(kind.name(), arguments)?;
            println!("{}", response);
        }

        Commands::Validate => {
            let config = Config::load(&config_path)?;
            config.validate()?;
            config.api_key()?;
            println!(
                "{} is valid ({} models, default {})",
                config_path.display(),
                config.models.len(),
                config.default_model
            );
        }

        Commands::Install {
            server_dir,
            claude_md,
            no_claude_md,
            force,
        } => {
            let server_dir = match server_dir {
                Some(dir) => expand(&dir),
                None => install::default_server_dir().ok_or_else(|| {
                    AssistantError::Config("Cannot determine home directory".to_string())
                })?,
            };
            let claude_md = if no_claude_md {
                None
            } else {
                claude_md.map(|p| expand(&p)).or_else(install::default_claude_md)
            };

            let server_binary = std::env::current_exe()?.with_file_name(format!(
                "ai-assistant-server{}",
                std::env::consts::EXE_SUFFIX
            ));

            let report = install::install(&InstallOptions {
                server_dir,
                claude_md,
                server_binary: server_binary.exists().then_some(server_binary),
                force,
            })?;

            if report.config_written {
                println!("Wrote {}", report.config_path.display());
            } else {
                println!("Kept existing {}", report.config_path.display());
            }
            println!("Wrote {}", report.instructions_path.display());
            if let Some(binary) = &report.binary_path {
                println!("Installed {}", binary.display());
            }
            if report.claude_md_updated {
                println!("Added tool instructions to CLAUDE.md");
            }
            println!("\nRegister the server with:\n  {}", report.register_command);
            println!("\nThen export OPENROUTER_API_KEY (or the variable named in config.json).");
        }
    }

    Ok(())
}
