//! AI Assistant MCP Server
//!
//! Run with: ai-assistant-server

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, ValueEnum};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use ai_assistant::config::Config;
use ai_assistant::error::Result;
use ai_assistant::handler::AssistantHandler;
use ai_assistant::mcp::McpServer;
use ai_assistant::openrouter::OpenRouterClient;

#[derive(Parser, Debug)]
#[command(name = "ai-assistant-server")]
#[command(about = "MCP server routing pair/review/brainstorm tools to OpenRouter models")]
#[command(version)]
struct Args {
    /// Config file path
    #[arg(
        long,
        env = "AI_ASSISTANT_CONFIG",
        default_value = "~/.claude-mcp-servers/ai-assistant/config.json"
    )]
    config: String,

    /// Override the default model from the config file
    #[arg(long, env = "AI_ASSISTANT_DEFAULT_MODEL")]
    default_model: Option<String>,

    /// Log file (appended to, in addition to stderr)
    #[arg(
        long,
        env = "AI_ASSISTANT_LOG_FILE",
        default_value = "~/.claude-mcp-servers/ai-assistant/server.log"
    )]
    log_file: String,

    /// Log to stderr only
    #[arg(long)]
    no_log_file: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, env = "DEBUG", value_parser = clap::builder::BoolishValueParser::new())]
    debug: bool,

    /// Log line format for stderr and the log file
    #[arg(long, env = "AI_ASSISTANT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn fmt_layer<W>(writer: W, format: LogFormat, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false);
    match format {
        LogFormat::Text => layer.with_filter(filter).boxed(),
        LogFormat::Json => layer.json().with_filter(filter).boxed(),
    }
}

fn init_logging(log_file: Option<PathBuf>, debug: bool, format: LogFormat) {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
    };

    // stdout is reserved for the MCP protocol
    let mut layers = vec![fmt_layer(std::io::stderr, format, filter())];

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => layers.push(fmt_layer(Mutex::new(file), format, filter())),
            Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
        }
    }

    tracing_subscriber::registry().with(layers).init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = (!args.no_log_file)
        .then(|| PathBuf::from(shellexpand::tilde(&args.log_file).into_owned()));
    init_logging(log_file, args.debug, args.log_format);

    let config_path = PathBuf::from(shellexpand::tilde(&args.config).into_owned());
    let mut config = Config::load_or_default(&config_path)?;
    if let Some(model) = args.default_model {
        config.default_model = model;
    }
    config.validate()?;
    tracing::info!("Configuration loaded from {}", config_path.display());

    let client = match OpenRouterClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e);
        }
    };

    tracing::info!("Available models: {}", config.available_models());
    tracing::info!("Default model: {}", config.default_model);

    let handler = AssistantHandler::new(config, Arc::new(client));
    let server = McpServer::new(handler);

    tracing::info!("AI Assistant MCP server starting...");
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    tracing::info!("AI Assistant MCP server stopped");
    Ok(())
}
