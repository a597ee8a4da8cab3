//! Installation into the host assistant's MCP server directory
//!
//! Installing copies the server binary and a `config.json` into the server
//! directory, writes the natural-language instruction document next to them
//! and appends that document to the host's `CLAUDE.md` so the host knows how
//! to turn "ask Gemini to ..." into tool calls.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{AssistantError, Result};

/// Instruction document for the host assistant
pub const INSTRUCTIONS: &str = include_str!("../assets/INSTRUCTIONS.md");

pub const INSTRUCTIONS_FILE: &str = "INSTRUCTIONS.md";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "server.log";

const BLOCK_START: &str = "<!-- ai-assistant:start -->";
const BLOCK_END: &str = "<!-- ai-assistant:end -->";

/// `~/.claude-mcp-servers/ai-assistant`
pub fn default_server_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude-mcp-servers").join("ai-assistant"))
}

/// `~/.claude/CLAUDE.md`
pub fn default_claude_md() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("CLAUDE.md"))
}

/// What to install and where
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub server_dir: PathBuf,
    /// Host instruction file to append to; `None` skips that step
    pub claude_md: Option<PathBuf>,
    /// Server binary to copy into `server_dir`
    pub server_binary: Option<PathBuf>,
    /// Overwrite an existing config.json
    pub force: bool,
}

/// Outcome of an install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub config_path: PathBuf,
    pub config_written: bool,
    pub instructions_path: PathBuf,
    pub binary_path: Option<PathBuf>,
    pub claude_md_updated: bool,
    /// Command that registers the server with the host assistant
    pub register_command: String,
}

pub fn install(options: &InstallOptions) -> Result<InstallReport> {
    fs::create_dir_all(&options.server_dir)?;

    let config_path = options.server_dir.join(CONFIG_FILE);
    let config_written = if config_path.exists() && !options.force {
        tracing::info!("Keeping existing {}", config_path.display());
        // Refuse to report success over a file the server could not load
        Config::load(&config_path)?.validate()?;
        false
    } else {
        fs::write(&config_path, Config::default().to_json_pretty()?)?;
        tracing::info!("Wrote {}", config_path.display());
        true
    };

    let instructions_path = options.server_dir.join(INSTRUCTIONS_FILE);
    fs::write(&instructions_path, INSTRUCTIONS)?;

    let binary_path = match &options.server_binary {
        Some(source) => Some(copy_binary(source, &options.server_dir)?),
        None => None,
    };

    let claude_md_updated = match &options.claude_md {
        Some(path) => append_instructions(path)?,
        None => false,
    };

    let server_command = binary_path
        .clone()
        .unwrap_or_else(|| options.server_dir.join("ai-assistant-server"));
    let register_command = format!(
        "claude mcp add --scope user ai-assistant {} -- --config {}",
        server_command.display(),
        config_path.display()
    );

    Ok(InstallReport {
        config_path,
        config_written,
        instructions_path,
        binary_path,
        claude_md_updated,
        register_command,
    })
}

fn copy_binary(source: &Path, server_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        AssistantError::InvalidInput(format!("Not a file path: {}", source.display()))
    })?;
    let target = server_dir.join(file_name);

    if target.exists() && fs::canonicalize(source)? == fs::canonicalize(&target)? {
        return Ok(target);
    }

    fs::copy(source, &target)?;
    tracing::info!("Copied {} to {}", source.display(), target.display());
    Ok(target)
}

/// Append the instruction block to `path` unless it is already there.
///
/// Returns whether the file changed.
pub fn append_instructions(path: &Path) -> Result<bool> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing.contains(BLOCK_START) {
        tracing::info!("{} already has the ai-assistant instructions", path.display());
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let separator = if existing.is_empty() || existing.ends_with("\n\n") {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    write!(
        file,
        "{}{}\n{}\n{}\n",
        separator,
        BLOCK_START,
        INSTRUCTIONS.trim_end(),
        BLOCK_END
    )?;

    tracing::info!("Appended ai-assistant instructions to {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_instructions_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".claude").join("CLAUDE.md");

        assert!(append_instructions(&path).unwrap());
        let first = fs::read_to_string(&path).unwrap();
        assert!(first.starts_with(BLOCK_START));
        assert!(first.contains("review_security"));

        assert!(!append_instructions(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CLAUDE.md");
        fs::write(&path, "# My rules\nAlways run tests.").unwrap();

        append_instructions(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# My rules\nAlways run tests.\n\n<!-- ai-assistant:start -->"));
        assert!(content.trim_end().ends_with(BLOCK_END));
    }

    fn options(server_dir: &Path) -> InstallOptions {
        InstallOptions {
            server_dir: server_dir.to_path_buf(),
            claude_md: None,
            server_binary: None,
            force: false,
        }
    }

    #[test]
    fn test_install_fresh_directory() {
        let dir = tempdir().unwrap();
        let server_dir = dir.path().join("ai-assistant");
        let claude_md = dir.path().join("CLAUDE.md");

        let report = install(&InstallOptions {
            claude_md: Some(claude_md.clone()),
            ..options(&server_dir)
        })
        .unwrap();

        assert!(report.config_written);
        assert!(report.claude_md_updated);
        assert_eq!(report.binary_path, None);
        assert_eq!(report.config_path, server_dir.join(CONFIG_FILE));
        Config::load(&report.config_path).unwrap().validate().unwrap();
        assert_eq!(
            fs::read_to_string(&report.instructions_path).unwrap(),
            INSTRUCTIONS
        );
        assert!(fs::read_to_string(&claude_md).unwrap().contains(BLOCK_START));
        assert_eq!(
            report.register_command,
            format!(
                "claude mcp add --scope user ai-assistant {} -- --config {}",
                server_dir.join("ai-assistant-server").display(),
                server_dir.join(CONFIG_FILE).display()
            )
        );
    }

    #[test]
    fn test_install_keeps_existing_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        install(&options(dir.path())).unwrap();

        let mut custom = Config::default();
        custom.default_model = "Claude".to_string();
        let custom_json = custom.to_json_pretty().unwrap();
        fs::write(&config_path, &custom_json).unwrap();

        let report = install(&options(dir.path())).unwrap();
        assert!(!report.config_written);
        assert_eq!(fs::read_to_string(&config_path).unwrap(), custom_json);
    }

    #[test]
    fn test_install_force_overwrites_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        fs::write(&config_path, "{not json").unwrap();

        let report = install(&InstallOptions {
            force: true,
            ..options(dir.path())
        })
        .unwrap();
        assert!(report.config_written);
        assert_eq!(
            Config::load(&config_path).unwrap().default_model,
            Config::default().default_model
        );
    }

    #[test]
    fn test_install_rejects_malformed_existing_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();

        let err = install(&options(dir.path())).unwrap_err();
        assert!(matches!(err, AssistantError::Config(_)));
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            "{not json"
        );
    }

    #[test]
    fn test_install_copies_binary() {
        let dir = tempdir().unwrap();
        let build_dir = dir.path().join("target");
        let server_dir = dir.path().join("server");
        fs::create_dir_all(&build_dir).unwrap();
        let source = build_dir.join("ai-assistant-server");
        fs::write(&source, b"binary").unwrap();

        let report = install(&InstallOptions {
            server_binary: Some(source),
            ..options(&server_dir)
        })
        .unwrap();

        let installed = server_dir.join("ai-assistant-server");
        assert_eq!(report.binary_path, Some(installed.clone()));
        assert_eq!(fs::read(&installed).unwrap(), b"binary");
        assert!(report
            .register_command
            .contains(&installed.display().to_string()));
    }

    #[test]
    fn test_copy_binary_onto_itself() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("ai-assistant-server");
        fs::write(&source, b"binary").unwrap();

        let target = copy_binary(&source, dir.path()).unwrap();
        assert_eq!(target, source);
        assert_eq!(fs::read(&target).unwrap(), b"binary");
    }

    #[test]
    fn test_instructions_mention_every_tool() {
        for tool in crate::prompts::ToolKind::ALL {
            assert!(INSTRUCTIONS.contains(tool.name()), "missing {}", tool);
        }
    }
}
