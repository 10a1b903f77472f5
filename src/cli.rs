use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use crate::config::Overrides;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "paper-reader",
    about = "Chat with a local LLM about an academic paper and keep notes",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/paper-reader/logs/paper-reader.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to paper-reader.yaml config file")]
    pub config: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible API (e.g. http://localhost:11434/v1)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Model identifier
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Sampling temperature
    #[arg(long, global = true)]
    pub temperature: Option<f32>,

    /// Markdown paper to chat about
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Notes file: prior notes are read from it and the conversation is saved to it
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

/// Write a completion script for `shell`
pub fn write_completions<W: Write>(shell: clap_complete::Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

#[derive(Subcommand)]
pub enum Commands {
    /// Have the model introduce itself and greet you
    Greet,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_two_positionals() {
        let cli = Cli::try_parse_from(["paper-reader", "paper.md", "notes.md"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("paper.md")));
        assert_eq!(cli.output, Some(PathBuf::from("notes.md")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_overrides_from_flags() {
        let cli = Cli::try_parse_from([
            "paper-reader",
            "--model",
            "qwen2.5:0.5b",
            "--temperature",
            "0.5",
            "paper.md",
            "notes.md",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.model.as_deref(), Some("qwen2.5:0.5b"));
        assert_eq!(overrides.temperature, Some(0.5));
        assert!(overrides.base_url.is_none());
    }

    #[test]
    fn test_global_flags_before_subcommand() {
        let cli = Cli::try_parse_from(["paper-reader", "--model", "m", "greet"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Greet)));
        assert!(cli.input.is_none());
        assert_eq!(cli.model.as_deref(), Some("m"));

        let cli = Cli::try_parse_from([
            "paper-reader",
            "--config",
            "x.yaml",
            "--base-url",
            "http://gpu-box:8000/v1",
            "config",
            "get",
            "endpoint.model",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
        assert!(cli.input.is_none());
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Get { key },
            }) => assert_eq!(key, "endpoint.model"),
            _ => panic!("expected config get"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["paper-reader", "greet", "--base-url", "http://h/v1"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Greet)));
        assert_eq!(cli.base_url.as_deref(), Some("http://h/v1"));
    }

    #[test]
    fn test_greet_subcommand() {
        let cli = Cli::try_parse_from(["paper-reader", "greet"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Greet)));
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_bash_completions_mention_subcommands() {
        let mut out = Vec::new();
        write_completions(clap_complete::Shell::Bash, &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("paper-reader"));
        assert!(script.contains("greet"));
    }

    #[test]
    fn test_config_get_subcommand() {
        let cli = Cli::try_parse_from(["paper-reader", "config", "get", "endpoint.model"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigAction::Get { key },
            }) => assert_eq!(key, "endpoint.model"),
            _ => panic!("expected config get"),
        }
    }
}
