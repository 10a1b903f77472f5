use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;
mod commands;
mod config;
mod display;
mod document;
mod error;
mod llm;
mod mode;
mod notes;
mod orchestrator;
mod prompt;
mod session;
mod transcript;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: LogLevel) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paper-reader")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("paper-reader.log");

    // Log to a file so output does not interleave with the chat
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.to_level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Some(Commands::Greet) => commands::greet::run(&config),
        Some(Commands::Config { action }) => commands::config::run(action, &config),
        Some(Commands::Completions { shell }) => {
            cli::write_completions(shell, &mut std::io::stdout());
            Ok(())
        }
        None => match (cli.input, cli.output) {
            (Some(input), Some(output)) => commands::chat::run(&input, &output, &config),
            _ => Cli::command()
                .error(
                    clap::error::ErrorKind::MissingRequiredArgument,
                    "both <INPUT> and <OUTPUT> are required to chat about a paper",
                )
                .exit(),
        },
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_overrides(&cli.overrides());

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(config.log_level).context("Failed to setup logging")?;

    info!("Starting paper-reader with config from: {:?}", cli.config);

    // Run the command
    run(cli, config).context("Command failed")?;

    Ok(())
}
