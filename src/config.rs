use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::GenerationParams;
use crate::session::DEFAULT_OPENING_MODE;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "PAPER_READER_CONFIG";
/// Environment variable overriding `endpoint.api_key`
pub const API_KEY_ENV: &str = "PAPER_READER_API_KEY";

const CONFIG_FILE: &str = "paper-reader.yaml";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub generation: GenerationParams,
    pub notes: NotesConfig,
    pub session: SessionConfig,
    pub log_level: LogLevel,
}

/// Where the OpenAI-compatible server lives and which model to ask
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Global timeout per request, in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Prefix saved notes with Obsidian frontmatter
    pub frontmatter: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mode tag for the request that opens every session
    pub opening_mode: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: Some("ollama".to_string()),
            model: "llama3.2:1b".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            frontmatter: false,
            tags: vec!["research".to_string(), "papers".to_string()],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opening_mode: DEFAULT_OPENING_MODE.to_string(),
        }
    }
}

/// Values given on the command line that beat the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::discover(config_path)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.endpoint.api_key = Some(key);
        }

        Ok(config)
    }

    fn discover(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        let mut candidates = Vec::new();
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            candidates.push(Self::expand_path(Path::new(&env_path)));
        }
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("paper-reader").join(CONFIG_FILE));
        }
        // For development
        candidates.push(PathBuf::from(CONFIG_FILE));

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {:#}", path.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(base_url) = &overrides.base_url {
            self.endpoint.base_url = base_url.clone();
        }
        if let Some(model) = &overrides.model {
            self.endpoint.model = model.clone();
        }
        if let Some(temperature) = overrides.temperature {
            self.generation.temperature = temperature;
        }
        self
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
