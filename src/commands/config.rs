use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => get(&key, config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "paper-reader configuration".bold());
            println!();

            println!("{}:", "endpoint".cyan());
            println!("  base_url: {}", config.endpoint.base_url);
            println!("  model: {}", config.endpoint.model);
            println!("  api_key: {}", if config.endpoint.api_key.is_some() { "(set)" } else { "(none)" });
            println!("  timeout_secs: {}", config.endpoint.timeout_secs);
            println!();

            println!("{}:", "generation".cyan());
            println!("  temperature: {}", config.generation.temperature);
            match config.generation.max_tokens {
                Some(n) => println!("  max_tokens: {}", n),
                None => println!("  max_tokens: {}", "(server default)".dimmed()),
            }
            println!();

            println!("{}:", "notes".cyan());
            println!("  frontmatter: {}", config.notes.frontmatter);
            println!("  tags: [{}]", config.notes.tags.join(", "));
            println!();

            println!("{}:", "session".cyan());
            println!("  opening_mode: {}", config.session.opening_mode);
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
        }
    }

    Ok(())
}

/// Look up a single value by dotted key
pub fn lookup(key: &str, config: &Config) -> Option<String> {
    match key {
        "endpoint.base_url" => Some(config.endpoint.base_url.clone()),
        "endpoint.model" => Some(config.endpoint.model.clone()),
        "endpoint.timeout_secs" => Some(config.endpoint.timeout_secs.to_string()),
        "generation.temperature" => Some(config.generation.temperature.to_string()),
        "generation.max_tokens" => config.generation.max_tokens.map(|n| n.to_string()),
        "notes.frontmatter" => Some(config.notes.frontmatter.to_string()),
        "notes.tags" => Some(config.notes.tags.join(",")),
        "session.opening_mode" => Some(config.session.opening_mode.clone()),
        "log_level" | "log-level" => Some(config.log_level.as_filter().to_string()),
        _ => None,
    }
}

fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config) {
        Some(v) => println!("{}", v),
        None => {
            eprintln!("{} Unknown or unset config key: {}", "✗".red(), key);
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_keys() {
        let config = Config::default();
        assert_eq!(lookup("endpoint.model", &config).as_deref(), Some("llama3.2:1b"));
        assert_eq!(lookup("generation.temperature", &config).as_deref(), Some("0.1"));
        assert_eq!(lookup("notes.tags", &config).as_deref(), Some("research,papers"));
        assert_eq!(lookup("log-level", &config).as_deref(), Some("info"));
        assert_eq!(lookup("session.opening_mode", &config).as_deref(), Some("summary"));
    }

    #[test]
    fn test_lookup_unset_and_unknown() {
        let config = Config::default();
        assert!(lookup("generation.max_tokens", &config).is_none());
        assert!(lookup("endpoint.api_key", &config).is_none());
        assert!(lookup("nope", &config).is_none());
    }
}
