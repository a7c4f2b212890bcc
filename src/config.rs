//! Runtime configuration for admissions-prompt-relay.
//!
//! Every setting can come from a command-line flag or its environment
//! variable (a `.env` file is loaded into the environment first by the
//! binary). `Cli` is the raw parsed form; `Config` is the validated view the
//! rest of the crate uses.

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is empty")]
    MissingApiKey,

    #[error("Model identifier is empty")]
    MissingModel,
}

/// Command-line arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "admissions-prompt-relay",
    about = "Prompt-template relay to a hosted chat-completion model"
)]
pub struct Cli {
    /// HTTP listen port.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// HTTP bind address.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Credential for the completion service.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Root URL of the OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub openai_base_url: String,

    /// Model identifier sent with every completion call.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4")]
    pub model: String,

    /// Sampling temperature.
    #[arg(long, env = "OPENAI_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f64,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(
        long,
        env = "LOG_JSON",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub log_json: bool,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,

    /// Completion service configuration.
    pub openai: OpenAiConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Completion service settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
}

// Keeps the key out of logs.
impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Config {
    /// Build and validate configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.openai_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if cli.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }

        Ok(Self {
            server: ServerConfig {
                host: cli.host.clone(),
                port: cli.port,
            },
            openai: OpenAiConfig {
                api_key: cli.openai_api_key.clone(),
                base_url: cli.openai_base_url.clone(),
                model: cli.model.clone(),
                temperature: cli.temperature,
            },
        })
    }

    /// `host:port` to bind the listener to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["admissions-prompt-relay"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_build_config() {
        let c = cli(&[
            "--openai-api-key",
            "sk-test",
            "--port",
            "8081",
            "--model",
            "gpt-4o",
            "--host",
            "127.0.0.1",
        ]);
        let cfg = Config::from_cli(&c).unwrap();
        assert_eq!(cfg.listen_addr(), "127.0.0.1:8081");
        assert_eq!(cfg.openai.model, "gpt-4o");
        assert_eq!(cfg.openai.api_key, "sk-test");
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let c = cli(&["--openai-api-key", "  ", "--port", "1"]);
        assert_eq!(Config::from_cli(&c).unwrap_err(), ConfigError::MissingApiKey);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let c = cli(&["--openai-api-key", "sk-secret", "--port", "1"]);
        let cfg = Config::from_cli(&c).unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_serialized_config_omits_api_key() {
        let c = cli(&["--openai-api-key", "sk-secret", "--port", "1"]);
        let cfg = Config::from_cli(&c).unwrap();
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_log_json_accepts_boolish_env_values() {
        for (value, expected) in [("1", true), ("yes", true), ("on", true), ("0", false), ("false", false)] {
            std::env::set_var("LOG_JSON", value);
            let parsed = Cli::try_parse_from(["admissions-prompt-relay", "--openai-api-key", "k"]);
            std::env::remove_var("LOG_JSON");
            assert_eq!(parsed.unwrap().log_json, expected, "LOG_JSON={value}");
        }
        assert!(cli(&["--openai-api-key", "k", "--log-json"]).log_json);
    }

    #[test]
    fn test_default_server_config() {
        let s = ServerConfig::default();
        assert_eq!(s.port, 5000);
        assert_eq!(s.host, "0.0.0.0");
    }
}
