//! Application configuration

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::capture::monitor::DEFAULT_MONITOR_PATTERN;
use crate::util::paths::config_path;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Regex deciding which file names are monitored for capture
    pub monitored_pattern: String,
    /// Interpreter used to execute flushed files for output capture
    pub interpreter: String,
    /// Number of captured-output entries kept in the rolling history
    pub output_history_limit: usize,
    /// Viewer server bind address
    pub server_host: String,
    /// Viewer server port
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitored_pattern: DEFAULT_MONITOR_PATTERN.to_string(),
            interpreter: "python3".to_string(),
            output_history_limit: 50,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
        }
    }
}

/// TOML shape of the config file; every field optional, defaults fill gaps.
#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    monitored_pattern: Option<String>,
    interpreter: Option<String>,
    output_history_limit: Option<usize>,
    server_host: Option<String>,
    server_port: Option<u16>,
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when the file is missing or malformed.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => return config,
        };

        let toml_config: TomlConfig = match toml::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "Failed to parse config file, using defaults"
                );
                return config;
            }
        };

        if let Some(pattern) = toml_config.monitored_pattern {
            config.monitored_pattern = pattern;
        }
        if let Some(interpreter) = toml_config.interpreter {
            config.interpreter = interpreter;
        }
        if let Some(limit) = toml_config.output_history_limit {
            config.output_history_limit = limit;
        }
        if let Some(host) = toml_config.server_host {
            config.server_host = host;
        }
        if let Some(port) = toml_config.server_port {
            config.server_port = port;
        }

        config
    }
}
