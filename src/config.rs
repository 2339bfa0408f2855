//! Application configuration.
//!
//! Server settings are resolved with priority config.toml > .env/environment > default.
//! Engine tunables are plain constants.

use serde::Deserialize;
use std::path::Path;

// ==================== Engine Tunables ====================

/// Largest slot count the UI will render for one question
pub const MAX_SLOTS: usize = 10;

/// Smallest slot count for sequence and multi-blank questions
pub const MIN_SLOTS: usize = 2;

/// Sequence slot count when neither the answer nor the examples give one
pub const DEFAULT_SEQUENCE_SLOTS: usize = 4;

/// Longest implicit label accepted by named-pair inference
pub const MAX_NAMED_LABEL_CHARS: usize = 20;

/// Answers longer than this are treated as paragraph answers
pub const FREEFORM_MIN_CHARS: usize = 80;

/// Clamp a slot count into the renderable range
pub fn clamp_slots(count: usize) -> usize {
    count.clamp(MIN_SLOTS, MAX_SLOTS)
}

// ==================== Server Configuration ====================

/// Default address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Default port
pub const SERVER_PORT: u16 = 3000;

// ==================== Config File ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub grading: Option<GradingSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerSection {
    pub addr: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GradingSection {
    pub legacy_inference: Option<bool>,
}

/// Errors reading config.toml
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read and parse a config file
pub fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
}

// ==================== Resolved Settings ====================

/// Settings after merging file, environment and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_addr: String,
    pub server_port: u16,
    /// Allow named-pair inference when classifying undeclared questions
    pub legacy_inference: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_addr: SERVER_ADDR.to_string(),
            server_port: SERVER_PORT,
            legacy_inference: true,
        }
    }
}

impl Settings {
    /// Merge a parsed config file and an environment lookup over the defaults
    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let server = file.server.unwrap_or_default();
        let grading = file.grading.unwrap_or_default();
        let defaults = Self::default();

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or(defaults.server_addr);

        let server_port = server
            .port
            .or_else(|| {
                let raw = env("PORT")?;
                match raw.trim().parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid PORT value: {}", raw);
                        None
                    }
                }
            })
            .unwrap_or(defaults.server_port);

        let legacy_inference = grading
            .legacy_inference
            .or_else(|| env("GRADING_LEGACY_INFERENCE").and_then(|v| parse_flag(&v)))
            .unwrap_or(defaults.legacy_inference);

        Self {
            server_addr,
            server_port,
            legacy_inference,
        }
    }

    /// Full address for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load settings with priority: config.toml > .env > default
pub fn load_settings() -> Settings {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let path = Path::new("config.toml");
    let file = if path.exists() {
        match read_config_file(path) {
            Ok(config) => {
                tracing::info!("Using config.toml");
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring config.toml: {}", e);
                None
            }
        }
    } else {
        None
    };

    Settings::resolve(file, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(None, env_from(&[]));
        assert_eq!(settings.bind_addr(), "0.0.0.0:3000");
        assert!(settings.legacy_inference);
    }

    #[test]
    fn test_env_overrides_default() {
        let settings = Settings::resolve(
            None,
            env_from(&[("SERVER_ADDR", "127.0.0.1"), ("PORT", "8080"), ("GRADING_LEGACY_INFERENCE", "false")]),
        );
        assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
        assert!(!settings.legacy_inference);
    }

    #[test]
    fn test_invalid_env_port_falls_back() {
        let settings = Settings::resolve(None, env_from(&[("PORT", "not-a-port")]));
        assert_eq!(settings.server_port, SERVER_PORT);
    }

    #[test]
    fn test_file_overrides_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000\n\n[grading]\nlegacy_inference = false").unwrap();

        let config = read_config_file(file.path()).unwrap();
        let settings = Settings::resolve(
            Some(config),
            env_from(&[("PORT", "8080"), ("GRADING_LEGACY_INFERENCE", "true")]),
        );
        assert_eq!(settings.server_port, 4000);
        assert_eq!(settings.server_addr, SERVER_ADDR);
        assert!(!settings.legacy_inference);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        let err = read_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_config_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_clamp_slots() {
        assert_eq!(clamp_slots(0), MIN_SLOTS);
        assert_eq!(clamp_slots(5), 5);
        assert_eq!(clamp_slots(40), MAX_SLOTS);
    }
}
