use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

const ENV_CONFIG_PATH: &str = "CLAIMGUARD_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Artificial delays between loading steps
///
/// These only pace the loading view; no work happens during them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Time spent in the "uploading" step
    pub uploading_ms: u64,
    /// Time spent in the "analyzing" step
    pub analyzing_ms: u64,
    /// Time spent on "done" before the report is shown
    pub finishing_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            uploading_ms: 500,
            analyzing_ms: 1500,
            finishing_ms: 500,
        }
    }
}

impl PacingConfig {
    /// No delays at all
    pub fn immediate() -> Self {
        Self {
            uploading_ms: 0,
            analyzing_ms: 0,
            finishing_ms: 0,
        }
    }

    pub fn uploading(&self) -> Duration {
        Duration::from_millis(self.uploading_ms)
    }

    pub fn analyzing(&self) -> Duration {
        Duration::from_millis(self.analyzing_ms)
    }

    pub fn finishing(&self) -> Duration {
        Duration::from_millis(self.finishing_ms)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub pacing: PacingConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let pacing = Self::load_config_file(&config_path)
            .map(|cf| cf.pacing)
            .unwrap_or_default();

        Self { pacing, port, host }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_pacing_keeps_defaults() {
        let file: ConfigFile = serde_yaml::from_str("pacing:\n  analyzing_ms: 10\n").unwrap();
        assert_eq!(file.pacing.analyzing_ms, 10);
        assert_eq!(file.pacing.uploading_ms, 500);
        assert_eq!(file.pacing.finishing_ms, 500);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        assert!(Config::load_config_file("/nonexistent/claimguard.yaml").is_none());
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
