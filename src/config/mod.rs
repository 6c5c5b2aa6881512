use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::types::EngineConfig;
use crate::logging::LoggingConfig;
use crate::Result;

/// Top-level configuration: engine acceptance policy plus logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        if content.trim_start().starts_with('{') {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.engine.validate() {
            errors.push(e.to_string());
        }

        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Load a configuration file, falling back to defaults on any problem.
pub fn load_config_or_default(config_path: Option<&str>) -> Config {
    match config_path {
        Some(path) => match Config::load_from_file(path) {
            Ok(config) => {
                if let Err(errors) = config.validate() {
                    for error in &errors {
                        tracing::warn!(path, error = %error, "Configuration validation error");
                    }
                    tracing::warn!(path, "Using default configuration instead");
                    Config::default()
                } else {
                    config
                }
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        },
        None => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.engine.min_score = 0.9;
        config.engine.enable_fallback = false;
        config.save_to_file(&path, ConfigFormat::Toml).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_sniffing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::default();
        config.save_to_file(&path, ConfigFormat::Json).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(
            &path,
            "[engine]\nmin_score = 0.75\nmin_inlier_ratio = 0.5\nenable_fallback = true\n",
        )
        .unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.engine.min_score, 0.75);
        assert_eq!(loaded.logging, LoggingConfig::default());
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut config = Config::default();
        config.engine.min_score = 1.5;
        config.logging.global_level = "noisy".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = load_config_or_default(Some("/nonexistent/config.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_on_invalid_thresholds() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[engine]\nmin_score = 2.0\nmin_inlier_ratio = 0.5\nenable_fallback = true\n",
        )
        .unwrap();

        let config = load_config_or_default(path.to_str());
        assert_eq!(config, Config::default());
    }
}
