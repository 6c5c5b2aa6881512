//! Logging configuration
//!
//! Output destinations and per-component log levels for the engine's
//! diagnostic stream.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub global_level: String,

    /// Engine-specific log level, applied to the `engine` module target
    pub engine_level: String,

    /// Enable console output
    pub console_output: bool,

    /// Directory for JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file location in logs (impacts performance)
    pub include_file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_level: "info".to_string(),
            engine_level: "info".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose configuration for development
    pub fn development() -> Self {
        Self {
            global_level: "debug".to_string(),
            engine_level: "trace".to_string(),
            console_output: true,
            log_directory: Some(PathBuf::from("logs")),
            include_file_location: true,
        }
    }

    /// Minimal-overhead configuration for production batch runs
    pub fn production() -> Self {
        Self {
            global_level: "warn".to_string(),
            engine_level: "info".to_string(),
            console_output: false,
            log_directory: Some(PathBuf::from("/var/log/image-registration")),
            include_file_location: false,
        }
    }

    /// Validate the configuration and provide helpful error messages
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];

        if !valid_levels.contains(&self.global_level.as_str()) {
            return Err(format!(
                "Invalid global_level: {}. Must be one of: {:?}",
                self.global_level, valid_levels
            ));
        }

        if !valid_levels.contains(&self.engine_level.as_str()) {
            return Err(format!(
                "Invalid engine_level: {}. Must be one of: {:?}",
                self.engine_level, valid_levels
            ));
        }

        if let Some(ref log_dir) = self.log_directory {
            if let Some(parent) = log_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(format!("Log directory parent does not exist: {:?}", parent));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.global_level, "info");
        assert!(config.console_output);
        assert!(config.log_directory.is_none());
        assert!(!config.include_file_location);
    }

    #[test]
    fn test_development_config() {
        let config = LoggingConfig::development();
        assert_eq!(config.global_level, "debug");
        assert_eq!(config.engine_level, "trace");
        assert!(config.include_file_location);
        assert!(config.log_directory.is_some());
    }

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert_eq!(config.global_level, "warn");
        assert!(!config.console_output);
        assert!(!config.include_file_location);
    }

    #[test]
    fn test_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.global_level = "invalid".to_string();
        assert!(config.validate().is_err());

        config.global_level = "debug".to_string();
        config.engine_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }
}
