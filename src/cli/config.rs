//! Configuration file
//!
//! ```json
//! { "data_dir": "./akili-data", "max_question_bytes": 4096 }
//! ```
//!
//! `AKILI_DATA_DIR`, when set and non-empty, overrides `data_dir`.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};

/// Environment variable overriding `data_dir`
pub const DATA_DIR_ENV: &str = "AKILI_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Longest accepted question in bytes (default 4 KiB)
    #[serde(default = "default_max_question_bytes")]
    pub max_question_bytes: usize,

    /// Largest accepted extraction file in bytes (default 100 MiB)
    #[serde(default = "default_max_extraction_bytes")]
    pub max_extraction_bytes: u64,
}

fn default_max_question_bytes() -> usize {
    4096
}
fn default_max_extraction_bytes() -> u64 {
    104857600
}

impl Config {
    /// Load configuration from file, apply the environment override, validate
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            config.apply_data_dir_override(&dir);
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse without validating
    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    fn apply_data_dir_override(&mut self, dir: &str) {
        if !dir.trim().is_empty() {
            self.data_dir = dir.to_string();
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }
        if self.max_question_bytes == 0 {
            return Err(CliError::config_error("max_question_bytes must be > 0"));
        }
        if self.max_extraction_bytes == 0 {
            return Err(CliError::config_error("max_extraction_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_json(r#"{"data_dir":"/tmp/akili"}"#).unwrap();
        assert_eq!(config.max_question_bytes, 4096);
        assert_eq!(config.max_extraction_bytes, 104857600);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_data_dir_rejected() {
        let err = Config::from_json(r#"{"max_question_bytes":10}"#).unwrap_err();
        assert_eq!(err.code_str(), "AKILI_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_zero_limits_rejected() {
        let config = Config::from_json(r#"{"data_dir":"d","max_question_bytes":0}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::from_json(r#"{"data_dir":"a"}"#).unwrap();
        config.apply_data_dir_override("  ");
        assert_eq!(config.data_dir, "a");
        config.apply_data_dir_override("/srv/akili");
        assert_eq!(config.data_dir, "/srv/akili");
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("akili.json");
        fs::write(&path, r#"{"data_dir":"./data","max_question_bytes":512}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_question_bytes, 512);
    }
}
