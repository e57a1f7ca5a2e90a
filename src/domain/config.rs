//! # Configuration
//!
//! Chat transport credentials, loaded from `matrix.yaml` in the configuration
//! directory. The three property groups are loaded by the config store.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::domain::paths::{config_file, MATRIX_FILE};

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl MatrixConfig {
    pub fn load(dir: &Path) -> Result<Self> {
        let path = config_file(dir, MATRIX_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix_config() {
        let yaml = "homeserver: https://matrix.example.org\nusername: scout\npassword: hunter2\n";
        let config = MatrixConfig::parse(yaml).unwrap();
        assert_eq!(config.homeserver, "https://matrix.example.org");
        assert_eq!(config.username, "scout");
        assert!(config.display_name.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MatrixConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("matrix.yaml"));
    }
}
