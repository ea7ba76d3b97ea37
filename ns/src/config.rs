//! Configuration for nodestore

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path", rename = "db-path")]
    pub db_path: PathBuf,

    /// Language code assigned to new variants when none is given
    #[serde(default = "default_langcode", rename = "default-langcode")]
    pub default_langcode: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_DB_PATH)
}

fn default_langcode() -> String {
    crate::DEFAULT_LANGCODE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            default_langcode: default_langcode(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            Some(PathBuf::from("nodestore.yml")),
            dirs::config_dir().map(|p| p.join("nodestore").join("config.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("nodestore.db"));
        assert_eq!(config.default_langcode, "en");
    }

    #[test]
    fn test_parse_yaml() {
        let config: Config = serde_yaml::from_str("db-path: /tmp/content.db\n").unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/content.db"));
        assert_eq!(config.default_langcode, "en");
    }
}
