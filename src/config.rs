use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const API_URL_ENV: &str = "MOVIEMIND_API_URL";
pub const LOG_ENV: &str = "MOVIEMIND_LOG";

/// Page size used when loading reviews on the detail view.
pub const REVIEW_PAGE_SIZE: u32 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Client settings. Read from `config.json`, then overridden by the
/// environment and the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub per_page: u32,
    pub request_timeout_secs: u64,
    pub placeholder_poster_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            per_page: 20,
            request_timeout_secs: 15,
            placeholder_poster_url: None,
        }
    }
}

impl Config {
    /// Load from the platform config directory and apply `MOVIEMIND_API_URL`.
    pub fn load(dirs: &AppDirs) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&dirs.config_file())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        self.api_base_url = trimmed.to_string();
        if self.per_page == 0 || self.per_page > 100 {
            return Err(ConfigError::Invalid(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        Ok(())
    }
}

/// Platform directories for config, persisted client state and logs.
#[derive(Debug, Clone)]
pub struct AppDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppDirs {
    pub fn discover() -> Result<Self, ConfigError> {
        let dirs = directories::ProjectDirs::from("com", "moviemind", "moviemind")
            .ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn storage_file(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("moviemind.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.per_page, 20);
        assert!(config.placeholder_poster_url.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url": "https://movies.example/api/"}"#).unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.validate().unwrap();
        assert_eq!(config.api_base_url, "https://movies.example/api");
        assert_eq!(config.per_page, 20);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = Config {
            api_base_url: "localhost:5000".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config {
            per_page: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "[1,2").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }
}
