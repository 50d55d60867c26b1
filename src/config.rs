//! # Configuration
//!
//! Settings come from three places, later ones winning:
//!
//! 1. Built-in defaults ([`AppConfig::default`]).
//! 2. An optional TOML file, named by `--config` or `CATALOG_CONFIG`.
//! 3. Environment variables (a `.env` file in the working directory is loaded first):
//!    `CATALOG_API_BASE_URL`, `CATALOG_API_TIMEOUT_SECS`, `CATALOG_PAGE_SIZE`.
//!
//! ```toml
//! [api]
//! base_url = "https://dummyjson.com"
//! timeout_secs = 10
//!
//! [table]
//! page_sizes = [10, 20, 30, 40, 50]
//! default_page_size = 10
//!
//! [session]
//! channel_capacity = 64
//! cache_entries = 32
//! ```

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "CATALOG_CONFIG";
pub const BASE_URL_VAR: &str = "CATALOG_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "CATALOG_API_TIMEOUT_SECS";
pub const PAGE_SIZE_VAR: &str = "CATALOG_PAGE_SIZE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{name} has invalid value {value:?}")]
    Env { name: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub table: TableConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dummyjson.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub page_sizes: Vec<usize>,
    pub default_page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_sizes: vec![10, 20, 30, 40, 50],
            default_page_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capacity of the session's command channel.
    pub channel_capacity: usize,
    /// Number of pages kept in the query cache.
    pub cache_entries: usize,
    /// Number of notifications kept; older ones are dropped.
    pub max_notifications: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            cache_entries: 32,
            max_notifications: 5,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then the TOML file (if any), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env loaded: {}", e);
        }
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from));
        let contents = match &path {
            Some(path) => {
                tracing::debug!("Attempting to load configuration from: {:?}", path);
                let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                Some((path.clone(), contents))
            }
            None => None,
        };
        Self::from_sources(contents, |name| std::env::var(name).ok())
    }

    /// Builds the config from already-read file contents and an environment lookup.
    pub fn from_sources(
        file: Option<(PathBuf, String)>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some((path, contents)) => toml::from_str::<AppConfig>(&contents)
                .map_err(|source| ConfigError::Parse { path, source })?,
            None => AppConfig::default(),
        };

        if let Some(url) = env(BASE_URL_VAR) {
            config.api.base_url = url;
        }
        if let Some(value) = env(TIMEOUT_VAR) {
            config.api.timeout_secs = value.trim().parse().map_err(|_| ConfigError::Env {
                name: TIMEOUT_VAR,
                value,
            })?;
        }
        if let Some(value) = env(PAGE_SIZE_VAR) {
            config.table.default_page_size =
                value.trim().parse().map_err(|_| ConfigError::Env {
                    name: PAGE_SIZE_VAR,
                    value,
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Invalid(format!("api.base_url {:?}: {}", self.api.base_url, e))
        })?;
        let sizes = &self.table.page_sizes;
        if sizes.is_empty() || sizes.contains(&0) {
            return Err(ConfigError::Invalid(
                "table.page_sizes must be a non-empty list of positive sizes".to_string(),
            ));
        }
        if !sizes.contains(&self.table.default_page_size) {
            return Err(ConfigError::Invalid(format!(
                "table.default_page_size {} is not one of {:?}",
                self.table.default_page_size, sizes
            )));
        }
        if self.session.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "session.channel_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::from_sources(None, no_env).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn file_overrides_defaults_partially() {
        let file = r#"
            [table]
            page_sizes = [5, 25]
            default_page_size = 25
        "#;
        let config =
            AppConfig::from_sources(Some(("catalog.toml".into(), file.into())), no_env).unwrap();
        assert_eq!(config.table.page_sizes, vec![5, 25]);
        assert_eq!(config.api.base_url, "https://dummyjson.com");
    }

    #[test]
    fn env_overrides_file() {
        let env = |name: &str| match name {
            BASE_URL_VAR => Some("http://localhost:8080".to_string()),
            PAGE_SIZE_VAR => Some("20".to_string()),
            _ => None,
        };
        let config = AppConfig::from_sources(None, env).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.table.default_page_size, 20);
    }

    #[test]
    fn rejects_default_size_outside_allowed_set() {
        let env = |name: &str| (name == PAGE_SIZE_VAR).then(|| "15".to_string());
        assert!(matches!(
            AppConfig::from_sources(None, env),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unparsable_values() {
        let env = |name: &str| (name == TIMEOUT_VAR).then(|| "soon".to_string());
        assert!(matches!(
            AppConfig::from_sources(None, env),
            Err(ConfigError::Env { name: TIMEOUT_VAR, .. })
        ));

        let bad = Some(("bad.toml".into(), "table = 3".into()));
        assert!(matches!(
            AppConfig::from_sources(bad, no_env),
            Err(ConfigError::Parse { .. })
        ));
    }
}
