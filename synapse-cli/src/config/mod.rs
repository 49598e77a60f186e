//! User configuration
//!
//! Read from `~/.config/synapse-cli/config.toml`. Every field has a default,
//! so a missing file is not an error; a malformed one is.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::DuplicatePolicy;

/// Public Synapse repository service
pub const DEFAULT_ENDPOINT: &str = "https://repo-prod.prod.sagebase.org/repo/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Base URL of the repository REST API
    pub endpoint: String,
    /// Name of the environment variable holding a bearer token, if any
    pub auth_token_env: Option<String>,
    /// Rows requested per query page
    pub page_size: usize,
    /// HTTP request timeout
    pub timeout_secs: u64,
    /// How duplicate entity ids in one snapshot are handled
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            auth_token_env: Some("SYNAPSE_AUTH_TOKEN".to_string()),
            page_size: 1000,
            timeout_secs: 60,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("synapse-cli")
            .join("config.toml")
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from an explicit path if one was given, the default location otherwise
    pub fn load_with_override(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.page_size == 0 {
            anyhow::bail!("page_size must be greater than zero in {}", path.display());
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the bearer token from the configured environment variable
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 250").unwrap();
        writeln!(file, "duplicate_policy = \"last-write-wins\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.page_size, 250);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWriteWins);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = \"lots\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 0").unwrap();

        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_override_path_is_used() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://localhost:8080/repo/v1\"").unwrap();

        let config = Config::load_with_override(Some(file.path())).unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080/repo/v1");
    }
}
