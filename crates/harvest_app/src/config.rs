use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Runtime configuration, loaded once at startup and validated before any
/// network activity.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_keys: Vec<String>,
    pub keywords: Vec<String>,
    pub max_results_per_keyword: u64,
    pub state_file: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in configuration file: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("api_keys must be a non-empty list")]
    NoApiKeys,
    #[error("keywords must be a non-empty list")]
    NoKeywords,
    #[error("max_results_per_keyword must be a positive integer")]
    ZeroResultCap,
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_json::from_str(&raw)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api_keys.is_empty() {
        return Err(ConfigError::NoApiKeys);
    }
    if config.keywords.is_empty() {
        return Err(ConfigError::NoKeywords);
    }
    if config.max_results_per_keyword == 0 {
        return Err(ConfigError::ZeroResultCap);
    }
    Ok(())
}
