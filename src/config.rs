// ABOUTME: Configuration module for the deck editor
// ABOUTME: Provides default settings and environment variable handling

use crate::api::Detail;
use crate::errors::{DeckError, Result};
use crate::slide::DEFAULT_THEME;
use std::env;
use std::path::PathBuf;
use url::Url;

const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_MS: u64 = 30000;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub default_theme: String,
    pub default_detail: Detail,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            default_theme: DEFAULT_THEME.to_string(),
            default_detail: Detail::Medium,
            export_dir: PathBuf::from("exports"),
        }
    }
}

/// Settings needed to build a `RemoteClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base = env::var("DECK_API_BASE").unwrap_or(defaults.api_base);
        let timeout_ms = env::var("DECK_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_ms);
        let max_retries = env::var("DECK_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.max_retries);
        let retry_delay_ms = env::var("DECK_RETRY_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.retry_delay_ms);
        let default_theme = env::var("DECK_DEFAULT_THEME").unwrap_or(defaults.default_theme);
        let default_detail = env::var("DECK_DEFAULT_DETAIL")
            .ok()
            .and_then(|s| s.parse::<Detail>().ok())
            .unwrap_or(defaults.default_detail);
        let export_dir = env::var("DECK_EXPORT_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            api_base,
            timeout_ms,
            max_retries,
            retry_delay_ms,
            default_theme,
            default_detail,
            export_dir,
        }
    }

    /// Get a client configuration, optionally overriding the timeout
    pub fn client_config(&self, timeout_ms: Option<u64>) -> Result<ClientConfig> {
        Ok(ClientConfig {
            base_url: parse_base_url(&self.api_base)?,
            timeout_ms: timeout_ms.unwrap_or(self.timeout_ms),
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
        })
    }
}

/// Parse the API base, making sure endpoint paths join beneath it
pub fn parse_base_url(base: &str) -> Result<Url> {
    let mut normalized = base.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized)?;
    if url.cannot_be_a_base() {
        return Err(DeckError::ConfigError(format!(
            "API base cannot be used as a base URL: {}",
            base
        )));
    }
    Ok(url)
}
