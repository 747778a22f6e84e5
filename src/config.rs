//! Process-wide configuration, validated once at startup.

use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "WEATHER_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WEATHER_API_KEY is not set; export a weatherapi.com key before starting")]
    MissingApiKey,
    #[error("WEATHER_API_BASE_URL must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env(timeout: Duration) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), timeout)
    }

    /// Build from an arbitrary variable source. A blank key counts as
    /// missing; the base URL loses any trailing slash.
    pub fn from_lookup<F>(lookup: F, timeout: Duration) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = match lookup(BASE_URL_VAR).map(|url| url.trim().to_string()) {
            Some(url) if url.is_empty() => DEFAULT_BASE_URL.to_string(),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.trim_end_matches('/').to_string()
            }
            Some(url) => return Err(ConfigError::InvalidBaseUrl(url)),
            None => DEFAULT_BASE_URL.to_string(),
        };

        Ok(Self {
            api_key,
            base_url,
            timeout,
        })
    }

    /// Config pointing at an explicit endpoint, for tests and embedding.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn missing_key_fails_fast() {
        let err = Config::from_lookup(lookup(&[]), Duration::from_secs(1)).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "   ")]), Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn defaults_base_url() {
        let config =
            Config::from_lookup(lookup(&[(API_KEY_VAR, "abc")]), Duration::from_secs(3)).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn base_url_override() {
        let config = Config::from_lookup(
            lookup(&[(API_KEY_VAR, "abc"), (BASE_URL_VAR, "http://localhost:8080/v1/")]),
            Duration::from_secs(3),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");

        let err = Config::from_lookup(
            lookup(&[(API_KEY_VAR, "abc"), (BASE_URL_VAR, "localhost")]),
            Duration::from_secs(3),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidBaseUrl("localhost".into()));
    }

    #[test]
    fn debug_redacts_key() {
        let config = Config::with_base_url("secret-key", "http://x");
        assert!(!format!("{config:?}").contains("secret-key"));
    }
}
