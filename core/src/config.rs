//! Client configuration from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `RESTO_API_BASE_URL` | `https://restaurant-be-400174736012.asia-southeast2.run.app` |
//! | `RESTO_API_MAX_RETRIES` | `3` |

use thiserror::Error;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://restaurant-be-400174736012.asia-southeast2.run.app";
pub const BASE_URL_VAR: &str = "RESTO_API_BASE_URL";
pub const MAX_RETRIES_VAR: &str = "RESTO_API_MAX_RETRIES";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Handed to the client by `RestoClient::from_config`.
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BASE_URL_VAR) {
            let trimmed = value.trim();
            if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    key: BASE_URL_VAR,
                    value,
                });
            }
            config.base_url = trimmed.to_string();
        }

        if let Some(value) = lookup(MAX_RETRIES_VAR) {
            config.retry.max_retries = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: MAX_RETRIES_VAR,
                value: value.clone(),
            })?;
        }

        Ok(config)
    }
}
