//! Sync configuration for client apps.
//!
//! Remote endpoint and API key come from environment configuration; their
//! absence is a valid state meaning "sync disabled", not an error.

use std::env;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

/// Environment variable holding the remote store base URL.
pub const ENV_SYNC_URL: &str = "CLUBTALLY_SYNC_URL";
/// Environment variable holding the remote store API key.
pub const ENV_API_KEY: &str = "CLUBTALLY_API_KEY";
/// Environment variable overriding the periodic sync interval, in seconds.
pub const ENV_SYNC_INTERVAL_SECS: &str = "CLUBTALLY_SYNC_INTERVAL_SECS";

const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(300);
const DEFAULT_PROBE_TTL: Duration = Duration::from_secs(10);

/// Configuration for remote sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Remote store base URL (e.g. `https://api.example.com`)
    pub base_url: Option<String>,
    /// API key for the remote store
    pub api_key: Option<String>,
    /// Period between automatic sync passes
    pub sync_interval: Duration,
    /// How long a connectivity probe result stays fresh
    pub probe_ttl: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            probe_ttl: DEFAULT_PROBE_TTL,
        }
    }
}

impl RemoteConfig {
    /// Create a configuration with the given endpoint and key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the automatic sync interval.
    #[must_use]
    pub const fn with_sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Set the connectivity probe freshness window.
    #[must_use]
    pub const fn with_probe_ttl(mut self, ttl: Duration) -> Self {
        self.probe_ttl = ttl;
        self
    }

    /// Check if sync is configured.
    pub const fn is_configured(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some()
    }

    /// Load configuration from the environment.
    ///
    /// Missing variables leave sync disabled; a present but malformed value
    /// is an error.
    pub fn from_env() -> Result<Self> {
        let base_url = normalize_text_option(env::var(ENV_SYNC_URL).ok());
        if let Some(url) = &base_url {
            if !is_http_url(url) {
                return Err(Error::InvalidInput(format!(
                    "{ENV_SYNC_URL} must include http:// or https://"
                )));
            }
        }

        let api_key = normalize_text_option(env::var(ENV_API_KEY).ok());

        let sync_interval = match normalize_text_option(env::var(ENV_SYNC_INTERVAL_SECS).ok()) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    Error::InvalidInput(format!("{ENV_SYNC_INTERVAL_SECS} must be a whole number of seconds"))
                })?;
                if secs == 0 {
                    return Err(Error::InvalidInput(format!(
                        "{ENV_SYNC_INTERVAL_SECS} must be greater than zero"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_SYNC_INTERVAL,
        };

        Ok(Self {
            base_url,
            api_key,
            sync_interval,
            probe_ttl: DEFAULT_PROBE_TTL,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = RemoteConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.sync_interval, DEFAULT_SYNC_INTERVAL);
    }

    #[test]
    fn new_is_configured() {
        let config = RemoteConfig::new("https://api.example.com", "key")
            .with_sync_interval(Duration::from_secs(60));
        assert!(config.is_configured());
        assert_eq!(config.sync_interval, Duration::from_secs(60));
    }
}
