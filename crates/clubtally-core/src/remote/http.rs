//! HTTP implementation of the remote store client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::RemoteStore;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::sync::rows::{self, RowData};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// `reqwest`-backed remote store speaking the row CRUD API.
#[derive(Clone)]
pub struct HttpRemoteStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    /// Create a client for the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let api_key = normalize_text_option(Some(api_key.into()))
            .ok_or_else(|| Error::InvalidInput("API key must not be empty".to_string()))?;

        Ok(Self {
            base_url,
            api_key,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
        })
    }

    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when sync is not configured; that is a valid state,
    /// not an error.
    pub fn from_config(config: &RemoteConfig) -> Result<Option<Self>> {
        match (&config.base_url, &config.api_key) {
            (Some(url), Some(key)) => Self::new(url.clone(), key.clone()).map(Some),
            _ => Ok(None),
        }
    }

    fn rows_url(&self, table: &str) -> String {
        format!("{}/v1/tables/{table}/rows", self.base_url)
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/v1/health", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Error::Remote(format!(
                "health check returned HTTP {}",
                response.status().as_u16()
            )))
        }
    }

    async fn fetch_since(&self, table: &str, watermark: Option<&str>) -> Result<Vec<RowData>> {
        let mut request = self
            .client
            .get(self.rows_url(table))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(watermark) = watermark {
            request = request.query(&[("updated_since", watermark)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Remote(parse_api_error(status, &body)));
        }

        let rows = response.json::<Vec<RowData>>().await?;
        Ok(rows)
    }

    async fn upsert(&self, table: &str, row: &RowData) -> Result<()> {
        let id = rows::row_id(row)?;
        let response = self
            .client
            .put(format!("{}/{id}", self.rows_url(table)))
            .bearer_auth(&self.api_key)
            .json(row)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Remote(parse_api_error(status, &body)))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", compact_text(trimmed), status.as_u16())
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::InvalidInput("base URL must not be empty".to_string()))?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(Error::InvalidInput(
            "base URL must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_configuration() {
        assert!(HttpRemoteStore::new("  ", "key").is_err());
        assert!(HttpRemoteStore::new("api.example.com", "key").is_err());
        assert!(HttpRemoteStore::new("https://api.example.com", "  ").is_err());
    }

    #[test]
    fn new_trims_trailing_slash() {
        let store = HttpRemoteStore::new("https://api.example.com/", "key").unwrap();
        assert_eq!(
            store.rows_url("members"),
            "https://api.example.com/v1/tables/members/rows"
        );
    }

    #[test]
    fn from_config_requires_both_values() {
        let unconfigured = RemoteConfig::default();
        assert!(HttpRemoteStore::from_config(&unconfigured)
            .unwrap()
            .is_none());

        let configured = RemoteConfig::new("https://api.example.com", "key");
        assert!(HttpRemoteStore::from_config(&configured).unwrap().is_some());
    }

    #[test]
    fn parse_api_error_prefers_structured_message() {
        let body = r#"{"message": "table not found"}"#;
        assert_eq!(
            parse_api_error(StatusCode::NOT_FOUND, body),
            "table not found (404)"
        );
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
    }
}
