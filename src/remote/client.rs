//! HTTP client for the remote record service
//!
//! Lookups go to `GET {base}/users?email=...`; a non-empty JSON array means
//! the address is taken. Submissions hit `GET {base}/users/1`, which stands
//! in for a real persistence endpoint and ignores the payload.

use super::RecordServiceTrait;
use crate::config::TuiConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Default record service address
pub const DEFAULT_ADDRESS: &str = "https://jsonplaceholder.typicode.com";

/// Environment override for the service address
pub const ADDRESS_ENV: &str = "CHANNEL_FORM_API_ADDRESS";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the record service
pub struct RecordClient {
    client: reqwest::Client,
    address: String,
}

impl RecordClient {
    /// Create a client from config, with the environment taking precedence
    pub fn new(config: &TuiConfig) -> Result<Self> {
        let address = std::env::var(ADDRESS_ENV)
            .ok()
            .or_else(|| config.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let timeout = config.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::with_address(address, Duration::from_secs(timeout))
    }

    pub fn with_address(address: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            address: address.into(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.address.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl RecordServiceTrait for RecordClient {
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let url = self.build_url("users");
        tracing::debug!("Looking up {email} at {url}");

        let response = self
            .client
            .get(&url)
            .query(&[("email", email)])
            .send()
            .await
            .map_err(|e| anyhow!("Email lookup failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Email lookup failed with status {}",
                response.status()
            ));
        }

        let users: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse lookup response: {}", e))?;

        Ok(!users.is_empty())
    }

    async fn submit(&self, payload: &serde_json::Value) -> Result<()> {
        let url = self.build_url("users/1");
        tracing::info!(
            "Submitting form ({} top-level fields) to {url}",
            payload.as_object().map(|o| o.len()).unwrap_or(0)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Submission failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Submission failed with status {}", response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client =
            RecordClient::with_address("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.build_url("users"), "http://localhost:3000/users");
        assert_eq!(client.build_url("users/1"), "http://localhost:3000/users/1");
    }

    #[test]
    fn test_config_address_is_used() {
        // Skip when the environment override is set for this process
        if std::env::var(ADDRESS_ENV).is_ok() {
            return;
        }
        let config = TuiConfig {
            api_base_url: Some("http://records.test".to_string()),
            ..Default::default()
        };
        let client = RecordClient::new(&config).unwrap();
        assert_eq!(client.address(), "http://records.test");
    }

    #[test]
    fn test_default_address() {
        if std::env::var(ADDRESS_ENV).is_ok() {
            return;
        }
        let client = RecordClient::new(&TuiConfig::default()).unwrap();
        assert_eq!(client.address(), DEFAULT_ADDRESS);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let client =
            RecordClient::with_address("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(client.email_exists("a@b.co").await.is_err());
    }
}
