use jsonwebtoken::jwk::JwkSet;
use log::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching the key set
#[derive(Debug, Error)]
pub enum JwksError {
    #[error("Failed to fetch key set: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Key set request failed with status: {0}")]
    InvalidStatus(StatusCode),
}

/// Fetches the identity provider's published signing keys
#[derive(Debug, Clone)]
pub struct JwksClient {
    client: Client,
    url: String,
}

impl JwksClient {
    pub fn new(url: impl Into<String>, timeout: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .connect_timeout(Duration::from_secs(timeout.min(2)))
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<JwkSet, JwksError> {
        debug!("Fetching key set from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(JwksError::InvalidStatus(response.status()));
        }
        Ok(response.json::<JwkSet>().await?)
    }
}
