use async_trait::async_trait;
use log::debug;
use reqwest::header::CONTENT_TYPE;

use super::traits::{SendOutcome, TransportSender};
use crate::config::EndpointConfig;
use crate::core::{Packet, TimestampFormat};
use crate::error::{BridgeError, Result};

/// Posts each packet as a JSON body to the collector endpoint
#[derive(Debug, Clone)]
pub struct HttpSender {
    client: reqwest::Client,
    url: String,
    timestamp_format: TimestampFormat,
}

impl HttpSender {
    pub fn new(endpoint: &EndpointConfig, timestamp_format: TimestampFormat) -> Result<Self> {
        Self::with_url(endpoint.url(), endpoint, timestamp_format)
    }

    /// Same as [`HttpSender::new`] but posting to an explicit URL
    pub fn with_url(
        url: impl Into<String>,
        endpoint: &EndpointConfig,
        timestamp_format: TimestampFormat,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(endpoint.timeout())
            .build()
            .map_err(|e| BridgeError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            timestamp_format,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TransportSender for HttpSender {
    async fn send(&self, packet: &Packet) -> Result<SendOutcome> {
        let body = packet.to_json(self.timestamp_format)?;
        let bytes = body.len();

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BridgeError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("POST {} -> {} ({} bytes)", self.url, status, bytes);

        if !status.is_success() {
            return Err(BridgeError::TransportRejected {
                status: status.as_u16(),
            });
        }

        Ok(SendOutcome {
            status: status.as_u16(),
            bytes,
        })
    }
}
