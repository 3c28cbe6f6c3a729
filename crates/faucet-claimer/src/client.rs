//! HTTP client for the faucet claim endpoint.

use crate::config::FaucetConfig;
use crate::error::{ClaimerError, ClaimerResult};
use crate::json::decode_object;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Body POSTed to the faucet
#[derive(Debug, Serialize)]
struct ClaimRequest<'a> {
    address: &'a str,
}

/// Faucet reply. Only `msg` is looked at, everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClaimResponse {
    #[serde(default)]
    pub msg: Option<String>,
}

impl ClaimResponse {
    pub fn with_msg(msg: impl Into<String>) -> Self {
        Self {
            msg: Some(msg.into()),
        }
    }
}

/// Something that can submit a claim for an address.
///
/// Failures are reported as `None`; callers never see an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaimApi: Send + Sync {
    async fn claim(&self, address: &str) -> Option<ClaimResponse>;
}

/// Client for the faucet's JSON claim API
#[derive(Debug, Clone)]
pub struct FaucetClient {
    http_client: Client,
    endpoint: String,
}

impl FaucetClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> ClaimerResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &FaucetConfig) -> ClaimerResult<Self> {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one claim, surfacing transport, status and decoding errors
    pub async fn try_claim(&self, address: &str) -> ClaimerResult<ClaimResponse> {
        debug!("POST {} for {}", self.endpoint, address);

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&ClaimRequest { address })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaimerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        decode_object(&body)
    }
}

#[async_trait]
impl ClaimApi for FaucetClient {
    async fn claim(&self, address: &str) -> Option<ClaimResponse> {
        match self.try_claim(address).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!("Faucet claim for {} failed: {}", address, e);
                None
            }
        }
    }
}
