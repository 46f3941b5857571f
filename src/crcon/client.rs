//! CRCON HTTP client
//!
//! Thin wrapper over reqwest that unwraps the `{result, failed}` envelope and
//! retries 500/502 responses and transport failures with exponential backoff.

use super::types::{CrconError, Envelope, LiveStats, PublicInfo, ScoreboardMaps};
use super::MatchSource;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::sleep;

pub const PUBLIC_INFO_ENDPOINT: &str = "api/get_public_info";
pub const LIVE_GAME_STATS_ENDPOINT: &str = "api/get_live_game_stats";
pub const SCOREBOARD_MAPS_ENDPOINT: &str = "api/get_scoreboard_maps";

/// Configuration for the CRCON client
#[derive(Debug, Clone)]
pub struct CrconConfig {
    /// Server base URL, e.g. `https://scoreboard-us-east-1.glows.gg`
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles each attempt
    pub initial_backoff: Duration,
}

impl CrconConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for CrconConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
        }
    }
}

/// Client for a single CRCON instance
pub struct CrconClient {
    config: CrconConfig,
    client: Client,
}

impl CrconClient {
    /// Create a client from configuration
    pub fn new(config: CrconConfig) -> Result<Self, CrconError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(CrconError::Client)?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Absolute URL for an endpoint
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// GET an endpoint and unwrap its envelope
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, CrconError> {
        let url = self.url(endpoint);
        let mut attempt = 0;
        let mut delay = self.config.initial_backoff;

        loop {
            match self.try_get(&url).await {
                Ok(body) => {
                    let envelope: Envelope<T> =
                        serde_json::from_str(&body).map_err(|source| CrconError::Malformed {
                            url: url.clone(),
                            source,
                        })?;
                    return envelope.into_result(&url);
                }
                Err(e) if is_retryable(&e) && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying CRCON request"
                    );
                    sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<String, CrconError> {
        tracing::debug!(url = %url, "Fetching from CRCON");

        let transport = |source| CrconError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrconError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

fn is_retryable(error: &CrconError) -> bool {
    match error {
        CrconError::Transport { .. } => true,
        CrconError::Status { status, .. } => {
            *status == StatusCode::INTERNAL_SERVER_ERROR.as_u16()
                || *status == StatusCode::BAD_GATEWAY.as_u16()
        }
        _ => false,
    }
}

#[async_trait]
impl MatchSource for CrconClient {
    async fn public_info(&self) -> Result<PublicInfo, CrconError> {
        self.get(PUBLIC_INFO_ENDPOINT).await
    }

    async fn live_stats(&self) -> Result<LiveStats, CrconError> {
        self.get(LIVE_GAME_STATS_ENDPOINT).await
    }

    async fn scoreboard_maps(&self) -> Result<ScoreboardMaps, CrconError> {
        self.get(SCOREBOARD_MAPS_ENDPOINT).await
    }
}
