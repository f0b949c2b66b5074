/// Launch Library client
///
/// Provides launch lists and mission/rocket/pad/agency details from the
/// Launch Library 1.2 REST API (no API key required)
use crate::config::LaunchApiConfig;
use crate::launch::{parse_info, parse_launches, InfoKind, InfoRecord, LaunchFact, LaunchQuery};
use crate::providers::LaunchSource;
use crate::{LiftoffError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Launch Library HTTP client
pub struct LaunchLibraryClient {
    config: LaunchApiConfig,
    http_client: reqwest::Client,
}

impl LaunchLibraryClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(LaunchApiConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: LaunchApiConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET a JSON document. 404 is reported as `Ok(None)`.
    async fn get_json(&self, url: &str, params: &[(&'static str, String)]) -> Result<Option<Value>> {
        debug!(target: "launch_library", url = %url, params = ?params, "Requesting");

        let response = self
            .http_client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!(target: "launch_library", error = %e, "Launch API request failed");
                LiftoffError::Upstream(format!("Launch API request failed: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(target: "launch_library", url = %url, "Launch API returned 404");
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            warn!(target: "launch_library", status = %status, "Launch API returned error");
            return Err(LiftoffError::Upstream(format!(
                "Launch API returned status: {}",
                status
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            warn!(target: "launch_library", error = %e, "Failed to parse launch response");
            LiftoffError::Decode(format!("Failed to parse launch response: {}", e))
        })?;
        Ok(Some(body))
    }
}

impl Default for LaunchLibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LaunchSource for LaunchLibraryClient {
    async fn launches(&self, query: &LaunchQuery) -> Result<Vec<LaunchFact>> {
        let url = self.endpoint("launch");
        let params = query.params(&self.config.agency);
        let Some(body) = self.get_json(&url, &params).await? else {
            return Ok(Vec::new());
        };
        let launches = parse_launches(body)
            .map_err(|e| LiftoffError::Decode(format!("Unexpected launch list shape: {}", e)))?;
        debug!(target: "launch_library", count = launches.len(), "Fetched launches");
        Ok(launches)
    }

    async fn info(&self, kind: InfoKind, id: &str) -> Result<Option<InfoRecord>> {
        let url = self.endpoint(&format!("{}/{}", kind.path(), id));
        let Some(body) = self.get_json(&url, &[]).await? else {
            return Ok(None);
        };
        parse_info(kind, body)
            .map_err(|e| LiftoffError::Decode(format!("Unexpected {} shape: {}", kind, e)))
    }
}
