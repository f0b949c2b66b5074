/// Wikipedia summary client
///
/// Fetches the plain-text intro of an English Wikipedia article through the
/// MediaWiki query API (`prop=extracts`).
use crate::config::WikiConfig;
use crate::providers::SummarySource;
use crate::{LiftoffError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const WIKI_HOST: &str = "en.wikipedia.org";
const WIKI_PATH: &str = "/wiki/";

/// Extract the article title from `http(s)://en.wikipedia.org/wiki/<title>`.
///
/// The title is percent-decoded. Anything else (other hosts, other paths,
/// empty titles) yields `None`.
pub fn wiki_title(wiki_url: &str) -> Option<String> {
    let url = Url::parse(wiki_url.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if url.host_str()? != WIKI_HOST {
        return None;
    }
    let title = url.path().strip_prefix(WIKI_PATH)?;
    if title.is_empty() || title.contains('/') {
        return None;
    }
    let title = urlencoding::decode(title).ok()?;
    Some(title.into_owned())
}

/// `action=query` response, `indexpageids` flavour
#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pageids: Vec<String>,
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    extract: Option<String>,
}

/// Pull the first non-empty extract out of a query response body.
pub fn parse_summary(body: serde_json::Value) -> Option<String> {
    let response: QueryResponse = serde_json::from_value(body).ok()?;
    let query = response.query?;
    let QueryBody { pageids, mut pages } = query;

    // Missing articles come back under page id "-1" without an extract.
    let mut ordered: Vec<Page> = pageids.iter().filter_map(|id| pages.remove(id)).collect();
    ordered.extend(pages.into_values());
    ordered
        .into_iter()
        .filter_map(|p| p.extract)
        .map(|e| e.trim().to_string())
        .find(|e| !e.is_empty())
}

/// Wikipedia HTTP client
pub struct WikipediaClient {
    config: WikiConfig,
    http_client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self::with_config(WikiConfig::default())
    }

    pub fn with_config(config: WikiConfig) -> Self {
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

    /// Extracts query for `title`, form-encoded as a query value.
    fn summary_request(&self, title: &str) -> reqwest::Result<reqwest::Request> {
        self.http_client
            .get(&self.config.api_url)
            .query(&[
                ("format", "json"),
                ("utf8", "true"),
                ("action", "query"),
                ("redirects", "1"),
                ("prop", "extracts"),
                ("exintro", ""),
                ("explaintext", ""),
                ("indexpageids", ""),
                ("titles", title),
            ])
            .build()
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummarySource for WikipediaClient {
    async fn summary(&self, title: &str) -> Result<Option<String>> {
        debug!(target: "wikipedia", title = %title, "Fetching summary");

        let request = self.summary_request(title).map_err(|e| {
            warn!(target: "wikipedia", error = %e, "Invalid Wikipedia request");
            LiftoffError::Upstream(format!("Invalid Wikipedia request: {}", e))
        })?;
        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(target: "wikipedia", error = %e, "Wikipedia request failed");
            LiftoffError::Upstream(format!("Wikipedia request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(target: "wikipedia", status = %status, "Wikipedia returned error");
            return Err(LiftoffError::Upstream(format!(
                "Wikipedia returned status: {}",
                status
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            warn!(target: "wikipedia", error = %e, "Failed to parse Wikipedia response");
            LiftoffError::Decode(format!("Failed to parse Wikipedia response: {}", e))
        })?;

        Ok(parse_summary(body))
    }
}
