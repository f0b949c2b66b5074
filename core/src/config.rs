use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// High-level configuration for the launch assistant and its server
#[derive(Clone, Debug, Default)]
pub struct LiftoffConfig {
    pub launch_api: LaunchApiConfig,
    pub wiki: WikiConfig,
    pub assistant: AssistantConfig,
    pub server: ServerConfig,
}

/// Launch-data API client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LaunchApiConfig {
    /// Base URL, without trailing slash (default: Launch Library 1.2)
    pub base_url: String,
    /// Agency abbreviation used to filter launch lists
    pub agency: String,
    /// Timeout for API requests in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

/// Wikipedia summary client configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WikiConfig {
    /// MediaWiki `api.php` endpoint
    pub api_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

/// Conversation and formatting preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Name used in phrasing ("The next SpaceX launch ...")
    pub agency_name: String,
    /// Turns an emitted launch context stays alive on the caller platform
    pub context_lifespan: u32,
    /// Half-width of the "happening soon" window
    pub soon_window_hours: i64,
    pub upcoming_default: u32,
    pub upcoming_max: u32,
    /// `source` field of webhook responses
    pub source: String,
}

/// HTTP listener configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Default for LaunchApiConfig {
    fn default() -> Self {
        Self {
            base_url: env_or("LAUNCH_API_BASE", "https://launchlibrary.net/1.2"),
            agency: env_or("LAUNCH_AGENCY", "spx"),
            timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 10_000),
            user_agent: "liftoff/0.1".to_string(),
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: env_or("WIKI_API_URL", "https://en.wikipedia.org/w/api.php"),
            timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 10_000),
            user_agent: "liftoff/0.1".to_string(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            agency_name: env_or("LAUNCH_AGENCY_NAME", "SpaceX"),
            context_lifespan: env_parse("CONTEXT_LIFESPAN", 5),
            soon_window_hours: env_parse("SOON_WINDOW_HOURS", 10),
            upcoming_default: 5,
            upcoming_max: 10,
            source: env_or("LIFTOFF_SOURCE", "com.jamiepitts.space-chatbot"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 5000),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl LiftoffConfig {
    /// Load configuration from a TOML file (path via LIFTOFF_CONFIG or ./liftoff.toml),
    /// overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("LIFTOFF_CONFIG").unwrap_or_else(|_| "liftoff.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target: "config", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match Self::from_file(p) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(target: "config", error = %e, "Failed to load TOML; using defaults");
                default
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Overlay a TOML document onto the defaults. Unset keys keep their default.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let t: LiftoffToml = toml::from_str(s)?;
        Ok(t.overlay(Self::default()))
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, Deserialize)]
struct LiftoffToml {
    pub launch_api: Option<LaunchApiToml>,
    pub wiki: Option<WikiToml>,
    pub assistant: Option<AssistantToml>,
    pub server: Option<ServerToml>,
}

impl LiftoffToml {
    fn overlay(self, mut base: LiftoffConfig) -> LiftoffConfig {
        if let Some(l) = self.launch_api {
            l.apply(&mut base.launch_api);
        }
        if let Some(w) = self.wiki {
            w.apply(&mut base.wiki);
        }
        if let Some(a) = self.assistant {
            a.apply(&mut base.assistant);
        }
        if let Some(s) = self.server {
            s.apply(&mut base.server);
        }
        base
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LaunchApiToml {
    pub base_url: Option<String>,
    pub agency: Option<String>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}
impl LaunchApiToml {
    fn apply(self, l: &mut LaunchApiConfig) {
        if let Some(v) = self.base_url {
            l.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = self.agency {
            l.agency = v;
        }
        if let Some(v) = self.timeout_ms {
            l.timeout_ms = v;
        }
        if let Some(v) = self.user_agent {
            l.user_agent = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WikiToml {
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}
impl WikiToml {
    fn apply(self, w: &mut WikiConfig) {
        if let Some(v) = self.api_url {
            w.api_url = v;
        }
        if let Some(v) = self.timeout_ms {
            w.timeout_ms = v;
        }
        if let Some(v) = self.user_agent {
            w.user_agent = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AssistantToml {
    pub agency_name: Option<String>,
    pub context_lifespan: Option<u32>,
    pub soon_window_hours: Option<i64>,
    pub upcoming_default: Option<u32>,
    pub upcoming_max: Option<u32>,
    pub source: Option<String>,
}
impl AssistantToml {
    fn apply(self, a: &mut AssistantConfig) {
        if let Some(v) = self.agency_name {
            a.agency_name = v;
        }
        if let Some(v) = self.context_lifespan {
            a.context_lifespan = v;
        }
        if let Some(v) = self.soon_window_hours {
            a.soon_window_hours = v.max(0);
        }
        if let Some(v) = self.upcoming_max {
            a.upcoming_max = v.max(1);
        }
        if let Some(v) = self.upcoming_default {
            a.upcoming_default = v.clamp(1, a.upcoming_max);
        }
        if let Some(v) = self.source {
            a.source = v;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerToml {
    pub host: Option<String>,
    pub port: Option<u16>,
}
impl ServerToml {
    fn apply(self, s: &mut ServerConfig) {
        if let Some(v) = self.host {
            s.host = v;
        }
        if let Some(v) = self.port {
            s.port = v;
        }
    }
}
