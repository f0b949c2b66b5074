// Liftoff Core Library
// Conversational launch assistant: upstream clients, formatting, dispatch

pub mod action;
pub mod alexa;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod format;
pub mod launch;
pub mod providers;
pub mod webhook;

// Export core types
pub use action::{Action, ActionRequest};
pub use config::{AssistantConfig, LaunchApiConfig, LiftoffConfig, ServerConfig, WikiConfig};
pub use context::{ContextEntry, NavigationContext, LAUNCH_CONTEXT};
pub use dispatch::{LaunchAssistant, Reply};
pub use format::{is_launch_soon, InfoReply, LaunchReply, ResponseFormatter, UpcomingReply};
pub use launch::{InfoKind, InfoRecord, LaunchFact, LaunchQuery, UpstreamId};
pub use providers::{LaunchLibraryClient, LaunchSource, SummarySource, WikipediaClient};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LiftoffError {
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<toml::de::Error> for LiftoffError {
    fn from(e: toml::de::Error) -> Self {
        LiftoffError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LiftoffError>;
