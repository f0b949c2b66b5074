/// Upstream data providers: launch-data API and Wikipedia summaries
pub mod launch_library;
pub mod wikipedia;

pub use launch_library::LaunchLibraryClient;
pub use wikipedia::{wiki_title, WikipediaClient};

use async_trait::async_trait;

use crate::launch::{InfoKind, InfoRecord, LaunchFact, LaunchQuery};
use crate::Result;

/// Source of launch records.
///
/// `Ok(None)` / an empty list means the upstream had nothing for the query;
/// `Err` is reserved for transport and decoding failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LaunchSource: Send + Sync {
    /// Run a list query, preserving upstream order.
    async fn launches(&self, query: &LaunchQuery) -> Result<Vec<LaunchFact>>;

    /// Fetch a mission, rocket, pad or agency by id.
    async fn info(&self, kind: InfoKind, id: &str) -> Result<Option<InfoRecord>>;
}

/// Source of plain-text article summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummarySource: Send + Sync {
    async fn summary(&self, title: &str) -> Result<Option<String>>;
}
