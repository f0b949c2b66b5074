//! Request dispatcher: one action plus the stored context in, one reply out.
//!
//! Platform adapters ([`crate::webhook`], [`crate::alexa`]) parse their own
//! envelopes into an [`ActionRequest`] and an optional [`NavigationContext`],
//! then render whatever [`Reply`] comes back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::action::{Action, ActionRequest};
use crate::config::{AssistantConfig, LiftoffConfig};
use crate::context::NavigationContext;
use crate::format::{InfoReply, LaunchReply, ResponseFormatter, UpcomingReply};
use crate::launch::{InfoKind, LaunchFact, LaunchQuery};
use crate::providers::{
    wiki_title, LaunchLibraryClient, LaunchSource, SummarySource, WikipediaClient,
};
use crate::Result;

/// Source of "now". Swappable so tests can pin time.
pub type Clock = fn() -> DateTime<Utc>;

/// What the dispatcher produced for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Launch(LaunchReply),
    /// Info answers re-emit the context they were resolved from.
    Info {
        reply: InfoReply,
        context: NavigationContext,
    },
    Upcoming(UpcomingReply),
}

impl Reply {
    pub fn speech(&self) -> &str {
        match self {
            Reply::Launch(r) => &r.speech,
            Reply::Info { reply, .. } => &reply.speech,
            Reply::Upcoming(r) => &r.speech,
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Reply::Launch(r) => &r.display,
            Reply::Info { reply, .. } => &reply.display,
            Reply::Upcoming(r) => &r.display,
        }
    }

    /// Context to hand back to the platform, if any.
    pub fn context(&self) -> Option<&NavigationContext> {
        match self {
            Reply::Launch(r) => Some(&r.context),
            Reply::Info { context, .. } => Some(context),
            Reply::Upcoming(_) => None,
        }
    }
}

/// Stateless launch assistant shared by every platform adapter.
pub struct LaunchAssistant {
    launches: Arc<dyn LaunchSource>,
    summaries: Arc<dyn SummarySource>,
    formatter: ResponseFormatter,
    settings: AssistantConfig,
    clock: Clock,
}

impl LaunchAssistant {
    pub fn new(
        launches: Arc<dyn LaunchSource>,
        summaries: Arc<dyn SummarySource>,
        settings: AssistantConfig,
    ) -> Self {
        Self {
            launches,
            summaries,
            formatter: ResponseFormatter::from_config(&settings),
            settings,
            clock: Utc::now,
        }
    }

    /// Assistant backed by the real Launch Library and Wikipedia clients.
    pub fn from_config(config: &LiftoffConfig) -> Self {
        Self::new(
            Arc::new(LaunchLibraryClient::with_config(config.launch_api.clone())),
            Arc::new(WikipediaClient::with_config(config.wiki.clone())),
            config.assistant.clone(),
        )
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &AssistantConfig {
        &self.settings
    }

    /// The launch at `offset` relative to now, if the upstream has one.
    pub async fn fetch_launch(&self, offset: i64) -> Result<Option<LaunchFact>> {
        let query = LaunchQuery::for_offset(offset, (self.clock)());
        let launches = self.launches.launches(&query).await?;
        Ok(launches.into_iter().next())
    }

    /// Fetch and describe the launch at `offset`.
    pub async fn launch_at(&self, offset: i64, is_after: bool) -> Result<Option<LaunchReply>> {
        let Some(fact) = self.fetch_launch(offset).await? else {
            info!(target: "dispatch", offset = offset, "No launch at offset");
            return Ok(None);
        };
        let now_ms = (self.clock)().timestamp_millis();
        Ok(Some(self.formatter.launch(&fact, offset, is_after, now_ms)))
    }

    /// Fetch and enumerate the next `count` launches (default and cap from settings).
    pub async fn upcoming(&self, count: Option<u32>) -> Result<UpcomingReply> {
        let max = self.settings.upcoming_max.max(1);
        let count = count.unwrap_or(self.settings.upcoming_default).clamp(1, max);
        let query = LaunchQuery::upcoming(count, (self.clock)());
        let launches = self.launches.launches(&query).await?;
        Ok(self.formatter.upcoming(&launches))
    }

    /// Describe the mission, rocket, pad or agency of the launch in `context`.
    pub async fn info(
        &self,
        kind: InfoKind,
        context: &NavigationContext,
        more_requested: bool,
    ) -> Result<Option<InfoReply>> {
        let id = match kind {
            InfoKind::Mission => &context.mission_id,
            InfoKind::Rocket => &context.rocket_id,
            InfoKind::Pad => &context.pad_id,
            InfoKind::Agency => &context.agency_id,
        };
        if id.is_unknown() {
            debug!(target: "dispatch", kind = %kind, "No id for subject");
            return Ok(None);
        }
        let Some(record) = self.launches.info(kind, &id.to_string()).await? else {
            info!(target: "dispatch", kind = %kind, id = %id, "Info record not found");
            return Ok(None);
        };

        let summary = match record.wiki_url.as_deref().and_then(wiki_title) {
            Some(title) => match self.summaries.summary(&title).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(target: "dispatch", title = %title, error = %e, "Falling back to templated description");
                    None
                }
            },
            None => None,
        };

        Ok(Some(self.formatter.info(
            kind,
            &record,
            summary.as_deref(),
            more_requested,
        )))
    }

    /// Route one request. Unknown subjects and missing context yield `Ok(None)`.
    pub async fn dispatch(
        &self,
        request: ActionRequest,
        context: Option<&NavigationContext>,
    ) -> Result<Option<Reply>> {
        debug!(target: "dispatch", action = %request.action, more = request.wants_more, has_context = context.is_some(), "Dispatching");

        if request.action.needs_context() && context.is_none() {
            info!(target: "dispatch", action = %request.action, "Missing launch context");
            return Ok(None);
        }

        let reply = match (request.action, context) {
            (Action::NextLaunch, _) => self.launch_at(0, true).await?.map(Reply::Launch),
            (Action::UpcomingLaunches, _) => Some(Reply::Upcoming(self.upcoming(request.count).await?)),
            (Action::LaunchAfter, Some(ctx)) => self
                .launch_at(ctx.offset.saturating_add(1), true)
                .await?
                .map(Reply::Launch),
            (Action::LaunchBefore, Some(ctx)) => self
                .launch_at(ctx.offset.saturating_sub(1), false)
                .await?
                .map(Reply::Launch),
            (Action::Info(kind), Some(ctx)) => self
                .info(kind, ctx, request.wants_more)
                .await?
                .map(|reply| Reply::Info {
                    reply,
                    context: ctx.refreshed(self.formatter.context_lifespan()),
                }),
            (_, None) => None,
        };
        Ok(reply)
    }
}
