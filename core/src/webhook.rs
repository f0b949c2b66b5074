//! Conversational-platform webhook envelope (API.AI v1 shape).
//!
//! Request: `{ result: { action, parameters, contexts } }`.
//! Response: `{ speech, displayText, contextOut, data, source, messages }`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::action::ActionRequest;
use crate::context::{ContextEntry, NavigationContext};
use crate::dispatch::{LaunchAssistant, Reply};
use crate::format::{InfoReply, LaunchReply};
use crate::Result;

/// Follow-ups offered after a launch answer.
pub const LAUNCH_SUGGESTIONS: [&str; 4] = [
    "Tell me about the rocket",
    "Tell me about the mission",
    "What launched before that?",
    "What's after that?",
];

pub const MORE_SUGGESTION: &str = "Tell me more";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub result: QueryResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub contexts: Vec<ContextEntry>,
}

impl QueryResult {
    /// `count` parameter as a number or numeric string.
    pub fn count(&self) -> Option<u32> {
        match self.parameters.get("count")? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .map(|n| n.min(u32::MAX as u64) as u32),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub speech: String,
    #[serde(rename = "displayText")]
    pub display_text: String,
    #[serde(rename = "contextOut", skip_serializing_if = "Vec::is_empty")]
    pub context_out: Vec<ContextEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
}

/// Rich message, discriminated by the platform's integer `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Speech(SpeechMessage),
    Card(CardMessage),
    QuickReplies(QuickRepliesMessage),
    Payload(PayloadMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechMessage {
    #[serde(rename = "type")]
    kind: u8,
    pub speech: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMessage {
    #[serde(rename = "type")]
    kind: u8,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<CardButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardButton {
    pub text: String,
    pub postback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickRepliesMessage {
    #[serde(rename = "type")]
    kind: u8,
    pub title: String,
    pub replies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadMessage {
    #[serde(rename = "type")]
    kind: u8,
    pub platform: String,
    pub payload: Value,
}

impl Message {
    pub fn speech(text: impl Into<String>) -> Self {
        Message::Speech(SpeechMessage {
            kind: 0,
            speech: text.into(),
        })
    }

    pub fn card(title: impl Into<String>, subtitle: impl Into<String>, buttons: Vec<CardButton>) -> Self {
        Message::Card(CardMessage {
            kind: 1,
            title: title.into(),
            subtitle: subtitle.into(),
            buttons,
        })
    }

    pub fn quick_replies(title: impl Into<String>, replies: &[&str]) -> Self {
        Message::QuickReplies(QuickRepliesMessage {
            kind: 2,
            title: title.into(),
            replies: replies.iter().map(|r| r.to_string()).collect(),
        })
    }

    pub fn payload(platform: impl Into<String>, payload: Value) -> Self {
        Message::Payload(PayloadMessage {
            kind: 4,
            platform: platform.into(),
            payload,
        })
    }

    /// The platform's integer message type.
    pub fn kind(&self) -> u8 {
        match self {
            Message::Speech(m) => m.kind,
            Message::Card(m) => m.kind,
            Message::QuickReplies(m) => m.kind,
            Message::Payload(m) => m.kind,
        }
    }
}

/// Facebook Messenger text with quick replies.
fn facebook_payload(text: &str, replies: &[&str]) -> Value {
    let mut payload = json!({ "text": text });
    if !replies.is_empty() {
        payload["quick_replies"] = Value::Array(
            replies
                .iter()
                .map(|r| json!({ "content_type": "text", "title": r, "payload": r }))
                .collect(),
        );
    }
    payload
}

impl WebhookResponse {
    fn plain(speech: &str, display: &str, source: &str) -> Self {
        Self {
            speech: speech.to_string(),
            display_text: display.to_string(),
            context_out: Vec::new(),
            data: None,
            source: source.to_string(),
            messages: vec![Message::speech(speech)],
        }
    }

    fn from_launch(reply: &LaunchReply, source: &str) -> Self {
        let mut res = Self::plain(&reply.speech, &reply.display, source);
        res.context_out = vec![reply.context.to_entry()];

        let buttons = reply
            .livestream_url
            .iter()
            .map(|url| CardButton {
                text: "Watch live".to_string(),
                postback: url.clone(),
            })
            .collect();
        res.messages.push(Message::card(&reply.title, &reply.display, buttons));
        res.messages
            .push(Message::quick_replies("Anything else?", &LAUNCH_SUGGESTIONS));

        let facebook = facebook_payload(&reply.display, &LAUNCH_SUGGESTIONS);
        res.messages.push(Message::payload("facebook", facebook.clone()));
        res.data = Some(json!({
            "facebook": facebook,
            "slack": { "text": reply.display },
        }));
        res
    }

    fn from_info(reply: &InfoReply, context: &NavigationContext, source: &str) -> Self {
        let mut res = Self::plain(&reply.speech, &reply.display, source);
        res.context_out = vec![context.to_entry()];

        let replies: &[&str] = if reply.more_available {
            &[MORE_SUGGESTION]
        } else {
            &[]
        };
        if !replies.is_empty() {
            res.messages.push(Message::quick_replies(
                format!("Want to know more about {}?", reply.subject),
                replies,
            ));
        }
        let facebook = facebook_payload(&reply.display, replies);
        res.messages.push(Message::payload("facebook", facebook.clone()));
        res.data = Some(json!({
            "facebook": facebook,
            "slack": { "text": reply.display },
        }));
        res
    }

    /// Render a dispatcher reply into the platform envelope.
    pub fn from_reply(reply: &Reply, source: &str) -> Self {
        match reply {
            Reply::Launch(r) => Self::from_launch(r, source),
            Reply::Info { reply, context } => Self::from_info(reply, context, source),
            Reply::Upcoming(r) => {
                let mut res = Self::plain(&r.speech, &r.display, source);
                res.data = Some(json!({ "slack": { "text": r.display } }));
                res
            }
        }
    }
}

/// Handle one webhook request.
///
/// Unknown actions, missing context and empty upstream results give
/// `Ok(None)`, which the server renders as `{}`.
pub async fn handle(assistant: &LaunchAssistant, request: &WebhookRequest) -> Result<Option<WebhookResponse>> {
    let result = &request.result;
    let Some(action) = ActionRequest::parse(&result.action) else {
        info!(target: "webhook", action = %result.action, "Unknown action");
        return Ok(None);
    };
    let action = action.with_count(result.count());
    let context = NavigationContext::from_contexts(&result.contexts);
    debug!(target: "webhook", action = %action.action, more = action.wants_more, has_context = context.is_some(), "Webhook request");

    let reply = assistant.dispatch(action, context.as_ref()).await?;
    Ok(reply.map(|r| WebhookResponse::from_reply(&r, &assistant.settings().source)))
}
