//! Voice-assistant (Alexa skill) envelope.
//!
//! Intents map onto the same action space as the webhook; the launch context
//! rides in the `"launch"` session attribute.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::action::ActionRequest;
use crate::context::{NavigationContext, LAUNCH_CONTEXT};
use crate::dispatch::{LaunchAssistant, Reply};
use crate::Result;

const ALEXA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Deserialize)]
pub struct AlexaRequest {
    #[serde(default)]
    pub session: AlexaSession,
    pub request: AlexaRequestBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlexaSession {
    #[serde(default)]
    pub new: bool,
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlexaRequestBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "requestId", default)]
    pub request_id: String,
    #[serde(default)]
    pub intent: Option<AlexaIntent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlexaIntent {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlexaResponse {
    pub version: String,
    #[serde(rename = "sessionAttributes")]
    pub session_attributes: Map<String, Value>,
    pub response: Speechlet,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Speechlet {
    #[serde(rename = "outputSpeech", skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(rename = "shouldEndSession", skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reprompt {
    #[serde(rename = "outputSpeech")]
    pub output_speech: OutputSpeech,
}

fn plain_text(text: &str) -> OutputSpeech {
    OutputSpeech {
        kind: "PlainText".to_string(),
        text: text.to_string(),
    }
}

impl Speechlet {
    /// Speech with a Simple card mirroring it.
    pub fn new(title: &str, speech: &str, content: &str, reprompt: Option<&str>, end: bool) -> Self {
        Self {
            output_speech: Some(plain_text(speech)),
            card: Some(Card {
                kind: "Simple".to_string(),
                title: title.to_string(),
                content: content.to_string(),
            }),
            reprompt: reprompt.map(|r| Reprompt {
                output_speech: plain_text(r),
            }),
            should_end_session: Some(end),
        }
    }
}

impl AlexaResponse {
    pub fn new(session_attributes: Map<String, Value>, response: Speechlet) -> Self {
        Self {
            version: ALEXA_VERSION.to_string(),
            session_attributes,
            response,
        }
    }
}

fn welcome(agency: &str) -> AlexaResponse {
    let speech = format!("Hey there! Ask me about upcoming {agency} launches");
    let reprompt = format!("Ask me when the next {agency} launch is");
    AlexaResponse::new(
        Map::new(),
        Speechlet::new("Welcome", &speech, &speech, Some(&reprompt), false),
    )
}

fn goodbye() -> AlexaResponse {
    let speech = "Have a nice day!";
    AlexaResponse::new(
        Map::new(),
        Speechlet::new("Session Ended", speech, speech, None, true),
    )
}

fn not_found(attributes: Map<String, Value>, agency: &str) -> AlexaResponse {
    let speech = format!(
        "Sorry, I couldn't find that. Try asking me when the next {agency} launch is."
    );
    let reprompt = format!("Ask me when the next {agency} launch is");
    AlexaResponse::new(
        attributes,
        Speechlet::new("Launch Info", &speech, &speech, Some(&reprompt), false),
    )
}

const FOLLOW_UP: &str = "You can ask about the rocket, the mission, or what launches after that.";

fn title_for(reply: &Reply) -> String {
    match reply {
        Reply::Launch(r) => r.title.clone(),
        Reply::Info { reply, .. } => reply.subject.clone(),
        Reply::Upcoming(_) => "Upcoming Launches".to_string(),
    }
}

/// Handle one voice-assistant event.
pub async fn handle(assistant: &LaunchAssistant, event: &AlexaRequest) -> Result<AlexaResponse> {
    let agency = assistant.settings().agency_name.as_str();
    let session = &event.session;
    if session.new {
        info!(target: "alexa", request_id = %event.request.request_id, session_id = %session.session_id, "Session started");
    }

    match event.request.kind.as_str() {
        "LaunchRequest" => Ok(welcome(agency)),
        "SessionEndedRequest" => {
            info!(target: "alexa", session_id = %session.session_id, "Session ended");
            Ok(AlexaResponse::new(Map::new(), Speechlet::default()))
        }
        "IntentRequest" => {
            let Some(intent) = &event.request.intent else {
                return Ok(welcome(agency));
            };
            debug!(target: "alexa", intent = %intent.name, "Intent request");
            match intent.name.as_str() {
                "AMAZON.HelpIntent" => return Ok(welcome(agency)),
                "AMAZON.CancelIntent" | "AMAZON.StopIntent" => return Ok(goodbye()),
                _ => {}
            }

            let mut attributes = session.attributes.clone();
            let Some(action) = ActionRequest::from_intent(&intent.name) else {
                info!(target: "alexa", intent = %intent.name, "Unknown intent");
                return Ok(not_found(attributes, agency));
            };
            let context = attributes
                .get(LAUNCH_CONTEXT)
                .and_then(Value::as_object)
                .and_then(NavigationContext::from_parameters);

            let Some(reply) = assistant.dispatch(action, context.as_ref()).await? else {
                return Ok(not_found(attributes, agency));
            };
            if let Some(ctx) = reply.context() {
                attributes.insert(
                    LAUNCH_CONTEXT.to_string(),
                    Value::Object(ctx.to_parameters()),
                );
            }
            let reprompt = match &reply {
                Reply::Info { reply, .. } if reply.more_available => {
                    format!("Say tell me more to hear more about {}.", reply.subject)
                }
                _ => FOLLOW_UP.to_string(),
            };
            Ok(AlexaResponse::new(
                attributes,
                Speechlet::new(
                    &title_for(&reply),
                    reply.speech(),
                    reply.display(),
                    Some(&reprompt),
                    false,
                ),
            ))
        }
        other => {
            info!(target: "alexa", kind = %other, "Unsupported request type");
            Ok(AlexaResponse::new(Map::new(), Speechlet::default()))
        }
    }
}
