//! Conversational context carried between turns.
//!
//! The platform owns storage and expiry; this module only knows how to read
//! the `"launch"` entry back and how to write a fresh one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::launch::{LaunchFact, UpstreamId};

/// Logical key of the launch context on every platform.
pub const LAUNCH_CONTEXT: &str = "launch";

/// Ids of the launch under discussion plus its navigation offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationContext {
    #[serde(rename = "launch-id")]
    pub launch_id: UpstreamId,
    #[serde(rename = "agency-id", default)]
    pub agency_id: UpstreamId,
    #[serde(rename = "rocket-id", default)]
    pub rocket_id: UpstreamId,
    #[serde(rename = "mission-id", default)]
    pub mission_id: UpstreamId,
    #[serde(rename = "pad-location-id", default)]
    pub pad_id: UpstreamId,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub offset: i64,
    /// Turns-to-live; travels next to the parameters, not inside them.
    #[serde(skip)]
    pub lifespan: u32,
}

impl NavigationContext {
    pub fn for_launch(fact: &LaunchFact, offset: i64, lifespan: u32) -> Self {
        Self {
            launch_id: fact.launch_id.clone(),
            agency_id: fact.agency_id.clone(),
            rocket_id: fact.rocket_id.clone(),
            mission_id: fact.mission_id.clone(),
            pad_id: fact.pad_id.clone(),
            offset,
            lifespan,
        }
    }

    /// Same subject, renewed lifespan.
    pub fn refreshed(&self, lifespan: u32) -> Self {
        Self {
            lifespan,
            ..self.clone()
        }
    }

    /// Read from a parameter map (webhook context parameters, voice session attribute).
    pub fn from_parameters(parameters: &Map<String, Value>) -> Option<Self> {
        match serde_json::from_value::<Self>(Value::Object(parameters.clone())) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                debug!(target: "context", error = %e, "Ignoring malformed launch context");
                None
            }
        }
    }

    /// Find and decode the `"launch"` entry of a webhook context list.
    pub fn from_contexts(contexts: &[ContextEntry]) -> Option<Self> {
        let entry = contexts
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(LAUNCH_CONTEXT))?;
        let mut ctx = Self::from_parameters(&entry.parameters)?;
        ctx.lifespan = entry.lifespan;
        Some(ctx)
    }

    pub fn to_parameters(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn to_entry(&self) -> ContextEntry {
        ContextEntry {
            name: LAUNCH_CONTEXT.to_string(),
            lifespan: self.lifespan,
            parameters: self.to_parameters(),
        }
    }
}

/// One named context as exchanged with the conversational platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub name: String,
    #[serde(default)]
    pub lifespan: u32,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Offsets come back as ints, floats or numeric strings depending on the platform.
fn lenient_offset<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .ok_or_else(|| D::Error::custom(format!("invalid offset: {n}"))),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .or_else(|_| s.parse::<f64>().map(|f| f.round() as i64))
                .map_err(|_| D::Error::custom(format!("invalid offset: {s}")))
        }
        Value::Null => Ok(0),
        other => Err(D::Error::custom(format!("invalid offset: {other}"))),
    }
}
