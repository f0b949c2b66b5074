use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use liftoff_core::alexa::{self, AlexaRequest};
use liftoff_core::webhook::{self, WebhookRequest};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{BridgeError, BridgeState, Result};

pub fn router(state: BridgeState) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/launches/next", get(next_launch_handler))
        .route("/webhook", post(webhook_handler))
        .route("/alexa", post(alexa_handler))
        .with_state(state)
}

/// Liveness plus the server's UTC clock
async fn status_handler() -> Json<Value> {
    Json(json!([
        { "status": "ok" },
        { "system_time_utc": chrono::Utc::now().to_rfc3339() }
    ]))
}

/// Next launch speech as plain text; `{}` when there is none
async fn next_launch_handler(State(state): State<BridgeState>) -> Result<Response> {
    match state.assistant.launch_at(0, true).await? {
        Some(reply) => {
            info!(target: "bridge", speech = %reply.speech, "Returning next launch");
            Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], reply.speech).into_response())
        }
        None => Ok(Json(json!({})).into_response()),
    }
}

/// Body is parsed as JSON whatever the declared content type.
fn decode<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| BridgeError::BadRequest(e.to_string()))
}

async fn webhook_handler(State(state): State<BridgeState>, body: Bytes) -> Result<Json<Value>> {
    let request: WebhookRequest = decode(&body)?;
    debug!(target: "bridge", action = %request.result.action, "Webhook request received");

    let response = webhook::handle(&state.assistant, &request).await?;
    let body = match response {
        Some(res) => serde_json::to_value(res).map_err(|e| BridgeError::Internal(e.to_string()))?,
        None => json!({}),
    };
    Ok(Json(body))
}

async fn alexa_handler(State(state): State<BridgeState>, body: Bytes) -> Result<Json<Value>> {
    let event: AlexaRequest = decode(&body)?;
    debug!(target: "bridge", kind = %event.request.kind, "Voice request received");

    let response = alexa::handle(&state.assistant, &event).await?;
    let body = serde_json::to_value(response).map_err(|e| BridgeError::Internal(e.to_string()))?;
    Ok(Json(body))
}
