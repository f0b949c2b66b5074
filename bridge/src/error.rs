//! Bridge error types and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use liftoff_core::LiftoffError;
use serde_json::json;
use tracing::{error, warn};

#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// Inbound body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Launch API or Wikipedia failed; not retried.
    #[error("upstream unavailable: {0}")]
    Upstream(#[from] LiftoffError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::BadRequest(msg) => {
                warn!(target: "bridge", error = %msg, "Rejected request body");
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            Self::Upstream(err) => {
                error!(target: "bridge", error = %err, "Upstream failure");
                (StatusCode::BAD_GATEWAY, "upstream_unavailable", err.to_string())
            }
            Self::Internal(msg) => {
                error!(target: "bridge", error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
