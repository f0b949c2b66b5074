//! Liftoff Bridge - HTTP front door for the launch assistant.
//!
//! Routes:
//! - `POST /webhook` conversational-platform webhook
//! - `POST /alexa` voice-assistant skill endpoint
//! - `GET /status` liveness and server clock
//! - `GET /launches/next` next launch as plain text

mod error;
mod routes;

use std::sync::Arc;

use liftoff_core::LaunchAssistant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub use self::error::{BridgeError, Result};
pub use self::routes::router;

#[derive(Clone)]
pub struct BridgeState {
    pub assistant: Arc<LaunchAssistant>,
}

impl BridgeState {
    pub fn new(assistant: Arc<LaunchAssistant>) -> Self {
        Self { assistant }
    }
}

/// Bind `addr` and serve until the process is stopped.
pub async fn start_server(addr: &str, state: BridgeState) -> Result<()> {
    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BridgeError::Internal(format!("bind {addr}: {e}")))?;
    info!(target: "bridge", addr = %addr, "Liftoff bridge listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| BridgeError::Internal(e.to_string()))
}
