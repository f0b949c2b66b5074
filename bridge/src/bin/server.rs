use std::sync::Arc;

use liftoff_bridge::{start_server, BridgeState};
use liftoff_core::{LaunchAssistant, LiftoffConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    if dotenvy::dotenv().is_ok() {
        eprintln!("Loaded environment from .env");
    }

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,liftoff_core=info,liftoff_bridge=info,tower_http=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Defaults + env + optional TOML overlay
    let config = LiftoffConfig::load();
    let addr = config.server.addr();
    info!(
        target: "bridge",
        launch_api = %config.launch_api.base_url,
        agency = %config.launch_api.agency,
        "Starting Liftoff bridge"
    );

    let assistant = Arc::new(LaunchAssistant::from_config(&config));
    start_server(&addr, BridgeState::new(assistant)).await?;
    Ok(())
}
