//! # relay-guard
//!
//! Runs the relay moderation core on its own: loads `RelayConfig` from the
//! environment, opens the state under `RELAY_WORK_DIR`, bootstraps the
//! configured admins and keeps the background workers alive until Ctrl+C
//! or a fatal persistence error.

use anyhow::{Context, Result};
use relay_runtime::{HostCollaborators, RelayConfig, RelayRuntime};
use relay_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = RelayConfig::from_env();
    info!("===========================================");
    info!("  relay-guard v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!("Work Dir: {:?}", config.work_dir);
    info!("Relay URL: {}", config.relay_url);

    let runtime = RelayRuntime::new(config, HostCollaborators::default())
        .context("Failed to build relay runtime")?;
    runtime
        .start()
        .await
        .context("Failed to start relay runtime")?;

    info!("Relay moderation core is running. Press Ctrl+C to stop.");
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            info!("Ctrl+C received");
        }
        _ = runtime.wait_for_shutdown() => {}
    }

    let fatal = runtime.shutdown_requested();
    runtime.shutdown().await;

    if fatal {
        anyhow::bail!("relay-guard stopped after a fatal error");
    }
    Ok(())
}
