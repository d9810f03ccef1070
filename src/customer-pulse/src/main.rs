//! CustomerPulse: customer purchase-recency dashboard backend.
//!
//! Main entry point that loads the purchase snapshot, seeds the in-memory
//! store, and starts the API server.

use std::sync::Arc;

use clap::Parser;
use pulse_api::ApiServer;
use pulse_core::config::AppConfig;
use pulse_outreach::TemplateCatalog;
use pulse_store::{load_snapshot, MemoryStore};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "customer-pulse")]
#[command(about = "Customer purchase-recency dashboard backend")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CUSTOMER_PULSE__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CUSTOMER_PULSE__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Path to a JSON export of the backend's last-purchase table
    #[arg(long, env = "CUSTOMER_PULSE__STORE__SNAPSHOT_PATH")]
    snapshot: Option<String>,

    /// Inactivity threshold in days (overrides config)
    #[arg(long, env = "CUSTOMER_PULSE__RECENCY__INACTIVE_THRESHOLD_DAYS")]
    inactive_threshold_days: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_pulse=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("CustomerPulse starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(path) = cli.snapshot {
        config.store.snapshot_path = Some(path);
    }
    if let Some(threshold) = cli.inactive_threshold_days {
        config.recency.inactive_threshold_days = threshold;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        inactive_threshold_days = config.recency.inactive_threshold_days,
        "Configuration loaded"
    );

    // Seed the in-memory store from the snapshot export, if configured
    let store = match &config.store.snapshot_path {
        Some(path) => match load_snapshot(path) {
            Ok(records) => Arc::new(MemoryStore::seed(records)),
            Err(e) => {
                error!(error = %e, path = %path, "Failed to load purchase snapshot");
                return Err(e.into());
            }
        },
        None => {
            warn!("No snapshot path configured, starting with an empty store");
            Arc::new(MemoryStore::new())
        }
    };
    info!(customers = store.len(), "Customer store ready");

    // Built-in outreach templates, one per recency band
    let catalog = Arc::new(TemplateCatalog::default_catalog());

    // Start API server
    let api_server = ApiServer::new(config.clone(), store, catalog);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("CustomerPulse is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
