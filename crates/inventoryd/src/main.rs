//! inventoryd — the device inventory daemon.
//!
//! Single binary that assembles the inventory subsystems:
//! - Device store (redb)
//! - Rules engine
//! - REST API
//!
//! # Usage
//!
//! ```text
//! inventoryd serve --config /etc/inventory/inventoryd.toml --port 8080
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use inventory_rules::DeviceService;
use inventory_state::{DeviceStore, StateStore};

use crate::config::{InventoryConfig, LogFormat, LoggingConfig, Overrides};

#[derive(Parser)]
#[command(name = "inventoryd", about = "Device inventory daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve {
        /// Path to an inventoryd.toml file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Data directory for persistent state.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Keep all devices in memory.
        #[arg(long)]
        in_memory: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            data_dir,
            in_memory,
        } => {
            let overrides = Overrides {
                port,
                data_dir,
                in_memory,
            };
            let config = InventoryConfig::load(config.as_deref(), overrides)?;
            init_tracing(&config.logging);
            run(config).await
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(config: InventoryConfig) -> anyhow::Result<()> {
    info!("inventory daemon starting");

    // ── Device store ───────────────────────────────────────────

    let store: Arc<dyn DeviceStore> = if config.storage.in_memory {
        info!("using in-memory device store");
        Arc::new(StateStore::open_in_memory()?)
    } else {
        std::fs::create_dir_all(&config.storage.data_dir)?;
        let db_path = config.db_path();
        let store = StateStore::open(&db_path)?;
        info!(path = ?db_path, "device store opened");
        Arc::new(store)
    };

    // ── API server ─────────────────────────────────────────────

    let router = inventory_api::build_router(DeviceService::new(store));
    let addr = config.listen_addr()?;

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("inventory daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
