//! `patient-records` server binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use patient_records_core::{JsonStore, RecordService};
use patient_records_server::config::{ConfigOverrides, ServerConfig};
use patient_records_server::{logging, router, serve};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Patient record management HTTP service.
#[derive(Parser, Debug)]
#[command(name = "patient-records", version)]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Address to listen on (overrides the config file).
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
    /// JSON data file (overrides the config file).
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset (overrides the config file).
    #[arg(long, value_name = "DIRECTIVE")]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ServerConfig::load_or_default(args.config.as_deref())?.with_overrides(
        ConfigOverrides {
            bind: args.bind,
            data_file: args.data_file,
            log_filter: args.log_filter,
        },
    );
    logging::init(&config.log_filter);

    let store = JsonStore::open(&config.data_file);
    info!(data_file = %store.path().display(), "using data file");
    let app = router(RecordService::new(store));

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    serve(listener, app, shutdown_signal()).await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
