//! file-drop server binary.
//!
//! Serves an upload form, stores uploaded files in a flat directory, and
//! lets clients list, download and delete them. The main entry point
//! prepares the storage directory, builds the Axum router and starts the
//! HTTP listener.

mod app;
mod config;
mod error;
mod files;
mod format;
mod http;
mod logging;
mod storage;
mod upload;

use axum_server::Handle;
use clap::Parser;
use shadow_rs::shadow;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

use crate::app::{AppConfig, build_router};
use crate::config::Args;
use crate::storage::Storage;

shadow!(build);

/// Starts the server and blocks until shutdown.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    logging::init_logging();

    let args = Args::parse();
    let storage = Arc::new(Storage::new(PathBuf::from(&args.storage_dir)));
    if let Err(err) = storage.ensure_root().await {
        error!(path = args.storage_dir, error = %err, "failed to create storage directory");
        return Err(err);
    }

    let app_config = AppConfig {
        static_dir: PathBuf::from(&args.static_dir),
        upload_max_size: args.upload_max_size,
    };
    let app = build_router(storage.clone(), &app_config);

    let host = args
        .host
        .parse::<IpAddr>()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))?;
    let addr = SocketAddr::new(host, args.port);
    let handle = Handle::new();

    info!("Starting HTTP server at http://{}", addr);
    info!(path = ?storage.root_path(), "storage directory ready");

    let server = axum_server::bind(addr)
        .handle(handle.clone())
        .serve(app.into_make_service_with_connect_info::<SocketAddr>());

    tokio::spawn(shutdown_signal(handle));
    server.await
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received termination signal shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
