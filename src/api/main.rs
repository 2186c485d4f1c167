//! HBnB API server.
//!
//! Serves the `/api/v1` REST interface over the configured store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::{extract::Request, ServiceExt};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hbnb::config::{Backend, Config};
use hbnb::repository::AmenityLinkage;
use hbnb::web;

#[derive(Parser, Debug)]
#[command(name = "api")]
#[command(about = "HBnB REST API server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host
    #[arg(long, env = "HBNB_API_HOST")]
    host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "HBNB_API_PORT")]
    port: Option<u16>,

    /// Storage backend
    #[arg(long, value_enum, env = "HBNB_TYPE_STORAGE")]
    backend: Option<Backend>,

    /// Database directory for the sled backend
    #[arg(long, env = "HBNB_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// How place/amenity links are stored
    #[arg(long, value_enum, env = "HBNB_AMENITY_LINKS")]
    amenity_links: Option<AmenityLinkage>,
}

impl Args {
    /// Config file (or defaults) with command line and environment overrides applied
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(path) = self.data_dir {
            config.storage.path = path;
        }
        if let Some(linkage) = self.amenity_links {
            config.storage.amenity_links = linkage;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Args::parse().into_config()?;

    info!("HBnB API Server");

    let repo = config.storage.open()?;
    info!("Amenity links stored as {:?}", repo.linkage());
    let app = web::app(web::router(repo).layer(config.server.cors_layer()?));

    let address = config.server.listen_addr();
    info!("Starting server on {}", address);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
