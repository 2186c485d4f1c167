//! Server and storage configuration.
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or none at all) yields a working in-memory server on port 5000.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use crate::repository::{AmenityLinkage, Repository};
use crate::storage::{MemoryStorage, SledStorage, Storage};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// Which [`Storage`] implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Database directory, sled backend only
    pub path: PathBuf,
    pub amenity_links: AmenityLinkage,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            path: PathBuf::from("hbnb.db"),
            amenity_links: AmenityLinkage::Join,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_layer(&self) -> Result<CorsLayer> {
        if self.cors_origins.is_empty() {
            return Ok(CorsLayer::permissive());
        }

        let origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new().allow_origin(AllowOrigin::list(origins)))
    }
}

impl StorageConfig {
    /// Open the configured store and wrap it in a [`Repository`]
    pub fn open(&self) -> Result<Repository> {
        let storage: Arc<dyn Storage> = match self.backend {
            Backend::Memory => {
                info!("Using in-memory storage");
                Arc::new(MemoryStorage::new())
            }
            Backend::Sled => Arc::new(
                SledStorage::open(&self.path).context("Failed to open sled database")?,
            ),
        };

        Ok(Repository::new(storage, self.amenity_links))
    }
}
