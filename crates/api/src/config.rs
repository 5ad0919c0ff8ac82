//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use stitchflow_catalog::CatalogItem;
use stitchflow_infra::catalog::InMemoryCatalog;
use stitchflow_observability::LogFormat;
use stitchflow_orders::WorkflowPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("failed to read catalog file {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog file {path}: {source}")]
    CatalogParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    /// Set when `JWT_SECRET` was missing and the dev secret is in use.
    pub insecure_jwt_secret: bool,
    pub bind_addr: SocketAddr,
    pub workflow_policy: WorkflowPolicy,
    pub log_format: LogFormat,
    /// JSON array of catalog items to load at startup.
    pub catalog_path: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (jwt_secret, insecure_jwt_secret) = match lookup("JWT_SECRET") {
            Some(s) if !s.is_empty() => (s, false),
            _ => (DEV_JWT_SECRET.to_string(), true),
        };

        let bind_raw = lookup("STITCHFLOW_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: "STITCHFLOW_BIND_ADDR",
            reason: e.to_string(),
        })?;

        let allow_cancellation = match lookup("STITCHFLOW_ALLOW_CANCELLATION") {
            Some(v) => parse_flag(&v).ok_or_else(|| ConfigError::Invalid {
                name: "STITCHFLOW_ALLOW_CANCELLATION",
                reason: format!("expected true/false, got '{v}'"),
            })?,
            None => false,
        };

        let log_format = match lookup("STITCHFLOW_LOG_FORMAT") {
            Some(v) => v.parse::<LogFormat>().map_err(|reason| ConfigError::Invalid {
                name: "STITCHFLOW_LOG_FORMAT",
                reason,
            })?,
            None => LogFormat::default(),
        };

        let catalog_path = lookup("STITCHFLOW_CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            jwt_secret,
            insecure_jwt_secret,
            bind_addr,
            workflow_policy: WorkflowPolicy { allow_cancellation },
            log_format,
            catalog_path,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Load catalog items from a JSON array file.
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<CatalogItem> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(InMemoryCatalog::with_items(items))
}
