use std::sync::Arc;

use anyhow::Context;

use stitchflow_api::config::{ApiConfig, load_catalog};
use stitchflow_infra::catalog::InMemoryCatalog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;
    stitchflow_observability::tracing::init(config.log_format);

    if config.insecure_jwt_secret {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }
    if config.workflow_policy.allow_cancellation {
        tracing::info!("order cancellation enabled");
    }

    let catalog = match &config.catalog_path {
        Some(path) => load_catalog(path)?,
        None => {
            tracing::warn!("STITCHFLOW_CATALOG_PATH not set; catalog is empty");
            InMemoryCatalog::new()
        }
    };
    tracing::info!(items = catalog.len(), "catalog loaded");

    let app = stitchflow_api::app::build_app(&config, Arc::new(catalog))
        .context("failed to start background workers")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
