//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: event store, bus, projection worker and order service
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use stitchflow_auth::Hs256JwtValidator;
use stitchflow_catalog::CatalogLookup;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router. Spawns the projection worker.
pub fn build_app(config: &ApiConfig, catalog: Arc<dyn CatalogLookup>) -> std::io::Result<Router> {
    let jwt = Arc::new(Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(services::build_services(config.workflow_policy, catalog)?);

    // Outermost first: authenticate, then hand the services to the handler.
    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            ))
            .layer(Extension(services)),
    );

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected))
}
