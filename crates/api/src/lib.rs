//! HTTP API: configuration, request authentication and the order routes.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
