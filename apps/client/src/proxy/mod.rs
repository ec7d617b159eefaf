//! Development proxy: a local stand-in for the deployed API that repairs
//! doubled `/api` prefixes before forwarding.

pub mod handlers;
pub mod rewrite;

use std::time::Duration;

use axum::{
    routing::{any, get},
    Router,
};

use crate::config::Config;

/// Shared state injected into the proxy handlers.
#[derive(Clone)]
pub struct ProxyState {
    pub http: reqwest::Client,
    /// Upstream origin without a trailing slash, e.g. `https://host`.
    pub upstream: String,
}

impl ProxyState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            upstream: config.proxy_upstream.trim_end_matches('/').to_string(),
        })
    }
}

pub fn build_router(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api", any(handlers::handle_forward))
        .route("/api/*path", any(handlers::handle_forward))
        .with_state(state)
}
