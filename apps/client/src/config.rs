use std::path::PathBuf;

use anyhow::{Context, Result};

/// Version path every backend route lives under.
pub const API_VERSION_PATH: &str = "api/v1";

const DEFAULT_API_URL: &str = "http://localhost:8001/api/v1";
const DEFAULT_PROXY_UPSTREAM: &str = "https://perfectcv-production.up.railway.app";
const DEFAULT_TOKEN_PATH: &str = ".perfectcv/token";

/// Client, proxy and diagnostics configuration loaded from environment variables.
/// Every field has a default so a bare checkout talks to a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute base URL, always ending in `/api/v1`.
    pub api_url: String,
    /// Value sent in the `Origin` header, if any.
    pub app_origin: Option<String>,
    pub token_path: PathBuf,
    pub http_timeout_secs: u64,
    pub proxy_port: u16,
    pub proxy_upstream: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; `lookup` returns `None`
    /// for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = resolve_api_base(lookup("API_URL").as_deref());
        url::Url::parse(&api_url).with_context(|| format!("API_URL '{api_url}' is not a valid URL"))?;

        let proxy_upstream = lookup("PROXY_UPSTREAM")
            .unwrap_or_else(|| DEFAULT_PROXY_UPSTREAM.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&proxy_upstream)
            .with_context(|| format!("PROXY_UPSTREAM '{proxy_upstream}' is not a valid URL"))?;

        Ok(Config {
            api_url,
            app_origin: lookup("APP_ORIGIN").filter(|o| !o.trim().is_empty()),
            token_path: lookup("TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH)),
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            proxy_port: lookup("PROXY_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .context("PROXY_PORT must be a valid port number")?,
            proxy_upstream,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Turns a configured API URL into a base that ends in `/api/v1` exactly once.
///
/// `…/api/v1` is kept, `…/api` gets `/v1`, anything else gets `/api/v1`.
/// Missing or blank input falls back to the local backend.
pub fn resolve_api_base(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_API_URL.to_string();
    };
    let trimmed = raw.trim_end_matches('/');

    if trimmed.ends_with("/api/v1") {
        trimmed.to_string()
    } else if trimmed.ends_with("/api") {
        format!("{trimmed}/v1")
    } else {
        format!("{trimmed}/{API_VERSION_PATH}")
    }
}
