//! Shared fixtures for unit tests: token builders and in-process backends.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;

use crate::api::ApiClient;
use crate::auth::{MemoryTokenStore, SessionNavigator};
use crate::config::Config;

/// Builds an unsigned `header.claims.signature` token.
pub(crate) fn make_token(exp: i64, sub: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(serde_json::json!({ "exp": exp, "sub": sub }).to_string());
    format!("{header}.{claims}.c2lnbmF0dXJl")
}

pub(crate) fn fresh_token() -> String {
    make_token(Utc::now().timestamp() + 3600, serde_json::json!(1))
}

pub(crate) fn expired_token() -> String {
    make_token(Utc::now().timestamp() - 60, serde_json::json!(1))
}

pub(crate) fn test_config(api_url: &str) -> Config {
    Config {
        api_url: api_url.to_string(),
        app_origin: None,
        token_path: PathBuf::from("unused-token"),
        http_timeout_secs: 10,
        proxy_port: 0,
        proxy_upstream: "http://127.0.0.1:9".to_string(),
        rust_log: "debug".to_string(),
    }
}

/// Serves `router` on an ephemeral local port and returns its origin.
pub(crate) async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub(crate) struct Harness {
    pub client: ApiClient,
    pub store: Arc<MemoryTokenStore>,
    pub navigator: Arc<SessionNavigator>,
}

/// An `ApiClient` pointed at `router`, with an optional stored token and the
/// navigator parked at `location`.
pub(crate) async fn harness(router: Router, token: Option<String>, location: &str) -> Harness {
    let origin = spawn_server(router).await;
    let store = Arc::new(match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    });
    let navigator = Arc::new(SessionNavigator::new(location));
    let client = ApiClient::new(
        &test_config(&format!("{origin}/api/v1")),
        store.clone(),
        navigator.clone(),
    )
    .unwrap();

    Harness {
        client,
        store,
        navigator,
    }
}
