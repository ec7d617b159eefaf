use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{ACCEPT_ENCODING, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING},
        HeaderMap, Method, Uri,
    },
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::{ProxyError, ProxyFailure};
use crate::proxy::rewrite::{normalize_proxy_path, upstream_url};
use crate::proxy::ProxyState;

/// GET /health
pub async fn health_handler(State(state): State<ProxyState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "perfectcv-dev-proxy",
        "upstream": state.upstream,
    }))
}

/// ANY /api/*
///
/// Rewrites the path and relays the request to the upstream once.
pub async fn handle_forward(
    State(state): State<ProxyState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let original_path = uri.path().trim_start_matches('/').to_string();
    let normalized_path = normalize_proxy_path(&original_path);
    let url = upstream_url(&state.upstream, &normalized_path, uri.query());

    info!("Forwarding {method} /{original_path} -> {url}");

    match relay(&state.http, method, &url, headers, body).await {
        Ok(response) => Ok(response),
        Err(failure) => Err(ProxyError {
            failure,
            original_path,
            normalized_path,
        }),
    }
}

async fn relay(
    http: &reqwest::Client,
    method: Method,
    url: &str,
    mut headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyFailure> {
    headers.remove(HOST);
    // the body is re-sent whole and JSON is re-encoded, so let both sides
    // recompute framing and skip compression
    headers.remove(CONTENT_LENGTH);
    headers.remove(ACCEPT_ENCODING);

    let sends_body = method != Method::GET && method != Method::HEAD && !body.is_empty();
    let mut request = http.request(method, url).headers(headers);
    if sends_body {
        request = request.body(body);
    }

    let upstream = request.send().await?;
    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    for name in [CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION] {
        response_headers.remove(name);
    }

    let content_type = response_headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    debug!("Upstream responded {status} ({content_type})");

    let body = if content_type.contains("application/json") {
        let bytes = upstream.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;
        Body::from(serde_json::to_vec(&value)?)
    } else if content_type.contains("text/") {
        Body::from(upstream.text().await?)
    } else {
        Body::from(upstream.bytes().await?)
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
