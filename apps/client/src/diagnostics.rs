//! Connectivity diagnostics for the backend API.
//!
//! Checks run in sequence against the configured base URL: DNS resolution,
//! a plain GET (retried over HTTP when HTTPS fails), a CORS pre-flight, and
//! a sweep over the readable catalog endpoints, authenticated when a stored
//! token is available. Every check records its own failure instead of
//! aborting, so the report always comes back whole.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, USER_AGENT};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::api::{endpoints, ApiBase};
use crate::auth::CredentialProvider;

/// Origin presented during the CORS pre-flight.
pub const CORS_CHECK_ORIGIN: &str = "http://localhost:3000";

/// Catalog paths answered by a bare GET; `""` is the API root.
pub const SWEPT_ENDPOINTS: [&str; 6] = [
    "",
    endpoints::auth::ME,
    endpoints::resumes::LIST,
    endpoints::job_descriptions::LIST,
    endpoints::optimizations::LIST,
    endpoints::users::CREDITS,
];

const PREVIEW_CHARS: usize = 500;
const DIAGNOSTIC_AGENT: &str = concat!("perfectcv-diagnose/", env!("CARGO_PKG_VERSION"));
const CORS_HEADERS: [&str; 3] = [
    "access-control-allow-origin",
    "access-control-allow-methods",
    "access-control-allow-headers",
];

#[derive(Debug, Serialize)]
pub struct DnsCheck {
    pub host: String,
    pub addresses: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HttpCheck {
    pub url: String,
    pub status: Option<u16>,
    pub headers: BTreeMap<String, String>,
    /// First 500 characters of the body, with `...` appended when cut.
    pub preview: Option<String>,
    pub error: Option<String>,
}

impl HttpCheck {
    fn failed(url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            status: None,
            headers: BTreeMap::new(),
            preview: None,
            error: Some(error.to_string()),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status.is_some()
    }
}

/// How an endpoint answered a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    Available,
    AuthRequired,
    NotFound,
    Other,
    Unreachable,
}

impl EndpointStatus {
    fn of(check: &HttpCheck) -> Self {
        match check.status {
            None => EndpointStatus::Unreachable,
            Some(200..=299) => EndpointStatus::Available,
            Some(401 | 403) => EndpointStatus::AuthRequired,
            Some(404) => EndpointStatus::NotFound,
            Some(_) => EndpointStatus::Other,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EndpointCheck {
    pub endpoint: String,
    pub outcome: EndpointStatus,
    pub check: HttpCheck,
}

#[derive(Debug, Serialize)]
pub struct CorsCheck {
    pub origin: String,
    pub status: Option<u16>,
    pub headers: BTreeMap<String, Option<String>>,
    pub error: Option<String>,
}

impl CorsCheck {
    /// At least one `access-control-allow-*` header came back.
    pub fn present(&self) -> bool {
        self.headers.values().any(Option::is_some)
    }
}

#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub target: String,
    pub checked_at: DateTime<Utc>,
    pub dns: DnsCheck,
    pub connection: HttpCheck,
    /// Plain-HTTP retry, only attempted when an HTTPS GET failed.
    pub fallback: Option<HttpCheck>,
    pub cors: CorsCheck,
    /// Whether the endpoint sweep carried a bearer token.
    pub authenticated: bool,
    pub endpoints: Vec<EndpointCheck>,
}

impl DiagnosticReport {
    pub fn reachable(&self) -> bool {
        self.connection.succeeded() || self.fallback.as_ref().is_some_and(HttpCheck::succeeded)
    }

    pub fn endpoint(&self, endpoint: &str) -> Option<&EndpointCheck> {
        self.endpoints.iter().find(|e| e.endpoint == endpoint)
    }
}

/// The stored bearer token, if any. A store that cannot be read only means
/// the sweep runs unauthenticated.
pub async fn stored_token(credentials: &dyn CredentialProvider) -> Option<String> {
    match credentials.token().await {
        Ok(token) => token,
        Err(e) => {
            warn!("Could not read stored token, sweeping unauthenticated: {e}");
            None
        }
    }
}

/// Runs every check against `target` (normally the resolved API base).
/// `token` is only sent with the endpoint sweep.
pub async fn diagnose(
    http: &reqwest::Client,
    target: &str,
    token: Option<&str>,
) -> Result<DiagnosticReport, url::ParseError> {
    let url = Url::parse(target)?;
    info!("Diagnosing API at {url}");

    let dns = check_dns(&url).await;
    let connection = check_get(http, &url, None).await;

    let fallback = if !connection.succeeded() && url.scheme() == "https" {
        let mut plain = url.clone();
        // https → http always succeeds for a parsed absolute URL
        let _ = plain.set_scheme("http");
        warn!("HTTPS request failed, retrying over {plain}");
        Some(check_get(http, &plain, None).await)
    } else {
        None
    };

    let cors = check_cors(http, &url).await;
    let endpoints = check_endpoints(http, &url, &SWEPT_ENDPOINTS, token).await;

    Ok(DiagnosticReport {
        target: url.to_string(),
        checked_at: Utc::now(),
        dns,
        connection,
        fallback,
        cors,
        authenticated: token.is_some(),
        endpoints,
    })
}

/// GETs each of `paths` under `base`, one attempt each.
pub async fn check_endpoints(
    http: &reqwest::Client,
    base: &Url,
    paths: &[&str],
    token: Option<&str>,
) -> Vec<EndpointCheck> {
    let base = ApiBase::new(base.as_str());
    let mut checks = Vec::with_capacity(paths.len());

    for path in paths {
        let joined = base.join(path);
        let check = match Url::parse(&joined) {
            Ok(url) => check_get(http, &url, token).await,
            Err(e) => HttpCheck::failed(joined, e),
        };
        let outcome = EndpointStatus::of(&check);
        info!("Endpoint '{path}': {outcome:?}");
        checks.push(EndpointCheck {
            endpoint: path.to_string(),
            outcome,
            check,
        });
    }

    checks
}

async fn check_dns(url: &Url) -> DnsCheck {
    let host = url.host_str().unwrap_or_default().to_string();
    let port = url.port_or_known_default().unwrap_or(443);

    let lookup = tokio::net::lookup_host((host.clone(), port)).await;
    match lookup {
        Ok(addrs) => {
            let addresses: Vec<String> = addrs.map(|a| a.ip().to_string()).collect();
            info!("DNS resolved {host} to {} address(es)", addresses.len());
            DnsCheck {
                host,
                addresses,
                error: None,
            }
        }
        Err(e) => {
            warn!("DNS resolution failed for {host}: {e}");
            DnsCheck {
                host,
                addresses: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

async fn check_get(http: &reqwest::Client, url: &Url, token: Option<&str>) -> HttpCheck {
    let result = async {
        let mut request = http.get(url.clone()).header(USER_AGENT, DIAGNOSTIC_AGENT);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = header_map(response.headers());
        let body = response.text().await?;
        Ok::<_, reqwest::Error>((status, headers, body))
    }
    .await;

    match result {
        Ok((status, headers, body)) => {
            info!("GET {url} answered {status}");
            HttpCheck {
                url: url.to_string(),
                status: Some(status),
                headers,
                preview: Some(preview(&body)),
                error: None,
            }
        }
        Err(e) => {
            warn!("GET {url} failed: {e}");
            HttpCheck::failed(url.as_str(), e)
        }
    }
}

async fn check_cors(http: &reqwest::Client, url: &Url) -> CorsCheck {
    let result = http
        .request(Method::OPTIONS, url.clone())
        .header(USER_AGENT, DIAGNOSTIC_AGENT)
        .header(ORIGIN, CORS_CHECK_ORIGIN)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .send()
        .await;

    match result {
        Ok(response) => {
            let headers = CORS_HEADERS
                .iter()
                .map(|name| {
                    let value = response
                        .headers()
                        .get(*name)
                        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
                    (name.to_string(), value)
                })
                .collect();
            let check = CorsCheck {
                origin: CORS_CHECK_ORIGIN.to_string(),
                status: Some(response.status().as_u16()),
                headers,
                error: None,
            };
            if !check.present() {
                warn!("No CORS headers returned for {CORS_CHECK_ORIGIN}");
            }
            check
        }
        Err(e) => {
            warn!("CORS pre-flight failed: {e}");
            CorsCheck {
                origin: CORS_CHECK_ORIGIN.to_string(),
                status: None,
                headers: BTreeMap::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
