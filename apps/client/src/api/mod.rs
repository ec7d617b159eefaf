//! API client: the single point of entry for every call to the PerfectCV backend.
//!
//! Domain services never talk to `reqwest` directly. Each call goes through
//! [`ApiClient::send`]: the endpoint is normalized against the base URL, the
//! request is signed with the current credential, and exactly one network
//! attempt is made. A 401 clears the stored token and sends the navigator to
//! the login page before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{is_auth_route, BearerToken, CredentialProvider, Navigator, LOGIN_ROUTE};
use crate::config::Config;
use crate::errors::ClientError;

pub mod endpoints;
pub mod request;
pub mod signer;
pub mod url;

pub use request::{MultipartForm, NormalizedRequest, RequestBody, UploadFile};
pub use signer::RequestSigner;
pub use self::url::ApiBase;

/// Result of a call, folded into the three cases callers branch on.
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    /// The backend rejected the credential; the session is already cleared.
    AuthExpired,
    Failed(ClientError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Outcome::AuthExpired)
    }
}

impl<T> From<Result<T, ClientError>> for Outcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(ClientError::AuthExpired { .. }) => Outcome::AuthExpired,
            Err(e) => Outcome::Failed(e),
        }
    }
}

/// FastAPI error bodies: `{"detail": "..."}` or a validation list.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: ApiBase,
    signer: RequestSigner,
    credentials: Arc<dyn CredentialProvider>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base: ApiBase::new(&config.api_url),
            signer: RequestSigner::new(config.app_origin.as_deref()),
            credentials,
            navigator,
        })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Absolute URL an endpoint resolves to.
    pub fn url(&self, endpoint: &str) -> String {
        self.base.join(endpoint)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, endpoint, RequestBody::Empty).await?;
        decode(response).await
    }

    pub async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::POST, endpoint, body).await?;
        decode(response).await
    }

    pub async fn put<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::PUT, endpoint, body).await?;
        decode(response).await
    }

    /// DELETE; the response body, if any, is discarded.
    pub async fn delete(&self, endpoint: &str) -> Result<(), ClientError> {
        self.send(Method::DELETE, endpoint, RequestBody::Empty)
            .await?;
        Ok(())
    }

    /// POST with an url-encoded form body (OAuth2 password login).
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let pairs = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let response = self
            .send(Method::POST, endpoint, RequestBody::Form(pairs))
            .await?;
        decode(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: MultipartForm,
    ) -> Result<T, ClientError> {
        let response = self
            .send(Method::POST, endpoint, RequestBody::Multipart(form))
            .await?;
        decode(response).await
    }

    /// GET returning the raw body (document exports).
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Bytes, ClientError> {
        let response = self.send(Method::GET, endpoint, RequestBody::Empty).await?;
        Ok(response.bytes().await?)
    }

    pub async fn post_bytes<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Bytes, ClientError> {
        let body = RequestBody::Json(serde_json::to_value(body)?);
        let response = self.send(Method::POST, endpoint, body).await?;
        Ok(response.bytes().await?)
    }

    /// Performs one call. 2xx and 3xx are returned as-is; 401 expires the
    /// session; anything else becomes `ClientError::Api`. No retries.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<reqwest::Response, ClientError> {
        let token = self.current_token().await?;

        let mut request = NormalizedRequest::new(method, self.base.join(endpoint), body);
        self.signer.sign(&mut request, token.as_deref())?;

        debug!("API Request: {} {}", request.method, request.url);

        let response = request.into_reqwest(&self.http)?.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            warn!("API returned 401 for {endpoint}: {message}");
            self.expire_session().await;
            return Err(ClientError::AuthExpired { message });
        }

        if status.is_success() || status.is_redirection() {
            return Ok(response);
        }

        let message = error_message(response).await;
        debug!("API error {} for {endpoint}: {message}", status.as_u16());
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Reads the stored token and rejects it before sending when it is
    /// malformed or expired. A rejected token is removed from the store.
    async fn current_token(&self) -> Result<Option<String>, ClientError> {
        let Some(raw) = self.credentials.token().await? else {
            return Ok(None);
        };

        match BearerToken::parse(&raw).and_then(|t| t.ensure_fresh(Utc::now())) {
            Ok(token) => Ok(Some(token.into_string())),
            Err(e) => {
                warn!("Discarding stored token: {e}");
                if let Err(clear_err) = self.credentials.clear().await {
                    warn!("Failed to clear stored token: {clear_err}");
                }
                Err(e.into())
            }
        }
    }

    /// Clears the credential and, unless already on an auth page, remembers
    /// where the user was and navigates to login.
    async fn expire_session(&self) {
        if let Err(e) = self.credentials.clear().await {
            warn!("Failed to clear stored token after 401: {e}");
        }

        let location = self.navigator.current_location();
        if !is_auth_route(&location) {
            self.navigator.remember_redirect(&location);
            self.navigator.navigate(LOGIN_ROUTE);
        }
    }
}

/// Deserializes a success body. An empty body decodes as JSON `null`, so
/// `()` and `Option<T>` targets accept 204 responses.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Best human-readable message from an error response.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    message_from_body(&body)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        })
}

fn message_from_body(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        Some(Value::String(detail)) => return Some(detail),
        // validation errors: [{"loc": [...], "msg": "...", ...}, ...]
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    parsed.message.or(parsed.error)
}
