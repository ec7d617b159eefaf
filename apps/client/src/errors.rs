use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Problems with the locally stored bearer credential, detected before any
/// request leaves the process.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed bearer token: {0}")]
    Malformed(String),

    #[error("Bearer token expired at {expired_at}")]
    Expired { expired_at: i64 },

    #[error("Token storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Every way an API call can fail. Each variant is surfaced to the caller
/// unchanged; `AuthExpired` has additionally already cleared the session.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication expired: {message}")]
    AuthExpired { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired { .. })
    }

    /// HTTP status returned by the backend, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::AuthExpired { .. } => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Token(_) | ClientError::Json(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProxyFailure {
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A forwarding failure in the development proxy, carrying both paths so
/// the 500 body shows what the rewrite did.
#[derive(Debug, Error)]
#[error("{failure}")]
pub struct ProxyError {
    pub failure: ProxyFailure,
    pub original_path: String,
    pub normalized_path: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Proxy error for '{}' (normalized '{}'): {}",
            self.original_path,
            self.normalized_path,
            self.failure
        );

        let body = Json(json!({
            "error": "Failed to proxy request",
            "message": self.failure.to_string(),
            "originalPath": self.original_path,
            "normalizedPath": self.normalized_path,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_expired_reports_401() {
        let err = ClientError::AuthExpired {
            message: "Could not validate credentials".to_string(),
        };
        assert!(err.is_auth_expired());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_token_error_has_no_status() {
        let err = ClientError::from(TokenError::Expired { expired_at: 10 });
        assert!(!err.is_auth_expired());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Token error: Bearer token expired at 10");
    }

    #[tokio::test]
    async fn test_proxy_error_renders_diagnostic_body() {
        let failure = ProxyFailure::InvalidJson(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        );
        let response = ProxyError {
            failure,
            original_path: "api/api/v1/resumes".to_string(),
            normalized_path: "resumes".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Failed to proxy request");
        assert_eq!(body["originalPath"], "api/api/v1/resumes");
        assert_eq!(body["normalizedPath"], "resumes");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Upstream returned invalid JSON"));
    }
}
