use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use tracing::warn;

use crate::api::request::{NormalizedRequest, RequestBody};
use crate::errors::TokenError;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Attaches the credential and fixed headers to an outgoing request.
#[derive(Debug, Clone, Default)]
pub struct RequestSigner {
    origin: Option<HeaderValue>,
}

impl RequestSigner {
    pub fn new(origin: Option<&str>) -> Self {
        let origin = origin.and_then(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring origin '{o}': {e}");
                None
            }
        });
        Self { origin }
    }

    /// Sets `Authorization`, `Content-Type` and `Origin` on `request`.
    ///
    /// Without a token the request goes out unauthenticated. Multipart bodies
    /// never get an explicit content type; the transport adds one carrying
    /// the boundary.
    pub fn sign(&self, request: &mut NormalizedRequest, token: Option<&str>) -> Result<(), TokenError> {
        let content_type = match &request.body {
            RequestBody::Json(_) => Some(JSON_CONTENT_TYPE),
            RequestBody::Form(_) => Some(FORM_CONTENT_TYPE),
            RequestBody::Multipart(_) | RequestBody::Empty => None,
        };
        match content_type {
            Some(ct) => {
                request
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static(ct));
            }
            None => {
                request.headers.remove(CONTENT_TYPE);
            }
        }

        request.headers.remove(AUTHORIZATION);
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                TokenError::Malformed("token contains characters not allowed in a header".to_string())
            })?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
        }

        if let Some(origin) = &self.origin {
            request.headers.insert(ORIGIN, origin.clone());
        }

        Ok(())
    }
}
