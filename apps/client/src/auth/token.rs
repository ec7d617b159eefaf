//! Bearer token inspection.
//!
//! Tokens are never verified here (the backend owns the signing key). The
//! claims segment is only decoded so an expired credential can be dropped
//! before it is sent.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

/// Subject claim. The backend issues numeric user ids, but string subjects
/// are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Id(i64),
    Name(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Id(id) => write!(f, "{id}"),
            Subject::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry as unix seconds.
    pub exp: i64,
    pub sub: Subject,
}

/// A parsed `header.claims.signature` token. The raw string is kept
/// byte-for-byte so it can be sent back unmodified.
#[derive(Debug, Clone)]
pub struct BearerToken {
    raw: String,
    claims: TokenClaims,
}

impl BearerToken {
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        // sent verbatim in `Authorization`, so only visible ASCII is usable
        if let Some(byte) = raw.bytes().find(|b| !b.is_ascii_graphic()) {
            return Err(TokenError::Malformed(format!(
                "byte {byte:#04x} is not allowed in a header"
            )));
        }

        let mut parts = raw.split('.');
        let (Some(header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        };

        if header.is_empty() || payload.is_empty() {
            return Err(TokenError::Malformed("empty token segment".to_string()));
        }

        let decoded = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| TokenError::Malformed(format!("claims segment is not base64url: {e}")))?;

        let claims: TokenClaims = serde_json::from_slice(&decoded)
            .map_err(|e| TokenError::Malformed(format!("claims segment is not valid JSON: {e}")))?;

        Ok(Self {
            raw: raw.to_string(),
            claims,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn into_string(self) -> String {
        self.raw
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn subject(&self) -> &Subject {
        &self.claims.sub
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }

    /// A token is expired from its `exp` second onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims.exp <= now.timestamp()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the token if it is still usable at `now`.
    pub fn ensure_fresh(self, now: DateTime<Utc>) -> Result<Self, TokenError> {
        if self.is_expired_at(now) {
            return Err(TokenError::Expired {
                expired_at: self.claims.exp,
            });
        }
        Ok(self)
    }
}
