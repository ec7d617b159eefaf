//! Path rewriting for the development proxy.
//!
//! Misbuilt frontend URLs arrive with the API prefix doubled in a few known
//! shapes. The first matching redundant prefix is removed and the remainder
//! is re-rooted under the upstream's single `/api/v1`.

use crate::api::url::split_segments;
use crate::config::API_VERSION_PATH;

/// Checked in order; only the first match is removed.
const REDUNDANT_PREFIXES: [&[&str]; 4] = [
    &["api", "api", "v1"],
    &["api", "v1", "api", "v1"],
    &["api", "v1"],
    &["api"],
];

/// Inbound path (with or without leading slash) → path relative to the
/// upstream's `/api/v1`.
pub fn normalize_proxy_path(path: &str) -> String {
    let segments = split_segments(path);
    for prefix in REDUNDANT_PREFIXES {
        if segments.starts_with(prefix) {
            return segments[prefix.len()..].join("/");
        }
    }
    segments.join("/")
}

pub fn upstream_url(upstream: &str, normalized_path: &str, query: Option<&str>) -> String {
    let mut url = format!(
        "{}/{API_VERSION_PATH}/{normalized_path}",
        upstream.trim_end_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}
