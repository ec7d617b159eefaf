//! Joins the configured API base with caller-supplied endpoint paths.
//!
//! Endpoints reach the client in many shapes (`resumes`, `/resumes/`,
//! `api/v1/resumes`, `/api/api/v1/resumes`, full URLs). Everything is reduced
//! to path segments and compared against the version path segments, so the
//! produced URL carries `api/v1` exactly once.

use crate::config::API_VERSION_PATH;

/// Non-empty `/`-separated segments of a path.
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Number of leading segments that match the start of `prefix`.
fn matched_prefix_len(segments: &[&str], prefix: &[&str]) -> usize {
    segments
        .iter()
        .zip(prefix)
        .take_while(|(segment, expected)| segment == expected)
        .count()
}

/// Drops every leading repetition of `prefix`, including partial ones such
/// as the stray `api` in `api/api/v1/...`.
pub fn strip_version_prefix<'a, 'b>(mut segments: &'b [&'a str], prefix: &[&str]) -> &'b [&'a str] {
    loop {
        let matched = matched_prefix_len(segments, prefix);
        if matched == 0 {
            return segments;
        }
        segments = &segments[matched..];
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    base: String,
    prefix: Vec<String>,
}

impl ApiBase {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
            prefix: split_segments(API_VERSION_PATH)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Builds the absolute URL for `endpoint`. Never fails; input that does
    /// not look like a path is concatenated as-is.
    pub fn join(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim();

        let relative = match self.relative_to_base(endpoint) {
            Some(rest) => rest,
            None if is_absolute(endpoint) => return endpoint.to_string(),
            None => endpoint,
        };

        let (path, query) = match relative.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (relative, None),
        };

        let segments = split_segments(path);
        let prefix: Vec<&str> = self.prefix.iter().map(String::as_str).collect();
        let segments = strip_version_prefix(&segments, &prefix);

        let mut url = self.base.clone();
        if !segments.is_empty() {
            url.push('/');
            url.push_str(&segments.join("/"));
        }
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// The part of an absolute URL that follows this base, if it is under it.
    fn relative_to_base<'a>(&self, endpoint: &'a str) -> Option<&'a str> {
        let rest = endpoint.strip_prefix(self.base.as_str())?;
        (rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')).then_some(rest)
    }
}

fn is_absolute(endpoint: &str) -> bool {
    endpoint.starts_with("http://") || endpoint.starts_with("https://")
}
