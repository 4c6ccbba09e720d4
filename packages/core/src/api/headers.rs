//! Conditional-request helpers for cacheable JSON responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

/// Cache lifetime for a cacheable response.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_age: u32,
    pub stale_while_revalidate: u32,
}

impl CachePolicy {
    /// Cache-Control value using max-age and stale-while-revalidate.
    pub fn header_value(&self) -> String {
        format!(
            "max-age={}, stale-while-revalidate={}",
            self.max_age, self.stale_while_revalidate
        )
    }
}

/// Compute a weakly-stable quoted ETag from response bytes.
pub fn compute_etag(body: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// RFC 7231 HTTP-date for Last-Modified.
pub fn http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Returns true when `If-None-Match` contains `*` or the exact current ETag.
pub fn if_none_match_matches(headers: &HeaderMap, current_etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|raw| {
            raw.split(',')
                .map(|tag| tag.trim())
                .any(|tag| tag == "*" || tag == current_etag)
        })
        .unwrap_or(false)
}

/// Serve `body` as JSON with ETag, Last-Modified and Cache-Control, or an
/// empty 304 when the client already holds the same representation.
pub fn conditional_json(
    request_headers: &HeaderMap,
    body: Vec<u8>,
    modified_at: DateTime<Utc>,
    policy: CachePolicy,
) -> Response {
    let etag = compute_etag(&body);
    let cache_headers = [
        (header::CACHE_CONTROL, policy.header_value()),
        (header::LAST_MODIFIED, http_date(modified_at)),
    ];

    if if_none_match_matches(request_headers, &etag) {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)], cache_headers).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        cache_headers,
        body,
    )
        .into_response()
}
