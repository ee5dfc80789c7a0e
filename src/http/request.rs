//! Request intake.
//!
//! # Responsibilities
//! - Split the raw request target into path and query
//! - Decode the raw query string into an ordered mapping
//! - Tag every HTTP request with a UUID v4 request ID
//!
//! # Design Decisions
//! - Query text is passed through verbatim (no percent-decoding)
//! - Repeated query keys: the last occurrence wins
//! - A `RequestContext` lives for one dispatch and is never shared

use axum::http::{HeaderName, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::pipeline::Stream;

/// Header carrying the request ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Per-request data handed to handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Request target with any query suffix removed. Never contains `?`.
    pub path: String,
    /// Request method.
    pub method: Method,
    /// Decoded query parameters, in order of first appearance.
    pub query: Stream<String, String>,
}

impl RequestContext {
    /// Build the context from the three raw strings supplied by the host.
    pub fn new(target: &str, method: Method, raw_query: &str) -> Self {
        Self {
            path: strip_query(target).to_string(),
            method,
            query: decode_query(raw_query),
        }
    }

    /// Value of query parameter `key`, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Truncate the request target at the first `?`.
pub fn strip_query(target: &str) -> &str {
    match target.find('?') {
        Some(idx) => &target[..idx],
        None => target,
    }
}

/// Decode `a=1&b=2` into an ordered key/value stream.
///
/// A pair without `=` maps its key to an empty value.
pub fn decode_query(raw: &str) -> Stream<String, String> {
    if raw.is_empty() {
        return Stream::new();
    }

    Stream::list(raw.split('&')).fold(Stream::<String, String>::new(), |query, _, pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.add(key.to_string(), value.to_string())
    })
}

/// Generates UUID v4 request IDs for `tower_http`'s request-id layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}
