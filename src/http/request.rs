//! Request parameters and request identification.
//!
//! # Responsibilities
//! - Deserialize query parameters for each endpoint
//! - Generate a unique request ID (UUID v4) when the client sent none
//!
//! # Design Decisions
//! - Missing parameters read as empty strings, mirroring an empty value
//! - A repeated parameter takes its first value
//! - Request ID added as early as possible for tracing

use axum::http::{HeaderName, HeaderValue, Request};
use serde::Deserialize;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Decoded query string, kept as ordered pairs.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    /// First value given for `name`, or an empty string if it is absent.
    pub fn first(&self, name: &str) -> String {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }
}

/// `GET /name?q=`
#[derive(Debug, Default)]
pub struct NameParams {
    pub q: String,
}

impl From<QueryPairs> for NameParams {
    fn from(query: QueryPairs) -> Self {
        Self { q: query.first("q") }
    }
}

/// `GET /add?k=&v=`
#[derive(Debug, Default)]
pub struct AddParams {
    pub k: String,
    pub v: String,
}

impl From<QueryPairs> for AddParams {
    fn from(query: QueryPairs) -> Self {
        Self {
            k: query.first("k"),
            v: query.first("v"),
        }
    }
}

/// `GET /get?k=`
#[derive(Debug, Default)]
pub struct GetParams {
    pub k: String,
}

impl From<QueryPairs> for GetParams {
    fn from(query: QueryPairs) -> Self {
        Self { k: query.first("k") }
    }
}

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(id))
    }
}

/// Request ID of a request, or `"unknown"` if none was assigned.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}
