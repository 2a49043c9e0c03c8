//! Request handling.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the caller did not send one
//! - Extract the relay-relevant facts (path, hop log, format, host)
//!
//! # Design Decisions
//! - Request ID is propagated to the next hop so a whole chain shares one ID
//! - Header values that are not valid UTF-8 are treated as absent

use axum::body::Body;
use axum::http::{header, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::config::HttpConfig;
use crate::relay::InboundRequest;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeHopRequestId;

impl MakeRequestId for MakeHopRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4()
            .to_string()
            .parse()
            .ok()
            .map(RequestId::new)
    }
}

/// Owned copy of the relay-relevant parts of a request.
///
/// Owned so the relay can run detached from the inbound connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFacts {
    pub path: String,
    pub log_header: Option<String>,
    pub format: Option<String>,
    pub host: Option<String>,
    pub request_id: Option<String>,
}

impl RequestFacts {
    pub fn from_request(request: &Request<Body>, http: &HttpConfig) -> Self {
        let headers = request.headers();
        let text = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let path = request.uri().path();
        let host = text(header::HOST.as_str())
            .or_else(|| request.uri().authority().map(|a| a.to_string()));

        Self {
            path: path.strip_prefix('/').unwrap_or(path).to_string(),
            log_header: text(&http.log_header),
            format: text(&http.format_header),
            host,
            request_id: text(X_REQUEST_ID.as_str()),
        }
    }

    pub fn as_inbound(&self) -> InboundRequest<'_> {
        InboundRequest {
            path: &self.path,
            log_header: self.log_header.as_deref(),
            format: self.format.as_deref(),
            host: self.host.as_deref(),
            request_id: self.request_id.as_deref(),
        }
    }
}
