//! Relay error taxonomy.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Status recorded when the next hop could not be reached.
pub const STATUS_UNREACHABLE: u16 = 503;
/// Status recorded when the next hop did not answer in time.
pub const STATUS_TIMEOUT: u16 = 408;
/// Status recorded when the next hop answered 2xx with an unusable body.
pub const STATUS_BAD_BODY: u16 = 502;

/// Everything that can go wrong while relaying one request.
///
/// Only [`RelayError::DenylistedPath`] ever reaches the client as an HTTP
/// failure; the rest are folded into the hop log as synthetic statuses.
/// A malformed inbound hop log is not an error at all: `hoplog::decode`
/// reads it as an empty log.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("path {0:?} is denylisted")]
    DenylistedPath(String),

    #[error("next hop {url} unreachable: {reason}")]
    DownstreamUnreachable { url: String, reason: String },

    #[error("next hop {url} timed out after {after:?}")]
    DownstreamTimeout { url: String, after: Duration },

    #[error("next hop {url} answered {status} with an unreadable body: {source}")]
    DownstreamMalformedBody {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl RelayError {
    /// Status to record on the failed hop, if this error belongs to one.
    pub fn synthetic_status(&self) -> Option<u16> {
        match self {
            RelayError::DownstreamUnreachable { .. } => Some(STATUS_UNREACHABLE),
            RelayError::DownstreamTimeout { .. } => Some(STATUS_TIMEOUT),
            RelayError::DownstreamMalformedBody { status, .. } => {
                if (200..300).contains(status) {
                    Some(STATUS_BAD_BODY)
                } else {
                    Some(*status)
                }
            }
            RelayError::DenylistedPath(_) => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::DenylistedPath(_) => "denylisted",
            RelayError::DownstreamUnreachable { .. } => "unreachable",
            RelayError::DownstreamTimeout { .. } => "timeout",
            RelayError::DownstreamMalformedBody { .. } => "malformed_body",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::DenylistedPath(_) => StatusCode::NOT_FOUND.into_response(),
            // `Relay::handle` folds these into the payload and never returns
            // them. Anyone else turning one into a response gets a gateway error.
            e @ (RelayError::DownstreamUnreachable { .. }
            | RelayError::DownstreamTimeout { .. }
            | RelayError::DownstreamMalformedBody { .. }) => {
                (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_synthetic_statuses() {
        let unreachable = RelayError::DownstreamUnreachable {
            url: "http://b/".into(),
            reason: "refused".into(),
        };
        let timeout = RelayError::DownstreamTimeout {
            url: "http://b/".into(),
            after: Duration::from_secs(2),
        };
        assert_eq!(unreachable.synthetic_status(), Some(503));
        assert_eq!(timeout.synthetic_status(), Some(408));
        assert_eq!(RelayError::DenylistedPath("x".into()).synthetic_status(), None);
    }

    #[test]
    fn test_malformed_body_status() {
        let ok_but_garbage = RelayError::DownstreamMalformedBody {
            url: "http://b/".into(),
            status: 200,
            source: bad_json(),
        };
        let not_found = RelayError::DownstreamMalformedBody {
            url: "http://b/".into(),
            status: 404,
            source: bad_json(),
        };
        assert_eq!(ok_but_garbage.synthetic_status(), Some(502));
        assert_eq!(not_found.synthetic_status(), Some(404));
    }

    #[test]
    fn test_denylist_is_404() {
        let response = RelayError::DenylistedPath("favicon.ico".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_downstream_errors_map_to_bad_gateway() {
        let timeout = RelayError::DownstreamTimeout {
            url: "http://b/".into(),
            after: Duration::from_secs(1),
        };
        let bad_body = RelayError::DownstreamMalformedBody {
            url: "http://b/".into(),
            status: 200,
            source: bad_json(),
        };
        assert_eq!(timeout.into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(bad_body.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
